//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Identity: reads the upstream-authenticated caller
//! 2. Audit logger: logs after identity, has the caller's role

pub mod audit;
pub mod identity;
