//! API endpoint handlers, one module per record kind.
//! Handlers open a connection and delegate to the service modules.

pub mod appointments;
pub mod bills;
pub mod departments;
pub mod health;
pub mod ratings;
