//! Repository layer: entity-scoped database operations.
//!
//! Every function takes a `&Connection`, so callers may pass a
//! `Transaction` (which derefs to one) to group several writes.

mod appointments;
mod bills;
mod departments;
#[cfg(test)]
mod patient_records;
mod people;
mod ratings;

pub use appointments::*;
pub use bills::*;
pub use departments::*;
#[cfg(test)]
pub use patient_records::*;
pub use people::*;
pub use ratings::*;
