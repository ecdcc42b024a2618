pub mod appointment;
pub mod bill;
pub mod department;
pub mod enums;
pub mod patient_records;
pub mod people;
pub mod rating;

pub use appointment::*;
pub use bill::*;
pub use department::*;
pub use patient_records::*;
pub use people::*;
pub use rating::*;
