//! Per-patient records that only exist while the patient holds a bill.

use serde::Serialize;

/// Row counts removed alongside a bill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeSummary {
    pub visits: usize,
    pub rooms: usize,
    pub medicines: usize,
    pub reports: usize,
}
