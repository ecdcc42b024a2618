//! Double-booking guard.
//!
//! A doctor's slot is identified by (doctor, scheduled-on day, time slot);
//! only exact equality collides. The pre-check runs inside the caller's
//! write transaction and the `appointments` table carries a matching
//! UNIQUE constraint, so two concurrent bookings of one slot cannot
//! both succeed.

use std::collections::HashSet;

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::db::{self, DatabaseError};
use crate::error::ServiceError;
use crate::models::TimeSlot;

pub const DOCTOR_BUSY: &str = "Doctor is busy at this time, please choose another date or time.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Free,
    Taken { appointment_id: i64 },
}

/// Look up a booking in the slot. `exclude` is the appointment being
/// rescheduled, which never conflicts with itself.
pub fn check_conflict(
    conn: &Connection,
    doctor_id: i64,
    date: NaiveDate,
    slot: TimeSlot,
    exclude: Option<i64>,
) -> Result<SlotStatus, DatabaseError> {
    let status = match db::find_appointment_in_slot(conn, doctor_id, date, slot, exclude)? {
        Some(appointment_id) => SlotStatus::Taken { appointment_id },
        None => SlotStatus::Free,
    };
    Ok(status)
}

/// `check_conflict`, with a taken slot reported as `Conflict`.
pub fn ensure_free(
    conn: &Connection,
    doctor_id: i64,
    date: NaiveDate,
    slot: TimeSlot,
    exclude: Option<i64>,
) -> Result<(), ServiceError> {
    match check_conflict(conn, doctor_id, date, slot, exclude)? {
        SlotStatus::Free => Ok(()),
        SlotStatus::Taken { appointment_id } => {
            tracing::debug!(doctor_id, %date, %slot, appointment_id, "Slot already booked");
            Err(ServiceError::Conflict(DOCTOR_BUSY.into()))
        }
    }
}

/// Every slot of `date` the doctor has not been booked for, in order.
pub fn available_slots(
    conn: &Connection,
    doctor_id: i64,
    date: NaiveDate,
) -> Result<Vec<TimeSlot>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT time FROM appointments WHERE doctor_id = ?1 AND scheduled_on = ?2",
    )?;
    let taken = stmt
        .query_map(params![doctor_id, date], |row| row.get::<_, TimeSlot>(0))?
        .collect::<Result<HashSet<_>, _>>()?;

    Ok(TimeSlot::all().filter(|slot| !taken.contains(slot)).collect())
}
