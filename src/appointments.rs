//! Appointment booking: list, fetch, book, reschedule, cancel.
//!
//! Every write runs as one IMMEDIATE transaction: referenced patient and
//! doctor must exist, the doctor's slot must be free, then the row is
//! written.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::conflict::{self, DOCTOR_BUSY};
use crate::db::{self, write_transaction};
use crate::error::ServiceError;
use crate::identity::IdentityContext;
use crate::models::*;
use crate::validation::{self, AppointmentRequest};
use crate::visibility;

pub fn list_appointments(
    conn: &Connection,
    caller: &IdentityContext,
) -> Result<Vec<AppointmentView>, ServiceError> {
    visibility::list_visible(conn, caller)
}

pub fn get_appointment(
    conn: &Connection,
    caller: &IdentityContext,
    id: i64,
) -> Result<AppointmentView, ServiceError> {
    visibility::get_visible(conn, caller, id)
}

pub fn create_appointment(
    conn: &mut Connection,
    caller: &IdentityContext,
    req: &AppointmentRequest,
    today: NaiveDate,
) -> Result<Appointment, ServiceError> {
    caller.role()?;
    let appt = validation::validate_new_appointment(req, today)?;

    let created = write_transaction(conn, |tx| {
        require_patient(tx, appt.patient_id)?;
        require_doctor(tx, appt.doctor_id)?;
        conflict::ensure_free(tx, appt.doctor_id, appt.scheduled_on, appt.time, None)?;
        db::insert_appointment(tx, &appt).map_err(|e| ServiceError::conflict_or(e, DOCTOR_BUSY))
    })?;

    tracing::info!(
        appoint_id = created.appoint_id,
        doctor_id = created.doctor_id,
        scheduled_on = %created.scheduled_on,
        time = %created.time,
        "Appointment booked"
    );
    Ok(created)
}

/// Reschedule. The booking date recorded at creation is never changed.
pub fn update_appointment(
    conn: &mut Connection,
    caller: &IdentityContext,
    id: i64,
    req: &AppointmentRequest,
    today: NaiveDate,
) -> Result<(), ServiceError> {
    caller.role()?;
    let changes = validation::validate_appointment_update(req, today)?;

    write_transaction(conn, |tx| {
        if db::get_appointment(tx, id)?.is_none() {
            return Err(ServiceError::NotFound("Appointment not found".into()));
        }
        require_patient(tx, changes.patient_id)?;
        require_doctor(tx, changes.doctor_id)?;
        conflict::ensure_free(tx, changes.doctor_id, changes.scheduled_on, changes.time, Some(id))?;
        db::update_appointment(tx, id, &changes).map_err(|e| ServiceError::conflict_or(e, DOCTOR_BUSY))
    })?;

    tracing::info!(appoint_id = id, "Appointment rescheduled");
    Ok(())
}

pub fn delete_appointment(
    conn: &mut Connection,
    caller: &IdentityContext,
    id: i64,
) -> Result<(), ServiceError> {
    caller.role()?;
    write_transaction(conn, |tx| db::delete_appointment(tx, id).map_err(ServiceError::from))?;
    tracing::info!(appoint_id = id, "Appointment cancelled");
    Ok(())
}

/// Free slots of one doctor on one day, for the booking form.
pub fn doctor_available_slots(
    conn: &Connection,
    caller: &IdentityContext,
    doctor_id: i64,
    date: NaiveDate,
) -> Result<Vec<TimeSlot>, ServiceError> {
    caller.role()?;
    require_doctor(conn, doctor_id)?;
    Ok(conflict::available_slots(conn, doctor_id, date)?)
}

pub(crate) fn require_patient(conn: &Connection, patient_id: i64) -> Result<(), ServiceError> {
    if !db::patient_exists(conn, patient_id)? {
        return Err(ServiceError::NotFound("Patient not found".into()));
    }
    Ok(())
}

fn require_doctor(conn: &Connection, doctor_id: i64) -> Result<(), ServiceError> {
    if !db::doctor_exists(conn, doctor_id)? {
        return Err(ServiceError::NotFound("Doctor not found".into()));
    }
    Ok(())
}
