use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{classify_write_error, DatabaseError};
use crate::models::*;

const APPOINTMENT_COLUMNS: &str = "appoint_id, patient_id, doctor_id, date, time, scheduled_on";

pub(crate) fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        appoint_id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        date: row.get(3)?,
        time: row.get(4)?,
        scheduled_on: row.get(5)?,
    })
}

pub fn insert_appointment(
    conn: &Connection,
    appt: &NewAppointment,
) -> Result<Appointment, DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (patient_id, doctor_id, date, time, scheduled_on)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            appt.patient_id,
            appt.doctor_id,
            appt.date,
            appt.time,
            appt.scheduled_on,
        ],
    )
    .map_err(classify_write_error)?;

    Ok(Appointment {
        appoint_id: conn.last_insert_rowid(),
        patient_id: appt.patient_id,
        doctor_id: appt.doctor_id,
        date: appt.date,
        time: appt.time,
        scheduled_on: appt.scheduled_on,
    })
}

pub fn get_appointment(conn: &Connection, id: i64) -> Result<Option<Appointment>, DatabaseError> {
    let appt = conn
        .query_row(
            &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE appoint_id = ?1"),
            params![id],
            appointment_from_row,
        )
        .optional()?;
    Ok(appt)
}

/// Move an appointment to a new slot. The booking date is left untouched.
pub fn update_appointment(
    conn: &Connection,
    id: i64,
    changes: &AppointmentChanges,
) -> Result<(), DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE appointments
             SET scheduled_on = ?1, time = ?2, doctor_id = ?3, patient_id = ?4
             WHERE appoint_id = ?5",
            params![
                changes.scheduled_on,
                changes.time,
                changes.doctor_id,
                changes.patient_id,
                id,
            ],
        )
        .map_err(classify_write_error)?;
    if changed == 0 {
        return Err(DatabaseError::not_found("Appointment", id));
    }
    Ok(())
}

pub fn delete_appointment(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM appointments WHERE appoint_id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("Appointment", id));
    }
    Ok(())
}

/// Find the appointment holding a doctor's slot, ignoring `exclude`.
pub fn find_appointment_in_slot(
    conn: &Connection,
    doctor_id: i64,
    scheduled_on: NaiveDate,
    time: TimeSlot,
    exclude: Option<i64>,
) -> Result<Option<i64>, DatabaseError> {
    let id = conn
        .query_row(
            "SELECT appoint_id FROM appointments
             WHERE doctor_id = ?1 AND scheduled_on = ?2 AND time = ?3
               AND (?4 IS NULL OR appoint_id != ?4)
             LIMIT 1",
            params![doctor_id, scheduled_on, time, exclude],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}
