//! Rows in the tables a bill deletion clears. The service only ever
//! deletes from them; these helpers seed and count them in tests.

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_visit(
    conn: &Connection,
    patient_id: i64,
    doctor_id: i64,
    date_of_visit: NaiveDate,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO visits (patient_id, doctor_id, date_of_visit) VALUES (?1, ?2, ?3)",
        params![patient_id, doctor_id, date_of_visit],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_room(
    conn: &Connection,
    patient_id: i64,
    room_type: &str,
    admitted_on: NaiveDate,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO rooms (patient_id, room_type, admitted_on) VALUES (?1, ?2, ?3)",
        params![patient_id, room_type, admitted_on],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_medicine(
    conn: &Connection,
    patient_id: i64,
    name: &str,
    quantity: i64,
    price: f64,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO medicines (patient_id, name, quantity, price) VALUES (?1, ?2, ?3, ?4)",
        params![patient_id, name, quantity, price],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_pdf_report(
    conn: &Connection,
    patient_id: i64,
    file_name: &str,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO pdf_reports (patient_id, file_name, generated_at)
         VALUES (?1, ?2, datetime('now'))",
        params![patient_id, file_name],
    )?;
    Ok(conn.last_insert_rowid())
}

/// How many dependent rows a patient currently has in each cascade table.
pub fn patient_record_counts(
    conn: &Connection,
    patient_id: i64,
) -> Result<CascadeSummary, DatabaseError> {
    let count = |table: &str| -> Result<usize, DatabaseError> {
        let n: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE patient_id = ?1"),
            params![patient_id],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(n).unwrap_or_default())
    };
    Ok(CascadeSummary {
        visits: count("visits")?,
        rooms: count("rooms")?,
        medicines: count("medicines")?,
        reports: count("pdf_reports")?,
    })
}
