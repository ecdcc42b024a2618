use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use crate::db::{classify_write_error, DatabaseError};
use crate::models::*;

const BILL_COLUMNS: &str = "bill_id, patient_id, date_issued, description, amount, payment_status";

pub(crate) fn bill_from_row(row: &Row<'_>) -> rusqlite::Result<Bill> {
    Ok(Bill {
        bill_id: row.get(0)?,
        patient_id: row.get(1)?,
        date_issued: row.get(2)?,
        description: row.get(3)?,
        amount: row.get(4)?,
        payment_status: row.get(5)?,
    })
}

pub fn insert_bill(conn: &Connection, bill: &NewBill) -> Result<Bill, DatabaseError> {
    conn.execute(
        "INSERT INTO bills (patient_id, date_issued, description, amount, payment_status)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            bill.patient_id,
            bill.date_issued,
            bill.description,
            bill.amount,
            bill.payment_status,
        ],
    )
    .map_err(classify_write_error)?;

    Ok(Bill {
        bill_id: conn.last_insert_rowid(),
        patient_id: bill.patient_id,
        date_issued: bill.date_issued,
        description: bill.description.clone(),
        amount: bill.amount,
        payment_status: bill.payment_status.clone(),
    })
}

pub fn get_bill(conn: &Connection, id: i64) -> Result<Option<Bill>, DatabaseError> {
    let bill = conn
        .query_row(
            &format!("SELECT {BILL_COLUMNS} FROM bills WHERE bill_id = ?1"),
            params![id],
            bill_from_row,
        )
        .optional()?;
    Ok(bill)
}

/// Omitted description and payment status keep their stored values.
pub fn update_bill(conn: &Connection, id: i64, bill: &BillChanges) -> Result<(), DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE bills
             SET patient_id = ?1, date_issued = ?2, description = COALESCE(?3, description),
                 amount = ?4, payment_status = COALESCE(?5, payment_status)
             WHERE bill_id = ?6",
            params![
                bill.patient_id,
                bill.date_issued,
                bill.description,
                bill.amount,
                bill.payment_status,
                id,
            ],
        )
        .map_err(classify_write_error)?;
    if changed == 0 {
        return Err(DatabaseError::not_found("Bill", id));
    }
    Ok(())
}

/// The bill a patient already holds, other than `exclude`.
pub fn find_bill_for_patient(
    conn: &Connection,
    patient_id: i64,
    exclude: Option<i64>,
) -> Result<Option<i64>, DatabaseError> {
    let id = conn
        .query_row(
            "SELECT bill_id FROM bills
             WHERE patient_id = ?1 AND (?2 IS NULL OR bill_id != ?2)
             LIMIT 1",
            params![patient_id, exclude],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// Delete a bill together with the patient's visits, room assignments,
/// medicine charges and generated reports.
///
/// Runs inside the caller's `Transaction`: all five deletes commit or roll back together,
/// and the caller decides when to commit.
pub fn delete_bill_cascade(tx: &Transaction<'_>, id: i64) -> Result<CascadeSummary, DatabaseError> {
    let patient_id: i64 = tx
        .query_row(
            "SELECT patient_id FROM bills WHERE bill_id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| DatabaseError::not_found("Bill", id))?;

    let deleted = tx.execute("DELETE FROM bills WHERE bill_id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("Bill", id));
    }

    let summary = CascadeSummary {
        visits: tx.execute("DELETE FROM visits WHERE patient_id = ?1", params![patient_id])?,
        rooms: tx.execute("DELETE FROM rooms WHERE patient_id = ?1", params![patient_id])?,
        medicines: tx.execute("DELETE FROM medicines WHERE patient_id = ?1", params![patient_id])?,
        reports: tx.execute("DELETE FROM pdf_reports WHERE patient_id = ?1", params![patient_id])?,
    };

    tracing::info!(
        bill_id = id,
        patient_id,
        visits = summary.visits,
        rooms = summary.rooms,
        medicines = summary.medicines,
        reports = summary.reports,
        "Bill cascade staged"
    );

    Ok(summary)
}
