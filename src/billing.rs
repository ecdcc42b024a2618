//! Bills: one open bill per patient, and deletion that clears the
//! patient's visit, room, medicine and report records with it.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::appointments::require_patient;
use crate::db::{self, write_transaction};
use crate::error::ServiceError;
use crate::identity::IdentityContext;
use crate::models::*;
use crate::validation::{self, BillRequest};
use crate::visibility;

const BILL_EXISTS: &str = "A bill already exists for this patient";
const OTHER_BILL_EXISTS: &str = "This patient already has another bill";

pub fn list_bills(conn: &Connection, caller: &IdentityContext) -> Result<Vec<BillView>, ServiceError> {
    visibility::list_visible(conn, caller)
}

pub fn get_bill(conn: &Connection, caller: &IdentityContext, id: i64) -> Result<BillView, ServiceError> {
    visibility::get_visible(conn, caller, id)
}

pub fn create_bill(
    conn: &mut Connection,
    caller: &IdentityContext,
    req: &BillRequest,
    today: NaiveDate,
) -> Result<Bill, ServiceError> {
    caller.role()?;
    let bill = validation::validate_new_bill(req, today)?;

    let created = write_transaction(conn, |tx| {
        require_patient(tx, bill.patient_id)?;
        if db::find_bill_for_patient(tx, bill.patient_id, None)?.is_some() {
            return Err(ServiceError::Conflict(BILL_EXISTS.into()));
        }
        db::insert_bill(tx, &bill).map_err(|e| ServiceError::conflict_or(e, BILL_EXISTS))
    })?;

    tracing::info!(bill_id = created.bill_id, patient_id = created.patient_id, "Bill issued");
    Ok(created)
}

pub fn update_bill(
    conn: &mut Connection,
    caller: &IdentityContext,
    id: i64,
    req: &BillRequest,
    today: NaiveDate,
) -> Result<(), ServiceError> {
    caller.role()?;
    let bill = validation::validate_bill_update(req, today)?;

    write_transaction(conn, |tx| {
        if db::get_bill(tx, id)?.is_none() {
            return Err(ServiceError::NotFound("Bill not found".into()));
        }
        require_patient(tx, bill.patient_id)?;
        if db::find_bill_for_patient(tx, bill.patient_id, Some(id))?.is_some() {
            return Err(ServiceError::Conflict(OTHER_BILL_EXISTS.into()));
        }
        db::update_bill(tx, id, &bill).map_err(|e| ServiceError::conflict_or(e, OTHER_BILL_EXISTS))
    })?;

    tracing::info!(bill_id = id, "Bill updated");
    Ok(())
}

/// Delete a bill together with its patient's visits, rooms, medicines and
/// reports. Either everything is removed or nothing is.
pub fn delete_bill(
    conn: &mut Connection,
    caller: &IdentityContext,
    id: i64,
) -> Result<CascadeSummary, ServiceError> {
    caller.role()?;
    let summary = write_transaction(conn, |tx| db::delete_bill_cascade(tx, id).map_err(ServiceError::from))
        .inspect_err(|e| {
            if let ServiceError::Internal(inner) = e {
                tracing::warn!(bill_id = id, error = %inner, "Bill cascade rolled back");
            }
        })?;

    tracing::info!(bill_id = id, "Bill and dependent records deleted");
    Ok(summary)
}
