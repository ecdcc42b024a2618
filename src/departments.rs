//! Department records. Names are unique.

use rusqlite::Connection;

use crate::db::{self, write_transaction};
use crate::error::ServiceError;
use crate::identity::IdentityContext;
use crate::models::*;
use crate::validation::{self, DepartmentRequest};
use crate::visibility;

const NAME_TAKEN: &str = "Department with the same name already exists";

pub fn list_departments(
    conn: &Connection,
    caller: &IdentityContext,
) -> Result<Vec<Department>, ServiceError> {
    visibility::list_visible(conn, caller)
}

pub fn get_department(
    conn: &Connection,
    caller: &IdentityContext,
    id: i64,
) -> Result<Department, ServiceError> {
    visibility::get_visible(conn, caller, id)
}

pub fn create_department(
    conn: &mut Connection,
    caller: &IdentityContext,
    req: &DepartmentRequest,
) -> Result<Department, ServiceError> {
    caller.role()?;
    let dept = validation::validate_department(req)?;

    let created = write_transaction(conn, |tx| {
        if db::find_department_by_name(tx, &dept.dept_name, None)?.is_some() {
            return Err(ServiceError::Conflict(NAME_TAKEN.into()));
        }
        db::insert_department(tx, &dept).map_err(|e| ServiceError::conflict_or(e, NAME_TAKEN))
    })?;

    tracing::info!(dept_id = created.dept_id, "Department created");
    Ok(created)
}

pub fn update_department(
    conn: &mut Connection,
    caller: &IdentityContext,
    id: i64,
    req: &DepartmentRequest,
) -> Result<(), ServiceError> {
    caller.role()?;
    let dept = validation::validate_department(req)?;

    write_transaction(conn, |tx| {
        if db::find_department_by_name(tx, &dept.dept_name, Some(id))?.is_some() {
            return Err(ServiceError::Conflict(NAME_TAKEN.into()));
        }
        db::update_department(tx, id, &dept).map_err(|e| ServiceError::conflict_or(e, NAME_TAKEN))
    })?;

    tracing::info!(dept_id = id, "Department updated");
    Ok(())
}

pub fn delete_department(
    conn: &mut Connection,
    caller: &IdentityContext,
    id: i64,
) -> Result<(), ServiceError> {
    caller.role()?;
    write_transaction(conn, |tx| db::delete_department(tx, id).map_err(ServiceError::from))?;
    tracing::info!(dept_id = id, "Department deleted");
    Ok(())
}
