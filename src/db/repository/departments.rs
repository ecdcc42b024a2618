use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{classify_write_error, DatabaseError};
use crate::models::*;

fn department_from_row(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        dept_id: row.get(0)?,
        dept_head: row.get(1)?,
        dept_name: row.get(2)?,
        emp_count: row.get(3)?,
    })
}

pub fn insert_department(
    conn: &Connection,
    dept: &NewDepartment,
) -> Result<Department, DatabaseError> {
    conn.execute(
        "INSERT INTO departments (dept_head, dept_name, emp_count) VALUES (?1, ?2, ?3)",
        params![dept.dept_head, dept.dept_name, dept.emp_count],
    )
    .map_err(classify_write_error)?;

    Ok(Department {
        dept_id: conn.last_insert_rowid(),
        dept_head: dept.dept_head.clone(),
        dept_name: dept.dept_name.clone(),
        emp_count: dept.emp_count,
    })
}

pub fn get_department(conn: &Connection, id: i64) -> Result<Option<Department>, DatabaseError> {
    let dept = conn
        .query_row(
            "SELECT dept_id, dept_head, dept_name, emp_count FROM departments WHERE dept_id = ?1",
            params![id],
            department_from_row,
        )
        .optional()?;
    Ok(dept)
}

pub fn list_departments(conn: &Connection) -> Result<Vec<Department>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT dept_id, dept_head, dept_name, emp_count FROM departments ORDER BY dept_id",
    )?;
    let rows = stmt.query_map([], department_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_department(
    conn: &Connection,
    id: i64,
    dept: &NewDepartment,
) -> Result<(), DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE departments SET dept_head = ?1, dept_name = ?2, emp_count = ?3
             WHERE dept_id = ?4",
            params![dept.dept_head, dept.dept_name, dept.emp_count, id],
        )
        .map_err(classify_write_error)?;
    if changed == 0 {
        return Err(DatabaseError::not_found("Department", id));
    }
    Ok(())
}

pub fn delete_department(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM departments WHERE dept_id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("Department", id));
    }
    Ok(())
}

/// The department already using `name`, other than `exclude`.
pub fn find_department_by_name(
    conn: &Connection,
    name: &str,
    exclude: Option<i64>,
) -> Result<Option<i64>, DatabaseError> {
    let id = conn
        .query_row(
            "SELECT dept_id FROM departments
             WHERE dept_name = ?1 AND (?2 IS NULL OR dept_id != ?2)
             LIMIT 1",
            params![name, exclude],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}
