use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{classify_write_error, DatabaseError};
use crate::models::*;

fn staff_from_row(row: &Row<'_>) -> rusqlite::Result<Staff> {
    Ok(Staff {
        emp_id: row.get(0)?,
        emp_fname: row.get(1)?,
        emp_lname: row.get(2)?,
        email: row.get(3)?,
        emp_type: row.get(4)?,
        dept_id: row.get(5)?,
    })
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        patient_id: row.get(0)?,
        patient_fname: row.get(1)?,
        patient_lname: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
    })
}

// ═══════════════════════════════════════════
// Staff & doctors
// ═══════════════════════════════════════════

pub fn insert_staff(
    conn: &Connection,
    first_name: &str,
    last_name: &str,
    email: &str,
    emp_type: &str,
    dept_id: Option<i64>,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO staff (emp_fname, emp_lname, email, emp_type, dept_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![first_name, last_name, email, emp_type, dept_id],
    )
    .map_err(classify_write_error)?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_doctor(
    conn: &Connection,
    emp_id: i64,
    qualifications: Option<&str>,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (emp_id, qualifications) VALUES (?1, ?2)",
        params![emp_id, qualifications],
    )
    .map_err(classify_write_error)?;
    Ok(conn.last_insert_rowid())
}

pub fn get_staff_by_email(conn: &Connection, email: &str) -> Result<Option<Staff>, DatabaseError> {
    let staff = conn
        .query_row(
            "SELECT emp_id, emp_fname, emp_lname, email, emp_type, dept_id
             FROM staff WHERE email = ?1",
            params![email],
            staff_from_row,
        )
        .optional()?;
    Ok(staff)
}

pub fn get_doctor_by_emp_id(conn: &Connection, emp_id: i64) -> Result<Option<Doctor>, DatabaseError> {
    let doctor = conn
        .query_row(
            "SELECT doctor_id, emp_id, qualifications FROM doctors WHERE emp_id = ?1",
            params![emp_id],
            |row| {
                Ok(Doctor {
                    doctor_id: row.get(0)?,
                    emp_id: row.get(1)?,
                    qualifications: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(doctor)
}

pub fn staff_exists(conn: &Connection, emp_id: i64) -> Result<bool, DatabaseError> {
    exists(conn, "SELECT 1 FROM staff WHERE emp_id = ?1", emp_id)
}

pub fn doctor_exists(conn: &Connection, doctor_id: i64) -> Result<bool, DatabaseError> {
    exists(conn, "SELECT 1 FROM doctors WHERE doctor_id = ?1", doctor_id)
}

// ═══════════════════════════════════════════
// Patients
// ═══════════════════════════════════════════

pub fn insert_patient(
    conn: &Connection,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: Option<&str>,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (patient_fname, patient_lname, email, phone)
         VALUES (?1, ?2, ?3, ?4)",
        params![first_name, last_name, email, phone],
    )
    .map_err(classify_write_error)?;
    Ok(conn.last_insert_rowid())
}

pub fn get_patient_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<Patient>, DatabaseError> {
    let patient = conn
        .query_row(
            "SELECT patient_id, patient_fname, patient_lname, email, phone
             FROM patients WHERE email = ?1",
            params![email],
            patient_from_row,
        )
        .optional()?;
    Ok(patient)
}

pub fn patient_exists(conn: &Connection, patient_id: i64) -> Result<bool, DatabaseError> {
    exists(conn, "SELECT 1 FROM patients WHERE patient_id = ?1", patient_id)
}

fn exists(conn: &Connection, sql: &str, id: i64) -> Result<bool, DatabaseError> {
    let found = conn
        .query_row(sql, params![id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}
