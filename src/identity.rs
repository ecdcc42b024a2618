//! Caller identity: who is asking, and which staff/doctor/patient row they are.
//!
//! The upstream authenticator vouches for `{ email, role }`; this module
//! only maps that pair onto our records.

use std::str::FromStr;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{self, DatabaseError};
use crate::error::ServiceError;
use crate::models::enums::Role;

/// Authenticated caller, as supplied by the upstream auth layer.
///
/// `role` stays a raw string: an unrecognised role is not an
/// authentication failure, it is a request that nothing permits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityContext {
    pub email: String,
    pub role: String,
}

impl IdentityContext {
    pub fn new(email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: role.into(),
        }
    }

    /// The caller's role, or `Forbidden` if it is not one we know.
    pub fn role(&self) -> Result<Role, ServiceError> {
        Role::from_str(&self.role).map_err(|_| ServiceError::Forbidden)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffIdentity {
    pub emp_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorIdentity {
    pub doctor_id: i64,
    pub emp_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientIdentity {
    pub patient_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("{kind} not found")]
    NotFound { kind: &'static str, email: String },
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub fn resolve_staff(conn: &Connection, email: &str) -> Result<StaffIdentity, IdentityError> {
    let staff = db::get_staff_by_email(conn, email)?.ok_or_else(|| IdentityError::NotFound {
        kind: "Staff member",
        email: email.to_string(),
    })?;
    Ok(StaffIdentity {
        emp_id: staff.emp_id,
    })
}

/// A doctor is a staff member with a `doctors` row; either lookup may miss.
pub fn resolve_doctor(conn: &Connection, email: &str) -> Result<DoctorIdentity, IdentityError> {
    let staff = resolve_staff(conn, email)?;
    let doctor = db::get_doctor_by_emp_id(conn, staff.emp_id)?.ok_or_else(|| {
        IdentityError::NotFound {
            kind: "Doctor",
            email: email.to_string(),
        }
    })?;
    Ok(DoctorIdentity {
        doctor_id: doctor.doctor_id,
        emp_id: staff.emp_id,
    })
}

pub fn resolve_patient(conn: &Connection, email: &str) -> Result<PatientIdentity, IdentityError> {
    let patient = db::get_patient_by_email(conn, email)?.ok_or_else(|| IdentityError::NotFound {
        kind: "Patient",
        email: email.to_string(),
    })?;
    Ok(PatientIdentity {
        patient_id: patient.patient_id,
    })
}
