use serde::{Deserialize, Serialize};

/// A hospital employee. Doctors are staff with a matching `doctors` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub emp_id: i64,
    pub emp_fname: String,
    pub emp_lname: String,
    pub email: String,
    pub emp_type: String,
    pub dept_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub doctor_id: i64,
    pub emp_id: i64,
    pub qualifications: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: i64,
    pub patient_fname: String,
    pub patient_lname: String,
    pub email: String,
    pub phone: Option<String>,
}
