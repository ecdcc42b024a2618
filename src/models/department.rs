use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    #[serde(rename = "Dept_ID")]
    pub dept_id: i64,
    #[serde(rename = "Dept_head")]
    pub dept_head: String,
    #[serde(rename = "Dept_name")]
    pub dept_name: String,
    #[serde(rename = "Emp_Count")]
    pub emp_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDepartment {
    pub dept_head: String,
    pub dept_name: String,
    pub emp_count: i64,
}
