use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Payment status recorded when the request leaves it out.
pub const DEFAULT_PAYMENT_STATUS: &str = "Pending";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    #[serde(rename = "Bill_ID")]
    pub bill_id: i64,
    #[serde(rename = "Patient_ID")]
    pub patient_id: i64,
    #[serde(rename = "Date_Issued")]
    pub date_issued: NaiveDate,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Payment_Status")]
    pub payment_status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BillView {
    #[serde(flatten)]
    pub bill: Bill,
    #[serde(rename = "Patient_Name")]
    pub patient_name: String,
}

/// Validated input for a new bill.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    pub patient_id: i64,
    pub date_issued: NaiveDate,
    pub description: Option<String>,
    pub amount: f64,
    pub payment_status: String,
}

/// Validated input for a bill update. `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct BillChanges {
    pub patient_id: i64,
    pub date_issued: NaiveDate,
    pub description: Option<String>,
    pub amount: f64,
    pub payment_status: Option<String>,
}
