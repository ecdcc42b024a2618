//! Inbound write validation.
//!
//! Request bodies are deserialized loosely (every field an optional JSON
//! value) so that a missing field, a wrong type and an out-of-range value
//! all surface as a readable `ValidationError` instead of a body-parse
//! rejection. Each validator checks fields in a fixed order and returns
//! the first rule broken:
//!
//! presence → parse/format → range → length → temporal
//!
//! Validators are pure: "today" is passed in.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::models::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<TimeSlotError> for ValidationError {
    fn from(err: TimeSlotError) -> Self {
        Self(err.to_string())
    }
}

/// The current UTC calendar day. Past-date checks compare against this.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

// ═══════════════════════════════════════════════════════════
// Raw request bodies
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppointmentRequest {
    #[serde(rename = "Patient_ID")]
    pub patient_id: Option<Value>,
    #[serde(rename = "Doctor_ID")]
    pub doctor_id: Option<Value>,
    #[serde(rename = "Date")]
    pub date: Option<Value>,
    #[serde(rename = "Time")]
    pub time: Option<Value>,
    #[serde(rename = "Scheduled_On")]
    pub scheduled_on: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BillRequest {
    #[serde(rename = "Patient_ID")]
    pub patient_id: Option<Value>,
    #[serde(rename = "Date_Issued")]
    pub date_issued: Option<Value>,
    #[serde(rename = "Description")]
    pub description: Option<Value>,
    #[serde(rename = "Amount")]
    pub amount: Option<Value>,
    #[serde(rename = "Payment_Status")]
    pub payment_status: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DepartmentRequest {
    #[serde(rename = "Dept_head")]
    pub dept_head: Option<Value>,
    #[serde(rename = "Dept_name")]
    pub dept_name: Option<Value>,
    #[serde(rename = "Emp_Count")]
    pub emp_count: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RatingRequest {
    #[serde(rename = "Emp_ID")]
    pub emp_id: Option<Value>,
    #[serde(rename = "Rating")]
    pub rating: Option<Value>,
    #[serde(rename = "Comments")]
    pub comments: Option<Value>,
    #[serde(rename = "Date")]
    pub date: Option<Value>,
}

// ═══════════════════════════════════════════════════════════
// Field helpers
// ═══════════════════════════════════════════════════════════

/// A field counts as present unless it is absent, `null`, or a blank string.
/// Numeric zero is present; range checks reject it with a better message.
fn present(value: &Option<Value>) -> Option<&Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v),
    }
}

fn require<'a>(value: &'a Option<Value>, name: &str) -> Result<&'a Value, ValidationError> {
    present(value).ok_or_else(|| ValidationError::new(format!("{name} cannot be empty")))
}

fn all_present(values: &[&Option<Value>]) -> Result<(), ValidationError> {
    values.iter().try_for_each(|v| given(v).map(|_| ()))
}

fn given(value: &Option<Value>) -> Result<&Value, ValidationError> {
    present(value).ok_or_else(|| ValidationError::new("All fields are required"))
}

/// Integers arrive as JSON numbers or numeric strings.
fn integer(value: &Value, name: &str) -> Result<i64, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ValidationError::new(format!("{name} must be a whole number")))
}

fn number(value: &Value, name: &str) -> Result<f64, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| ValidationError::new(format!("{name} must be a number")))
}

fn text(value: &Value, name: &str) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        _ => Err(ValidationError::new(format!("{name} must be text"))),
    }
}

/// Like `text`, but keeps surrounding whitespace.
fn verbatim(value: &Value, name: &str) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(ValidationError::new(format!("{name} must be text"))),
    }
}

fn optional_text(value: &Option<Value>, name: &str) -> Result<Option<String>, ValidationError> {
    present(value).map(|v| text(v, name)).transpose()
}

/// Dates arrive as `YYYY-MM-DD`, or as a full RFC 3339 timestamp whose
/// UTC calendar day is taken.
fn date(value: &Value, name: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::new(format!("{name} must be a date in YYYY-MM-DD format"));
    let raw = match value {
        Value::String(s) => s.trim(),
        _ => return Err(invalid()),
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| invalid())
}

fn slot(value: &Value) -> Result<TimeSlot, ValidationError> {
    match value {
        Value::String(s) => Ok(s.parse::<TimeSlot>()?),
        _ => Err(TimeSlotError::Format.into()),
    }
}

fn not_in_past(day: NaiveDate, today: NaiveDate, name: &str) -> Result<(), ValidationError> {
    if day < today {
        return Err(ValidationError::new(format!("{name} cannot be in the past")));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════
// Validators
// ═══════════════════════════════════════════════════════════

pub fn validate_new_appointment(
    req: &AppointmentRequest,
    today: NaiveDate,
) -> Result<NewAppointment, ValidationError> {
    let patient_id = require(&req.patient_id, "Patient_ID")?;
    let doctor_id = require(&req.doctor_id, "Doctor_ID")?;
    let booked = require(&req.date, "Date")?;
    let time = require(&req.time, "Time")?;
    let scheduled_on = require(&req.scheduled_on, "Scheduled_On")?;

    let appt = NewAppointment {
        patient_id: integer(patient_id, "Patient_ID")?,
        doctor_id: integer(doctor_id, "Doctor_ID")?,
        date: date(booked, "Date")?,
        time: slot(time)?,
        scheduled_on: date(scheduled_on, "Scheduled_On")?,
    };

    not_in_past(appt.scheduled_on, today, "Scheduled_On")?;
    not_in_past(appt.date, today, "Date")?;
    Ok(appt)
}

/// Rescheduling. `Date` (the booking day) is ignored if sent.
pub fn validate_appointment_update(
    req: &AppointmentRequest,
    today: NaiveDate,
) -> Result<AppointmentChanges, ValidationError> {
    let scheduled_on = require(&req.scheduled_on, "Scheduled_On")?;
    let time = require(&req.time, "Time")?;
    let doctor_id = require(&req.doctor_id, "Doctor_ID")?;
    let patient_id = require(&req.patient_id, "Patient_ID")?;

    let changes = AppointmentChanges {
        patient_id: integer(patient_id, "Patient_ID")?,
        doctor_id: integer(doctor_id, "Doctor_ID")?,
        time: slot(time)?,
        scheduled_on: date(scheduled_on, "Scheduled_On")?,
    };

    not_in_past(changes.scheduled_on, today, "Scheduled_On")?;
    Ok(changes)
}

pub fn validate_new_bill(req: &BillRequest, today: NaiveDate) -> Result<NewBill, ValidationError> {
    let bill = validate_bill_update(req, today)?;
    Ok(NewBill {
        patient_id: bill.patient_id,
        date_issued: bill.date_issued,
        description: bill.description,
        amount: bill.amount,
        payment_status: bill
            .payment_status
            .unwrap_or_else(|| DEFAULT_PAYMENT_STATUS.to_string()),
    })
}

/// Same rules as a new bill, but an omitted description or payment
/// status stays unset so the stored value survives.
pub fn validate_bill_update(
    req: &BillRequest,
    today: NaiveDate,
) -> Result<BillChanges, ValidationError> {
    all_present(&[&req.date_issued, &req.amount, &req.patient_id])?;

    let bill = BillChanges {
        patient_id: integer(given(&req.patient_id)?, "Patient_ID")?,
        date_issued: date(given(&req.date_issued)?, "Date_Issued")?,
        description: optional_text(&req.description, "Description")?,
        amount: number(given(&req.amount)?, "Amount")?,
        payment_status: optional_text(&req.payment_status, "Payment_Status")?,
    };

    if bill.amount <= 0.0 {
        return Err(ValidationError::new("Amount must be greater than zero"));
    }
    not_in_past(bill.date_issued, today, "Date_Issued")?;
    Ok(bill)
}

/// Shared by department create and update.
pub fn validate_department(req: &DepartmentRequest) -> Result<NewDepartment, ValidationError> {
    all_present(&[&req.dept_head, &req.dept_name, &req.emp_count])?;

    let dept = NewDepartment {
        dept_head: text(given(&req.dept_head)?, "Dept_head")?,
        dept_name: text(given(&req.dept_name)?, "Dept_name")?,
        emp_count: integer(given(&req.emp_count)?, "Emp_Count")?,
    };

    if dept.emp_count < 1 {
        return Err(ValidationError::new("Employee count must be at least 1"));
    }
    if dept.dept_head.chars().count() < 2 {
        return Err(ValidationError::new(
            "Department head must be at least 2 characters long",
        ));
    }
    if dept.dept_name.chars().count() < 2 {
        return Err(ValidationError::new(
            "Department name must be at least 2 characters long",
        ));
    }
    Ok(dept)
}

/// Shared by rating create and update.
pub fn validate_rating(req: &RatingRequest) -> Result<NewRating, ValidationError> {
    all_present(&[&req.emp_id, &req.rating, &req.comments, &req.date])?;

    let rating = NewRating {
        emp_id: integer(given(&req.emp_id)?, "Emp_ID")?,
        rating: integer(given(&req.rating)?, "Rating")?,
        comments: verbatim(given(&req.comments)?, "Comments")?,
        date: date(given(&req.date)?, "Date")?,
    };

    if rating.emp_id < 1 {
        return Err(ValidationError::new("Staff ID cannot be less than 1"));
    }
    if rating.rating < 1 {
        return Err(ValidationError::new("Rating must be at least 1"));
    }
    if rating.comments.chars().count() > MAX_COMMENT_CHARS {
        return Err(ValidationError::new(format!(
            "Comments must be maximum {MAX_COMMENT_CHARS} characters long"
        )));
    }
    Ok(rating)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 10).unwrap()
    }

    fn appt_req(body: Value) -> AppointmentRequest {
        serde_json::from_value(body).unwrap()
    }

    fn err<T: std::fmt::Debug>(result: Result<T, ValidationError>) -> String {
        result.unwrap_err().0
    }

    #[test]
    fn appointment_valid_body_is_typed() {
        let req = appt_req(json!({
            "Patient_ID": 3, "Doctor_ID": "7", "Date": "2026-05-10",
            "Time": "14:30", "Scheduled_On": "2026-05-12"
        }));
        let appt = validate_new_appointment(&req, today()).unwrap();
        assert_eq!(appt.patient_id, 3);
        assert_eq!(appt.doctor_id, 7);
        assert_eq!(appt.time, TimeSlot::new(14, 30).unwrap());
        assert_eq!(appt.scheduled_on, NaiveDate::from_ymd_opt(2026, 5, 12).unwrap());
    }

    #[test]
    fn appointment_presence_is_reported_in_field_order() {
        let req = appt_req(json!({ "Doctor_ID": 1, "Time": "" }));
        assert_eq!(err(validate_new_appointment(&req, today())), "Patient_ID cannot be empty");

        let req = appt_req(json!({ "Patient_ID": 1, "Doctor_ID": 1, "Date": "2026-05-10", "Time": "  " }));
        assert_eq!(err(validate_new_appointment(&req, today())), "Time cannot be empty");

        let req = appt_req(json!({ "Patient_ID": 1, "Doctor_ID": null }));
        assert_eq!(err(validate_new_appointment(&req, today())), "Doctor_ID cannot be empty");
    }

    #[test]
    fn appointment_past_dates_are_rejected() {
        let req = appt_req(json!({
            "Patient_ID": 1, "Doctor_ID": 1, "Date": "2026-05-09",
            "Time": "09:00", "Scheduled_On": "2026-05-09"
        }));
        assert_eq!(err(validate_new_appointment(&req, today())), "Scheduled_On cannot be in the past");

        let req = appt_req(json!({
            "Patient_ID": 1, "Doctor_ID": 1, "Date": "2026-05-09",
            "Time": "09:00", "Scheduled_On": "2026-05-10"
        }));
        assert_eq!(err(validate_new_appointment(&req, today())), "Date cannot be in the past");
    }

    #[test]
    fn appointment_today_is_not_the_past() {
        let req = appt_req(json!({
            "Patient_ID": 1, "Doctor_ID": 1, "Date": "2026-05-10T23:15:00Z",
            "Time": "09:00", "Scheduled_On": "2026-05-10"
        }));
        assert!(validate_new_appointment(&req, today()).is_ok());
    }

    #[test]
    fn appointment_slot_must_be_on_the_half_hour() {
        let req = appt_req(json!({
            "Patient_ID": 1, "Doctor_ID": 1, "Date": "2026-05-10",
            "Time": "09:15", "Scheduled_On": "2026-05-11"
        }));
        assert_eq!(
            err(validate_new_appointment(&req, today())),
            "Time must fall on a 30-minute boundary"
        );

        let req = appt_req(json!({
            "Patient_ID": 1, "Doctor_ID": 1, "Date": "2026-05-10",
            "Time": "9am", "Scheduled_On": "2026-05-11"
        }));
        assert_eq!(err(validate_new_appointment(&req, today())), "Time must be in HH:MM format");
    }

    #[test]
    fn appointment_non_numeric_id_is_a_validation_failure() {
        let req = appt_req(json!({
            "Patient_ID": "abc", "Doctor_ID": 1, "Date": "2026-05-10",
            "Time": "09:00", "Scheduled_On": "2026-05-11"
        }));
        assert_eq!(err(validate_new_appointment(&req, today())), "Patient_ID must be a whole number");
    }

    #[test]
    fn appointment_update_checks_scheduled_on_first_and_ignores_date() {
        let req = appt_req(json!({ "Patient_ID": 1 }));
        assert_eq!(err(validate_appointment_update(&req, today())), "Scheduled_On cannot be empty");

        let req = appt_req(json!({
            "Patient_ID": 1, "Doctor_ID": 2, "Date": "1999-01-01",
            "Time": "10:00", "Scheduled_On": "2026-06-01"
        }));
        let changes = validate_appointment_update(&req, today()).unwrap();
        assert_eq!(changes.doctor_id, 2);
    }

    #[test]
    fn bill_requires_core_fields() {
        let req: BillRequest = serde_json::from_value(json!({ "Patient_ID": 1, "Amount": 50 })).unwrap();
        assert_eq!(err(validate_new_bill(&req, today())), "All fields are required");
    }

    #[test]
    fn bill_amount_and_date_rules() {
        let req: BillRequest = serde_json::from_value(json!({
            "Patient_ID": 1, "Amount": 0, "Date_Issued": "2026-05-10"
        }))
        .unwrap();
        assert_eq!(err(validate_new_bill(&req, today())), "Amount must be greater than zero");

        let req: BillRequest = serde_json::from_value(json!({
            "Patient_ID": 1, "Amount": "12.5", "Date_Issued": "2026-05-01"
        }))
        .unwrap();
        assert_eq!(err(validate_new_bill(&req, today())), "Date_Issued cannot be in the past");
    }

    #[test]
    fn bill_payment_status_defaults_to_pending() {
        let req: BillRequest = serde_json::from_value(json!({
            "Patient_ID": 1, "Amount": 80.25, "Date_Issued": "2026-05-10",
            "Description": "  X-ray  ", "Payment_Status": ""
        }))
        .unwrap();
        let bill = validate_new_bill(&req, today()).unwrap();
        assert_eq!(bill.payment_status, "Pending");
        assert_eq!(bill.description.as_deref(), Some("X-ray"));
        assert_eq!(bill.amount, 80.25);
    }

    #[test]
    fn bill_update_leaves_omitted_status_unset() {
        let req: BillRequest = serde_json::from_value(json!({
            "Patient_ID": 1, "Amount": 95, "Date_Issued": "2026-05-10"
        }))
        .unwrap();
        let changes = validate_bill_update(&req, today()).unwrap();
        assert_eq!(changes.payment_status, None);
        assert_eq!(changes.description, None);
        assert_eq!(changes.amount, 95.0);
    }

    #[test]
    fn department_zero_employees_is_reported_before_short_names() {
        let req: DepartmentRequest =
            serde_json::from_value(json!({ "Dept_head": "A", "Dept_name": "X", "Emp_Count": 0 }))
                .unwrap();
        assert_eq!(err(validate_department(&req)), "Employee count must be at least 1");
    }

    #[test]
    fn department_length_rules() {
        let req: DepartmentRequest =
            serde_json::from_value(json!({ "Dept_head": " A ", "Dept_name": "Xray", "Emp_Count": 5 }))
                .unwrap();
        assert_eq!(
            err(validate_department(&req)),
            "Department head must be at least 2 characters long"
        );

        let req: DepartmentRequest =
            serde_json::from_value(json!({ "Dept_head": "Al", "Dept_name": "X", "Emp_Count": 5 }))
                .unwrap();
        assert_eq!(
            err(validate_department(&req)),
            "Department name must be at least 2 characters long"
        );
    }

    #[test]
    fn department_valid_body() {
        let req: DepartmentRequest =
            serde_json::from_value(json!({ "Dept_head": "Al", "Dept_name": "Xray", "Emp_Count": 5 }))
                .unwrap();
        let dept = validate_department(&req).unwrap();
        assert_eq!(dept.dept_name, "Xray");
        assert_eq!(dept.emp_count, 5);
    }

    #[test]
    fn department_non_numeric_count_fails_cleanly() {
        let req: DepartmentRequest =
            serde_json::from_value(json!({ "Dept_head": "Al", "Dept_name": "Xray", "Emp_Count": "many" }))
                .unwrap();
        assert_eq!(err(validate_department(&req)), "Emp_Count must be a whole number");
    }

    fn rating_req(comments: &str) -> RatingRequest {
        serde_json::from_value(json!({
            "Emp_ID": 4, "Rating": 5, "Comments": comments, "Date": "2026-05-10"
        }))
        .unwrap()
    }

    #[test]
    fn rating_comment_of_thirty_chars_is_accepted() {
        let comments = "a".repeat(30);
        let rating = validate_rating(&rating_req(&comments)).unwrap();
        assert_eq!(rating.comments.len(), 30);
    }

    #[test]
    fn rating_comment_of_thirty_one_chars_is_rejected() {
        let comments = "a".repeat(31);
        assert_eq!(
            err(validate_rating(&rating_req(&comments))),
            "Comments must be maximum 30 characters long"
        );
    }

    #[test]
    fn rating_comment_length_counts_characters_not_bytes() {
        let comments = "é".repeat(30);
        assert!(validate_rating(&rating_req(&comments)).is_ok());
    }

    #[test]
    fn rating_comment_whitespace_counts_toward_the_limit() {
        let comments = format!("  {}", "a".repeat(29));
        assert_eq!(
            err(validate_rating(&rating_req(&comments))),
            "Comments must be maximum 30 characters long"
        );

        let rating = validate_rating(&rating_req(" ok ")).unwrap();
        assert_eq!(rating.comments, " ok ");
    }

    #[test]
    fn rating_range_rules() {
        let req: RatingRequest = serde_json::from_value(json!({
            "Emp_ID": -2, "Rating": 3, "Comments": "ok", "Date": "2026-05-10"
        }))
        .unwrap();
        assert_eq!(err(validate_rating(&req)), "Staff ID cannot be less than 1");

        let req: RatingRequest = serde_json::from_value(json!({
            "Emp_ID": 2, "Rating": 0, "Comments": "ok", "Date": "2026-05-10"
        }))
        .unwrap();
        assert_eq!(err(validate_rating(&req)), "Rating must be at least 1");
    }

    #[test]
    fn rating_missing_field() {
        let req: RatingRequest =
            serde_json::from_value(json!({ "Emp_ID": 2, "Rating": 3, "Comments": "ok" })).unwrap();
        assert_eq!(err(validate_rating(&req)), "All fields are required");
    }
}
