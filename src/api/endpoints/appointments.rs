//! Appointment endpoints.
//!
//! - `GET    /api/appointments`              list visible appointments
//! - `POST   /api/appointments`              book
//! - `GET    /api/appointments/:id`          one visible appointment
//! - `PUT    /api/appointments/:id`          reschedule
//! - `DELETE /api/appointments/:id`          cancel
//! - `GET    /api/doctors/:id/slots?date=`   free slots of a doctor's day

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{json_body, parse_id, ApiContext, WriteResponse};
use crate::appointments;
use crate::identity::IdentityContext;
use crate::models::{Appointment, AppointmentView, TimeSlot};
use crate::validation::{today_utc, AppointmentRequest};

pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
) -> Result<Json<Vec<AppointmentView>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(appointments::list_appointments(&conn, &caller)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Result<Json<AppointmentView>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.open_db()?;
    Ok(Json(appointments::get_appointment(&conn, &caller, id)?))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    payload: Result<Json<AppointmentRequest>, JsonRejection>,
) -> Result<Json<WriteResponse<Appointment>>, ApiError> {
    let req = json_body(payload)?;
    let mut conn = ctx.core.open_db()?;
    let created = appointments::create_appointment(&mut conn, &caller, &req, today_utc())?;
    Ok(Json(WriteResponse::with_data("Appointment added successfully", created)))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    Path(id): Path<String>,
    payload: Result<Json<AppointmentRequest>, JsonRejection>,
) -> Result<Json<WriteResponse<()>>, ApiError> {
    let id = parse_id(&id)?;
    let req = json_body(payload)?;
    let mut conn = ctx.core.open_db()?;
    appointments::update_appointment(&mut conn, &caller, id, &req, today_utc())?;
    Ok(Json(WriteResponse::done("Appointment updated successfully")))
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Result<Json<WriteResponse<()>>, ApiError> {
    let id = parse_id(&id)?;
    let mut conn = ctx.core.open_db()?;
    appointments::delete_appointment(&mut conn, &caller, id)?;
    Ok(Json(WriteResponse::done("Appointment deleted successfully")))
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: String,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    #[serde(rename = "Doctor_ID")]
    pub doctor_id: i64,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

pub async fn available_slots(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    Path(doctor_id): Path<String>,
    query: Result<Query<SlotsQuery>, QueryRejection>,
) -> Result<Json<SlotsResponse>, ApiError> {
    let doctor_id = parse_id(&doctor_id)?;
    let Query(query) =
        query.map_err(|_| ApiError::BadRequest("date query parameter is required".into()))?;
    let date = NaiveDate::parse_from_str(query.date.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest("date must be in YYYY-MM-DD format".into()))?;

    let conn = ctx.core.open_db()?;
    let slots = appointments::doctor_available_slots(&conn, &caller, doctor_id, date)?;
    Ok(Json(SlotsResponse {
        doctor_id,
        date,
        slots,
    }))
}
