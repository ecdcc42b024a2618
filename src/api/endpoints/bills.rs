//! Bill endpoints: `/api/bills` and `/api/bills/:id`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::{json_body, parse_id, ApiContext, WriteResponse};
use crate::billing;
use crate::identity::IdentityContext;
use crate::models::{Bill, BillView};
use crate::validation::{today_utc, BillRequest};

pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
) -> Result<Json<Vec<BillView>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(billing::list_bills(&conn, &caller)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Result<Json<BillView>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.open_db()?;
    Ok(Json(billing::get_bill(&conn, &caller, id)?))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    payload: Result<Json<BillRequest>, JsonRejection>,
) -> Result<Json<WriteResponse<Bill>>, ApiError> {
    let req = json_body(payload)?;
    let mut conn = ctx.core.open_db()?;
    let created = billing::create_bill(&mut conn, &caller, &req, today_utc())?;
    Ok(Json(WriteResponse::with_data("Bill added successfully", created)))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    Path(id): Path<String>,
    payload: Result<Json<BillRequest>, JsonRejection>,
) -> Result<Json<WriteResponse<()>>, ApiError> {
    let id = parse_id(&id)?;
    let req = json_body(payload)?;
    let mut conn = ctx.core.open_db()?;
    billing::update_bill(&mut conn, &caller, id, &req, today_utc())?;
    Ok(Json(WriteResponse::done("Bill updated successfully")))
}

/// Deletes the bill and the patient's visit, room, medicine and report rows.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Result<Json<WriteResponse<()>>, ApiError> {
    let id = parse_id(&id)?;
    let mut conn = ctx.core.open_db()?;
    billing::delete_bill(&mut conn, &caller, id)?;
    Ok(Json(WriteResponse::done(
        "Bill, associated visit, room, medicines, and report deleted successfully",
    )))
}
