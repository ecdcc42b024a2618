//! Department endpoints: `/api/departments` and `/api/departments/:id`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::{json_body, parse_id, ApiContext, WriteResponse};
use crate::departments;
use crate::identity::IdentityContext;
use crate::models::Department;
use crate::validation::DepartmentRequest;

pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
) -> Result<Json<Vec<Department>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(departments::list_departments(&conn, &caller)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Result<Json<Department>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.open_db()?;
    Ok(Json(departments::get_department(&conn, &caller, id)?))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    payload: Result<Json<DepartmentRequest>, JsonRejection>,
) -> Result<Json<WriteResponse<Department>>, ApiError> {
    let req = json_body(payload)?;
    let mut conn = ctx.core.open_db()?;
    let created = departments::create_department(&mut conn, &caller, &req)?;
    Ok(Json(WriteResponse::with_data("Department added successfully", created)))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    Path(id): Path<String>,
    payload: Result<Json<DepartmentRequest>, JsonRejection>,
) -> Result<Json<WriteResponse<()>>, ApiError> {
    let id = parse_id(&id)?;
    let req = json_body(payload)?;
    let mut conn = ctx.core.open_db()?;
    departments::update_department(&mut conn, &caller, id, &req)?;
    Ok(Json(WriteResponse::done("Department updated successfully")))
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Result<Json<WriteResponse<()>>, ApiError> {
    let id = parse_id(&id)?;
    let mut conn = ctx.core.open_db()?;
    departments::delete_department(&mut conn, &caller, id)?;
    Ok(Json(WriteResponse::done("Department deleted successfully")))
}
