//! Rating endpoints: `/api/ratings` and `/api/ratings/:id`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::{json_body, parse_id, ApiContext, WriteResponse};
use crate::identity::IdentityContext;
use crate::models::{Rating, RatingView};
use crate::ratings;
use crate::validation::RatingRequest;

pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
) -> Result<Json<Vec<RatingView>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(ratings::list_ratings(&conn, &caller)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Result<Json<RatingView>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.open_db()?;
    Ok(Json(ratings::get_rating(&conn, &caller, id)?))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    payload: Result<Json<RatingRequest>, JsonRejection>,
) -> Result<Json<WriteResponse<Rating>>, ApiError> {
    let req = json_body(payload)?;
    let mut conn = ctx.core.open_db()?;
    let created = ratings::create_rating(&mut conn, &caller, &req)?;
    Ok(Json(WriteResponse::with_data("Rating added successfully", created)))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    Path(id): Path<String>,
    payload: Result<Json<RatingRequest>, JsonRejection>,
) -> Result<Json<WriteResponse<()>>, ApiError> {
    let id = parse_id(&id)?;
    let req = json_body(payload)?;
    let mut conn = ctx.core.open_db()?;
    ratings::update_rating(&mut conn, &caller, id, &req)?;
    Ok(Json(WriteResponse::done("Rating updated successfully")))
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Result<Json<WriteResponse<()>>, ApiError> {
    let id = parse_id(&id)?;
    let mut conn = ctx.core.open_db()?;
    ratings::delete_rating(&mut conn, &caller, id)?;
    Ok(Json(WriteResponse::done("Rating deleted successfully")))
}
