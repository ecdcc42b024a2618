//! Shared types for the HTTP layer.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::core_state::CoreState;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Write acknowledgement: `{ success, message, data? }`.
#[derive(Debug, Serialize)]
pub struct WriteResponse<T: Serialize> {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> WriteResponse<T> {
    pub fn with_data(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message,
            data: Some(data),
        }
    }
}

impl WriteResponse<()> {
    pub fn done(message: &'static str) -> Self {
        Self {
            success: true,
            message,
            data: None,
        }
    }
}

/// Unwrap a JSON body, reporting a malformed one in the API's error shape.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Parse a numeric path identifier.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid ID format".into()))
}
