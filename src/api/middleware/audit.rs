//! Access log middleware.
//!
//! Logs every API request with method, path, caller role and response
//! status, tagged with a fresh request id that is echoed back in
//! `X-Request-Id`. Runs innermost (after identity has injected
//! `IdentityContext`).

use std::time::Instant;

use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::identity::IdentityContext;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let role = req
        .extensions()
        .get::<IdentityContext>()
        .map(|id| id.role.clone())
        .unwrap_or_else(|| "anonymous".into());
    let started = Instant::now();

    let mut response = next.run(req).await;

    tracing::info!(
        %request_id,
        %method,
        path = %path,
        role = %role,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "API access"
    );

    if let Ok(val) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    response
}
