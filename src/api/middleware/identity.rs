//! Caller identity middleware.
//!
//! The upstream authenticator forwards the verified caller as
//! `X-User-Email` and `X-User-Role`. Both must be present and non-blank;
//! the role is passed through unparsed so that an unknown role reaches
//! the handlers and is refused there as `Forbidden`.

use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::identity::IdentityContext;

pub const EMAIL_HEADER: &str = "X-User-Email";
pub const ROLE_HEADER: &str = "X-User-Role";

/// Require an identity and inject `IdentityContext` for downstream handlers.
pub async fn require_identity(mut req: Request<axum::body::Body>, next: Next) -> Response {
    match identity_from_headers(req.headers()) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

fn identity_from_headers(headers: &HeaderMap) -> Result<IdentityContext, ApiError> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::Unauthorized)
    };

    let email = header(EMAIL_HEADER)?;
    let role = header(ROLE_HEADER)?;
    Ok(IdentityContext::new(email, role))
}
