//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Layers (outermost → innermost):
//! CORS → Cache-Control → Identity → Audit → Handler.
//! CORS sits outside identity so browser preflights are answered without
//! caller headers.

use std::sync::Arc;

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router. `cors_origin` restricts browser access to one
/// origin; `None` allows any.
pub fn api_router(core: Arc<CoreState>, cors_origin: Option<HeaderValue>) -> Router {
    let ctx = ApiContext::new(core);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let protected = Router::new()
        .route(
            "/appointments",
            get(endpoints::appointments::list).post(endpoints::appointments::create),
        )
        .route(
            "/appointments/:id",
            get(endpoints::appointments::detail)
                .put(endpoints::appointments::update)
                .delete(endpoints::appointments::delete),
        )
        .route(
            "/doctors/:id/slots",
            get(endpoints::appointments::available_slots),
        )
        .route(
            "/bills",
            get(endpoints::bills::list).post(endpoints::bills::create),
        )
        .route(
            "/bills/:id",
            get(endpoints::bills::detail)
                .put(endpoints::bills::update)
                .delete(endpoints::bills::delete),
        )
        .route(
            "/departments",
            get(endpoints::departments::list).post(endpoints::departments::create),
        )
        .route(
            "/departments/:id",
            get(endpoints::departments::detail)
                .put(endpoints::departments::update)
                .delete(endpoints::departments::delete),
        )
        .route(
            "/ratings",
            get(endpoints::ratings::list).post(endpoints::ratings::create),
        )
        .route(
            "/ratings/:id",
            get(endpoints::ratings::detail)
                .put(endpoints::ratings::update)
                .delete(endpoints::ratings::delete),
        )
        .with_state(ctx.clone())
        // Middleware stack (innermost first, outermost last):
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::middleware::from_fn(middleware::identity::require_identity));

    let open = Router::new()
        .route("/health", get(endpoints::health::check))
        .with_state(ctx);

    Router::new()
        .nest("/api", protected.merge(open))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(cors_layer(cors_origin))
}

fn cors_layer(origin: Option<HeaderValue>) -> CorsLayer {
    let allow_origin = match origin {
        Some(origin) => AllowOrigin::exact(origin),
        None => AllowOrigin::any(),
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static("x-user-email"),
            HeaderName::from_static("x-user-role"),
        ])
        .expose_headers([HeaderName::from_static("x-request-id")])
}
