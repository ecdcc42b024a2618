//! HTTP API.
//!
//! All record routes are nested under `/api/` behind the identity
//! middleware: Identity → Audit → Handler. `/api/health` is open.
//!
//! `api_router()` returns a `Router` that can be mounted on any axum
//! server; `server` owns the listening lifecycle.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server_on, ApiServer, ServerError};
pub use types::ApiContext;
