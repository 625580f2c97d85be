//! HTTP adapters - REST API implementations.
//!
//! The booking surface and the admin surface each get their own router
//! and state. Callers are identified by the `x-user-id` header; the
//! admin router is expected to be mounted behind an operator-only
//! ingress.

pub mod admin;
pub mod booking;

pub use admin::{admin_router, AdminAppState};
pub use booking::{booking_router, BookingAppState};

use axum::{routing::get, Json, Router};
use serde_json::json;

/// GET /health - liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Router for operational endpoints.
pub fn health_router() -> Router {
    Router::new().route("/health", get(health))
}
