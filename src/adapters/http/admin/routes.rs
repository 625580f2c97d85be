//! HTTP routes for admin endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{force_cancel, list_overdue, run_sweep, AdminAppState};

/// Creates the admin router. Mount behind an operator-only ingress.
pub fn admin_router(state: AdminAppState) -> Router {
    Router::new()
        .route("/admin/bookings/sweep", post(run_sweep))
        .route("/admin/bookings/overdue", get(list_overdue))
        .route("/admin/bookings/:id/cancel", post(force_cancel))
        .with_state(state)
}
