//! HTTP handlers for admin endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::adapters::jobs::AutoDeclineMonitor;
use crate::application::handlers::booking::{CancelBookingCommand, CancelBookingHandler};
use crate::domain::foundation::{CancelledBy, SessionId, Timestamp};
use crate::ports::SessionStore;

use super::super::booking::dto::{ErrorResponse, SessionResponse};
use super::super::booking::handlers::handle_booking_error;
use super::dto::{ForceCancelRequest, SweepResponse};

#[derive(Clone)]
pub struct AdminAppState {
    store: Arc<dyn SessionStore>,
    monitor: Arc<AutoDeclineMonitor>,
    canceller: Arc<CancelBookingHandler>,
}

impl AdminAppState {
    pub fn new(
        store: Arc<dyn SessionStore>,
        monitor: Arc<AutoDeclineMonitor>,
        canceller: Arc<CancelBookingHandler>,
    ) -> Self {
        Self {
            store,
            monitor,
            canceller,
        }
    }
}

/// POST /admin/bookings/sweep - Run one auto-decline sweep now
pub async fn run_sweep(State(state): State<AdminAppState>) -> Response {
    match state.monitor.run_once().await {
        Ok(report) => {
            info!(
                cancelled = report.cancelled,
                failed = report.failed,
                "manual auto-decline sweep completed"
            );
            (StatusCode::OK, Json(SweepResponse::from(report))).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.code.to_string(), e.message)),
        )
            .into_response(),
    }
}

/// GET /admin/bookings/overdue - List pending sessions past their deadline
pub async fn list_overdue(State(state): State<AdminAppState>) -> Response {
    match state.store.find_overdue_pending(&Timestamp::now()).await {
        Ok(sessions) => {
            let body: Vec<SessionResponse> = sessions.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.code.to_string(), e.message)),
        )
            .into_response(),
    }
}

/// POST /admin/bookings/:id/cancel - Operator cancel on a user's behalf
pub async fn force_cancel(
    State(state): State<AdminAppState>,
    Path(session_id): Path<String>,
    Json(req): Json<ForceCancelRequest>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid booking ID")),
            )
                .into_response()
        }
    };

    let cmd = CancelBookingCommand {
        session_id,
        cancelled_by: CancelledBy::System,
        reason: req.reason,
        requested_by: None,
    };

    match state.canceller.handle(cmd).await {
        Ok(session) => {
            info!(session_id = %session_id, "booking force-cancelled by operator");
            let response: SessionResponse = session.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_booking_error(e),
    }
}
