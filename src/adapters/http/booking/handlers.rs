//! HTTP handlers for booking endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::booking::{
    AcceptBookingCommand, AcceptBookingHandler, CancelBookingCommand, CancelBookingHandler,
    CreateBookingCommand, CreateBookingHandler, GetBookingHandler, GetBookingQuery,
    ListSlotsHandler, ListSlotsQuery,
};
use crate::domain::foundation::{CancelledBy, SessionId, UserId};
use crate::domain::session::BookingError;

use super::dto::{
    AcceptBookingRequest, CancelBookingRequest, CreateBookingRequest, ErrorResponse,
    SessionResponse, SlotListResponse, SlotsQuery,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct BookingAppState {
    list_slots: Arc<ListSlotsHandler>,
    create: Arc<CreateBookingHandler>,
    accept: Arc<AcceptBookingHandler>,
    cancel: Arc<CancelBookingHandler>,
    get: Arc<GetBookingHandler>,
}

impl BookingAppState {
    pub fn new(
        list_slots: Arc<ListSlotsHandler>,
        create: Arc<CreateBookingHandler>,
        accept: Arc<AcceptBookingHandler>,
        cancel: Arc<CancelBookingHandler>,
        get: Arc<GetBookingHandler>,
    ) -> Self {
        Self {
            list_slots,
            create,
            accept,
            cancel,
            get,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/mentors/:id/slots?date=YYYY-MM-DD - List a mentor's slots
pub async fn list_slots(
    State(state): State<BookingAppState>,
    Path(mentor_id): Path<String>,
    Query(params): Query<SlotsQuery>,
) -> Response {
    let mentor_id = match parse_user_id(&mentor_id, "mentor id") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = ListSlotsQuery {
        mentor_id: mentor_id.clone(),
        date: params.date,
    };

    match state.list_slots.handle(query).await {
        Ok(slots) => {
            let response = SlotListResponse {
                mentor_id: mentor_id.to_string(),
                date: params.date,
                slots: slots.into_iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_booking_error(e),
    }
}

/// POST /api/bookings - Book a slot
pub async fn create_booking(
    State(state): State<BookingAppState>,
    headers: HeaderMap,
    Json(req): Json<CreateBookingRequest>,
) -> Response {
    let student_id = match caller_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let mentor_id = match parse_user_id(&req.mentor_id, "mentor id") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = CreateBookingCommand {
        student_id,
        mentor_id,
        scheduled_time: req.scheduled_time,
        subject: req.subject,
        session_type: req.session_type,
        payment_method: req.payment_method,
    };

    match state.create.handle(cmd).await {
        Ok(session) => {
            let response: SessionResponse = session.into();
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_booking_error(e),
    }
}

/// GET /api/bookings/:id - Fetch a booking
pub async fn get_booking(
    State(state): State<BookingAppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let requester = match caller_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = GetBookingQuery {
        session_id,
        requested_by: Some(requester),
    };

    match state.get.handle(query).await {
        Ok(session) => {
            let response: SessionResponse = session.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_booking_error(e),
    }
}

/// POST /api/bookings/:id/accept - Mentor accepts with a meeting link
pub async fn accept_booking(
    State(state): State<BookingAppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
    Json(req): Json<AcceptBookingRequest>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let mentor_id = match caller_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = AcceptBookingCommand {
        session_id,
        mentor_id,
        meeting_url: req.meeting_url,
    };

    match state.accept.handle(cmd).await {
        Ok(session) => {
            let response: SessionResponse = session.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_booking_error(e),
    }
}

/// POST /api/bookings/:id/cancel - Cancel a booking
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
    Json(req): Json<CancelBookingRequest>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let requester = match caller_id(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    // External callers never cancel as the system
    if req.cancelled_by == CancelledBy::System {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(
                "cancelled_by must be student or mentor",
            )),
        )
            .into_response();
    }

    let cmd = CancelBookingCommand {
        session_id,
        cancelled_by: req.cancelled_by,
        reason: req
            .reason
            .unwrap_or_else(|| "Cancelled by user".to_string()),
        requested_by: Some(requester),
    };

    match state.cancel.handle(cmd).await {
        Ok(session) => {
            let response: SessionResponse = session.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_booking_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers and error handling
// ════════════════════════════════════════════════════════════════════════════

/// Caller identity from the `x-user-id` header.
fn caller_id(headers: &HeaderMap) -> Result<UserId, Response> {
    let raw = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    parse_user_id(raw, "x-user-id header")
}

fn parse_user_id(raw: &str, what: &str) -> Result<UserId, Response> {
    UserId::new(raw).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(format!("Missing or invalid {}", what))),
        )
            .into_response()
    })
}

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid booking ID")),
        )
            .into_response()
    })
}

pub(crate) fn handle_booking_error(error: BookingError) -> Response {
    let status = match &error {
        BookingError::NotFound(_)
        | BookingError::MentorNotFound(_)
        | BookingError::StudentNotFound(_) => StatusCode::NOT_FOUND,
        BookingError::SlotUnavailable | BookingError::SlotConflict => StatusCode::CONFLICT,
        BookingError::LeadTimeViolation { .. }
        | BookingError::InvalidState(_)
        | BookingError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
        BookingError::Forbidden => StatusCode::FORBIDDEN,
        BookingError::PaymentFailed(_) => StatusCode::PAYMENT_REQUIRED,
        BookingError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = ErrorResponse::new(error.code().to_string(), error.message());
    (status, Json(body)).into_response()
}
