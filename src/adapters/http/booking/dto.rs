//! HTTP DTOs for booking endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing
//! independent evolution.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CancelledBy, PaymentStatus, RefundStatus, SessionStatus, SessionType, Timestamp,
};
use crate::domain::scheduling::Slot;
use crate::domain::session::Session;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Query parameters for listing a mentor's slots.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

/// Request to book a slot.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub mentor_id: String,
    pub scheduled_time: Timestamp,
    pub subject: String,
    pub payment_method: String,
    #[serde(default)]
    pub session_type: SessionType,
}

/// Request for a mentor to accept a booking.
#[derive(Debug, Clone, Deserialize)]
pub struct AcceptBookingRequest {
    pub meeting_url: String,
}

/// Request to cancel a booking.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelBookingRequest {
    pub cancelled_by: CancelledBy,
    #[serde(default)]
    pub reason: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A bookable slot.
#[derive(Debug, Clone, Serialize)]
pub struct SlotResponse {
    pub id: String,
    pub mentor_id: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: u32,
    pub price_minor: i64,
    pub currency: String,
    pub session_type: SessionType,
    pub is_available: bool,
}

impl From<Slot> for SlotResponse {
    fn from(slot: Slot) -> Self {
        Self {
            id: slot.id.clone(),
            mentor_id: slot.mentor_id.to_string(),
            start_time: slot.start_time.to_rfc3339(),
            end_time: slot.end_time().to_rfc3339(),
            duration_minutes: slot.duration_minutes,
            price_minor: slot.price_minor,
            currency: slot.currency,
            session_type: slot.session_type,
            is_available: slot.is_available,
        }
    }
}

/// List of slots for one mentor and date.
#[derive(Debug, Clone, Serialize)]
pub struct SlotListResponse {
    pub mentor_id: String,
    pub date: NaiveDate,
    pub slots: Vec<SlotResponse>,
}

/// Detailed session view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub student_id: String,
    pub mentor_id: String,
    pub scheduled_time: String,
    pub end_time: String,
    pub duration_minutes: u32,
    pub subject: String,
    pub session_type: SessionType,
    pub status: SessionStatus,
    pub auto_decline_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    pub price_minor: i64,
    pub currency: String,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_status: Option<RefundStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<CancelledBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            id: session.id().to_string(),
            student_id: session.student_id().to_string(),
            mentor_id: session.mentor_id().to_string(),
            scheduled_time: session.scheduled_time().to_rfc3339(),
            end_time: session.end_time().to_rfc3339(),
            duration_minutes: session.duration_minutes(),
            subject: session.subject().to_string(),
            session_type: session.session_type(),
            status: session.status(),
            auto_decline_at: session.auto_decline_at().to_rfc3339(),
            meeting_link: session.meeting_link().map(|l| l.url().to_string()),
            price_minor: session.price_minor(),
            currency: session.currency().to_string(),
            payment_status: session.payment_status(),
            refund_status: session.refund_status(),
            cancelled_by: session.cancelled_by(),
            cancellation_reason: session.cancellation_reason().map(str::to_string),
            created_at: session.created_at().to_rfc3339(),
            updated_at: session.updated_at().to_rfc3339(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }
}
