//! Booking-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, UserId};

/// Errors surfaced by the booking operations.
///
/// `SlotConflict` is distinct from generic validation so clients can
/// re-query fresh slots instead of showing a form error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Session was not found.
    NotFound(SessionId),
    /// Mentor does not exist or has no mentor profile.
    MentorNotFound(UserId),
    /// Student does not exist.
    StudentNotFound(UserId),
    /// The requested slot is not offered or already occupied.
    SlotUnavailable,
    /// The slot was raced away between validation and commit.
    SlotConflict,
    /// Booking attempted with less than the required lead time.
    LeadTimeViolation { minimum_minutes: i64 },
    /// Caller is not a party to this session.
    Forbidden,
    /// Invalid state for the requested transition.
    InvalidState(String),
    /// Required field missing or malformed.
    ValidationFailed { field: String, message: String },
    /// The booking charge was declined or failed.
    PaymentFailed(String),
    /// Infrastructure error.
    Infrastructure(String),
}

impl BookingError {
    pub fn not_found(id: SessionId) -> Self {
        BookingError::NotFound(id)
    }

    pub fn mentor_not_found(id: UserId) -> Self {
        BookingError::MentorNotFound(id)
    }

    pub fn student_not_found(id: UserId) -> Self {
        BookingError::StudentNotFound(id)
    }

    pub fn lead_time(minimum_minutes: i64) -> Self {
        BookingError::LeadTimeViolation { minimum_minutes }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        BookingError::InvalidState(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BookingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn payment(message: impl Into<String>) -> Self {
        BookingError::PaymentFailed(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        BookingError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            BookingError::NotFound(_) => ErrorCode::SessionNotFound,
            BookingError::MentorNotFound(_) => ErrorCode::MentorNotFound,
            BookingError::StudentNotFound(_) => ErrorCode::StudentNotFound,
            BookingError::SlotUnavailable => ErrorCode::SlotUnavailable,
            BookingError::SlotConflict => ErrorCode::SlotConflict,
            BookingError::LeadTimeViolation { .. } => ErrorCode::LeadTimeViolation,
            BookingError::Forbidden => ErrorCode::Forbidden,
            BookingError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            BookingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            BookingError::PaymentFailed(_) => ErrorCode::PaymentRequired,
            BookingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            BookingError::NotFound(id) => format!("Session not found: {}", id),
            BookingError::MentorNotFound(id) => format!("Mentor not found: {}", id),
            BookingError::StudentNotFound(id) => format!("Student not found: {}", id),
            BookingError::SlotUnavailable => "The requested slot is not available".to_string(),
            BookingError::SlotConflict => {
                "The slot was booked by someone else; please pick another time".to_string()
            }
            BookingError::LeadTimeViolation { minimum_minutes } => format!(
                "Sessions must be booked at least {} minutes in advance",
                minimum_minutes
            ),
            BookingError::Forbidden => "Permission denied".to_string(),
            BookingError::InvalidState(msg) => format!("Invalid state: {}", msg),
            BookingError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            BookingError::PaymentFailed(msg) => format!("Payment failed: {}", msg),
            BookingError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for BookingError {}

impl From<DomainError> for BookingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::SessionNotFound => BookingError::Infrastructure(err.to_string()),
            ErrorCode::Forbidden => BookingError::Forbidden,
            ErrorCode::SlotUnavailable => BookingError::SlotUnavailable,
            ErrorCode::SlotConflict => BookingError::SlotConflict,
            ErrorCode::InvalidStateTransition => BookingError::InvalidState(err.message.clone()),
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => BookingError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message.clone(),
            },
            _ => BookingError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainError;

    #[test]
    fn codes_match_variants() {
        assert_eq!(BookingError::SlotConflict.code(), ErrorCode::SlotConflict);
        assert_eq!(
            BookingError::lead_time(120).code(),
            ErrorCode::LeadTimeViolation
        );
        assert_eq!(
            BookingError::validation("subject", "empty").code(),
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn lead_time_message_names_the_minimum() {
        let err = BookingError::lead_time(120);
        assert!(err.to_string().contains("120"));
    }

    #[test]
    fn domain_validation_error_carries_field_detail() {
        let domain = DomainError::validation("meeting_url", "not allow-listed");
        let booking: BookingError = domain.into();
        match booking {
            BookingError::ValidationFailed { field, .. } => assert_eq!(field, "meeting_url"),
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}
