//! Payment provider port for external payment processing.
//!
//! The booking core treats payments as opaque and mockable: a charge at
//! booking time, a refund on cancellation. The core performs no
//! retries; a failure is recorded as-is on the session record.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode};

/// Port for payment gateway integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Charge the student's payment method for a booking.
    async fn charge(&self, request: ChargeRequest) -> Result<Charge, PaymentError>;

    /// Refund a previous charge, fully when `amount_minor` is `None`.
    async fn refund(
        &self,
        payment_id: &str,
        amount_minor: Option<i64>,
    ) -> Result<Refund, PaymentError>;
}

/// Request to charge a payment method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeRequest {
    /// Amount in minor currency units.
    pub amount_minor: i64,

    /// ISO currency code, lowercase.
    pub currency: String,

    /// Opaque payment method reference supplied by the client.
    pub payment_method: String,

    /// Human-readable statement description.
    pub description: String,
}

/// Successful charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Charge {
    /// Provider's charge ID, stored on the session as `payment_id`.
    pub payment_id: String,
}

/// Successful refund.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refund {
    /// Provider's refund ID.
    pub refund_id: String,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create a card declined error.
    pub fn card_declined(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::CardDeclined, message)
    }

    /// Create a not found error.
    pub fn not_found(resource: &str) -> Self {
        Self::new(PaymentErrorCode::NotFound, format!("{} not found", resource))
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let code = match err.code {
            PaymentErrorCode::CardDeclined | PaymentErrorCode::InsufficientFunds => {
                ErrorCode::PaymentRequired
            }
            PaymentErrorCode::NotFound => ErrorCode::ExternalServiceError,
            _ => ErrorCode::ExternalServiceError,
        };
        DomainError::new(code, err.message)
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue or timeout.
    NetworkError,

    /// Card was declined.
    CardDeclined,

    /// Insufficient funds.
    InsufficientFunds,

    /// Charge or refund target not found.
    NotFound,

    /// Provider API error.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentErrorCode::NetworkError)
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::CardDeclined => "card_declined",
            PaymentErrorCode::InsufficientFunds => "insufficient_funds",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn network_errors_are_retryable() {
        assert!(PaymentErrorCode::NetworkError.is_retryable());
        assert!(!PaymentErrorCode::CardDeclined.is_retryable());
    }

    #[test]
    fn payment_error_display() {
        let err = PaymentError::card_declined("Your card was declined");
        assert!(err.to_string().contains("card_declined"));
        assert!(err.to_string().contains("Your card was declined"));
    }

    #[test]
    fn declined_charge_maps_to_payment_required() {
        let err: DomainError = PaymentError::card_declined("Declined").into();
        assert_eq!(err.code, ErrorCode::PaymentRequired);
    }
}
