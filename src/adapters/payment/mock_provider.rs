//! Mock payment provider for testing and local runs.
//!
//! Provides a configurable implementation of `PaymentProvider`.
//! Supports error injection and call tracking so tests can assert on
//! the exact charge and refund traffic a flow produced.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{Charge, ChargeRequest, PaymentError, PaymentProvider, Refund};

/// Mock payment provider.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.fail_next_charge(PaymentError::card_declined("Test decline"));
///
/// let result = mock.charge(request).await;
/// assert!(result.is_err());
/// assert_eq!(mock.charge_count(), 1);
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    charges: Vec<ChargeRequest>,
    refunds: Vec<RefundCall>,
    next_charge_error: Option<PaymentError>,
    refund_error: Option<PaymentError>,
}

/// Recorded refund call.
#[derive(Debug, Clone)]
pub struct RefundCall {
    pub payment_id: String,
    pub amount_minor: Option<i64>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next charge with the given error, then recover.
    pub fn fail_next_charge(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_charge_error = Some(error);
    }

    /// Fail every refund with the given error until cleared.
    pub fn fail_refunds(&self, error: PaymentError) {
        self.inner.lock().unwrap().refund_error = Some(error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_charge_error = None;
        state.refund_error = None;
    }

    pub fn charge_count(&self) -> usize {
        self.inner.lock().unwrap().charges.len()
    }

    pub fn refund_count(&self) -> usize {
        self.inner.lock().unwrap().refunds.len()
    }

    /// All recorded charge requests.
    pub fn charges(&self) -> Vec<ChargeRequest> {
        self.inner.lock().unwrap().charges.clone()
    }

    /// All recorded refund calls.
    pub fn refunds(&self) -> Vec<RefundCall> {
        self.inner.lock().unwrap().refunds.clone()
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn charge(&self, request: ChargeRequest) -> Result<Charge, PaymentError> {
        let mut state = self.inner.lock().unwrap();
        state.charges.push(request);
        if let Some(error) = state.next_charge_error.take() {
            return Err(error);
        }
        Ok(Charge {
            payment_id: format!("pay_mock_{}", state.charges.len()),
        })
    }

    async fn refund(
        &self,
        payment_id: &str,
        amount_minor: Option<i64>,
    ) -> Result<Refund, PaymentError> {
        let mut state = self.inner.lock().unwrap();
        state.refunds.push(RefundCall {
            payment_id: payment_id.to_string(),
            amount_minor,
        });
        if let Some(error) = &state.refund_error {
            return Err(error.clone());
        }
        Ok(Refund {
            refund_id: format!("re_mock_{}", state.refunds.len()),
        })
    }
}
