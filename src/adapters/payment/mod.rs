//! Payment gateway adapters.

mod mock_provider;

pub use mock_provider::MockPaymentProvider;
