//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the booking core and the outside world. Adapters implement these
//! ports.
//!
//! - `SessionStore` - session persistence with conditional insert and
//!   compare-and-set cancellation
//! - `PaymentProvider` - charge/refund against the payment gateway
//! - `Notifier` - fire-and-forget party notifications
//! - `UserDirectory` - mentor/student existence lookup
//! - `MentorProfileReader` - weekly availability and pricing, read-only

mod mentor_profile_reader;
mod notifier;
mod payment_provider;
mod session_store;
mod user_directory;

pub use mentor_profile_reader::{MentorProfileReader, MentorScheduleProfile};
pub use notifier::{Notifier, NotifyError};
pub use payment_provider::{Charge, ChargeRequest, PaymentError, PaymentErrorCode, PaymentProvider, Refund};
pub use session_store::{InsertOutcome, SessionStore};
pub use user_directory::{UserDirectory, UserRecord};
