//! Shared domain primitives.
//!
//! Value objects and enums used across the scheduling and session modules.

mod cancelled_by;
mod errors;
mod ids;
mod payment_status;
mod rating;
mod session_status;
mod session_type;
mod timestamp;

pub use cancelled_by::CancelledBy;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{SessionId, UserId};
pub use payment_status::{PaymentStatus, RefundStatus};
pub use rating::Rating;
pub use session_status::SessionStatus;
pub use session_type::SessionType;
pub use timestamp::Timestamp;
