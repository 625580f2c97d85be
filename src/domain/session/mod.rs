//! Session aggregate and lifecycle state machine.

mod aggregate;
mod errors;
mod meeting_link;

pub use aggregate::{Session, MAX_SUBJECT_LENGTH};
pub use errors::BookingError;
pub use meeting_link::{MeetingLink, MeetingProvider};
