//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod booking;

pub use booking::{
    AcceptBookingCommand, AcceptBookingHandler, BookingPolicy, CancelBookingCommand,
    CancelBookingHandler, CreateBookingCommand, CreateBookingHandler, GetBookingHandler,
    GetBookingQuery, ListSlotsHandler, ListSlotsQuery,
};
