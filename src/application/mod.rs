//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between
//! ports. Handlers own the side-effect ordering (validate, charge,
//! persist, notify); the domain owns the rules.

pub mod handlers;

pub use handlers::{
    // Booking handlers
    AcceptBookingCommand, AcceptBookingHandler,
    BookingPolicy,
    CancelBookingCommand, CancelBookingHandler,
    CreateBookingCommand, CreateBookingHandler,
    GetBookingHandler, GetBookingQuery,
    ListSlotsHandler, ListSlotsQuery,
};
