//! HTTP adapter for the booking surface.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::BookingAppState;
pub use routes::booking_router;
