//! HTTP routes for booking endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    accept_booking, cancel_booking, create_booking, get_booking, list_slots, BookingAppState,
};

/// Creates the booking router with all endpoints.
pub fn booking_router(state: BookingAppState) -> Router {
    Router::new()
        .route("/mentors/:id/slots", get(list_slots))
        .route("/bookings", post(create_booking))
        .route("/bookings/:id", get(get_booking))
        .route("/bookings/:id/accept", post(accept_booking))
        .route("/bookings/:id/cancel", post(cancel_booking))
        .with_state(state)
}
