//! HTTP adapter for the operator-only admin surface.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::AdminAppState;
pub use routes::admin_router;
