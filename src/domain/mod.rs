//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `scheduling` - Slot generation from weekly availability and conflict filtering
//! - `session` - Session aggregate and lifecycle state machine

pub mod foundation;
pub mod scheduling;
pub mod session;
