//! Adapters - Implementations of ports for external systems.
//!
//! Each adapter family lives in its own module:
//! - `memory` - in-memory port implementations for tests and local runs
//! - `postgres` - PostgreSQL persistence
//! - `payment` - payment gateway integrations
//! - `notify` - notification delivery
//! - `jobs` - background services
//! - `http` - Axum HTTP surface

pub mod http;
pub mod jobs;
pub mod memory;
pub mod notify;
pub mod payment;
pub mod postgres;

pub use jobs::{AutoDeclineMonitor, AutoDeclineMonitorConfig, SweepReport};
pub use memory::{InMemoryProfileReader, InMemorySessionStore, InMemoryUserDirectory};
pub use notify::LogNotifier;
pub use payment::MockPaymentProvider;
pub use postgres::{PostgresProfileReader, PostgresSessionStore, PostgresUserDirectory};
