//! In-memory port implementations.
//!
//! Used by integration tests and local runs without a database. The
//! session store honors the same concurrency contract as the Postgres
//! adapter: conditional insert on slot identity and compare-and-set
//! cancellation, both under a single write lock.

mod mentor_profile_reader;
mod session_store;
mod user_directory;

pub use mentor_profile_reader::InMemoryProfileReader;
pub use session_store::InMemorySessionStore;
pub use user_directory::InMemoryUserDirectory;
