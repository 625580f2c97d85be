//! PostgreSQL adapters - sqlx-backed implementations of the ports.

mod mentor_profile_reader;
mod session_store;
mod user_directory;

pub use mentor_profile_reader::PostgresProfileReader;
pub use session_store::PostgresSessionStore;
pub use user_directory::PostgresUserDirectory;
