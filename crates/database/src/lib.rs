//! # Tracker Database Crate
//!
//! This crate is the parcel tracker's interface to its SQLite database. It
//! owns the `parcel` table and every SQL statement that touches it.
//!
//! ## Public API
//!
//! - `connect`: Opens a connection pool for a SQLite URL and makes sure the
//!   `parcel` table exists.
//! - `connect_in_memory`: A throwaway single-connection database, handy for tests.
//! - `ParcelStore`: Holds the pool and provides the parcel operations
//!   (`add`, `get`, `get_by_client`, `set_status`, `set_address`, `delete`).
//! - `DbError`: The error type returned by this crate. A missing parcel is
//!   reported as `DbError::NotFound`; driver failures are passed through
//!   unchanged as `DbError::Sqlx`.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_in_memory, ensure_schema};
pub use error::DbError;
pub use repository::ParcelStore;
