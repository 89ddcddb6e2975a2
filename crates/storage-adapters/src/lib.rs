//! # storage-adapters
//!
//! Datastore collaborators for ripple.
//!
//! - [`memory::InMemoryStore`]: always compiled, used for local runs and tests.
//! - `postgres::PostgresStore`: sqlx-backed, behind the `db-postgres` feature.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::InMemoryStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PostgresStore;
