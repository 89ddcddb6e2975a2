//! # domains
//!
//! Entities, port traits and the error taxonomy shared by every ripple crate.
//! Nothing in here performs I/O; adapters implement the ports.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::*;
pub use models::*;
pub use ports::*;
