//! # auth-adapters
//!
//! `SessionVerifier` implementations.

#[cfg(feature = "auth-jwt")]
pub mod jwt;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtAuth;
