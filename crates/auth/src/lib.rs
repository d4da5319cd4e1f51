//! Password and JWT authentication for Haulier.
//!
//! This crate provides:
//! - Salted argon2 password hashing and verification
//! - JWT bearer token generation and validation

mod error;
mod jwt;
mod password;

pub use error::*;
pub use jwt::*;
pub use password::*;

/// Default JWT expiration time in hours.
pub const DEFAULT_JWT_EXPIRATION_HOURS: u64 = 24;

/// Longest accepted token lifetime in hours (one year).
pub const MAX_JWT_EXPIRATION_HOURS: u64 = 8760;

/// Default JWT issuer.
pub const DEFAULT_JWT_ISSUER: &str = "haulier";
