//! HTTP middleware.

pub mod auth;

pub use self::auth::*;
