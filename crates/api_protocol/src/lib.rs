//! HTTP request and response definitions for the Haulier API
//!
//! Request bodies carry identifiers and statuses as plain strings so that the
//! server can report malformed values as `INVALID_ARGUMENT` with a specific
//! reason instead of a generic deserialization rejection.

mod error;
pub mod requests;
pub mod responses;

pub use error::*;
