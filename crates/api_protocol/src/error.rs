//! Error payloads returned by the API.

use serde::{Deserialize, Serialize};

/// Stable error codes carried in every error body.
pub mod error_codes {
    /// Malformed input, unknown enum value, bad identifier or a value the
    /// geocoder rejected.
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    /// The addressed record does not exist.
    pub const NOT_FOUND: &str = "NOT_FOUND";
    /// A unique key is already taken.
    pub const CONFLICT: &str = "CONFLICT";
    /// Missing, invalid or expired credentials.
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    /// Authenticated, but not allowed to touch the addressed record.
    pub const FORBIDDEN: &str = "FORBIDDEN";
    /// The server gave up on the request before finishing it.
    pub const TIMEOUT: &str = "TIMEOUT";
    /// Anything else. Details are logged, never returned.
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Error body: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    /// Creates an error body.
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }
}
