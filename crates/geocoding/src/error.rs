//! Geocoding error types.

use thiserror::Error;

/// Errors that can occur while resolving a place identifier.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The provider rejected the place identifier.
    #[error("place identifier rejected by geocoder (status {status})")]
    InvalidPlace {
        status: String,
        message: Option<String>,
    },

    /// No API key is configured.
    #[error("geocoding API key is not configured")]
    MissingApiKey,

    /// The endpoint URL could not be built.
    #[error("invalid geocoding endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// The request did not complete.
    #[error("geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("geocoding provider returned HTTP {0}")]
    HttpStatus(u16),

    /// The response body could not be interpreted.
    #[error("invalid geocoding response: {0}")]
    Decode(String),
}

impl GeocodeError {
    /// Returns true when the caller supplied a bad place identifier, as
    /// opposed to a configuration or transport failure.
    pub fn is_invalid_place(&self) -> bool {
        matches!(self, Self::InvalidPlace { .. })
    }
}

/// Result type for geocoding operations.
pub type GeocodeResult<T> = Result<T, GeocodeError>;
