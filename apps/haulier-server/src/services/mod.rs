//! Domain services behind the HTTP handlers.
//!
//! Each service receives the store handles it needs at construction time.

pub mod auth;
pub mod locations;
pub mod orders;
pub mod trucks;
pub mod users;

pub use self::auth::AuthService;
pub use locations::LocationService;
pub use orders::OrderService;
pub use trucks::TruckService;
pub use users::UserService;

use uuid::Uuid;

use crate::error::{ServerError, ServerResult};

/// Parses a resource identifier, naming the field in the error.
pub(crate) fn parse_id(field: &str, raw: &str) -> ServerResult<Uuid> {
    raw.trim()
        .parse()
        .map_err(|_| ServerError::InvalidArgument(format!("Invalid {field} id: {raw}")))
}

/// Parses an optional identifier.
pub(crate) fn parse_optional_id(field: &str, raw: Option<&str>) -> ServerResult<Option<Uuid>> {
    raw.map(|raw| parse_id(field, raw)).transpose()
}

/// Lower-cases and trims an email, then checks its shape.
pub(crate) fn normalize_email(raw: &str) -> ServerResult<String> {
    let email = raw.trim().to_lowercase();

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ServerError::InvalidArgument(format!(
            "Invalid email address: {raw}"
        )));
    }
    Ok(email)
}

/// Checks password requirements before hashing.
pub(crate) fn validate_password(password: &str) -> ServerResult<()> {
    if password.chars().count() < ::auth::MIN_PASSWORD_LENGTH {
        return Err(ServerError::InvalidArgument(format!(
            "Password must be at least {} characters",
            ::auth::MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Trims an optional text field, treating blank values as absent.
pub(crate) fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use entities::ResolvedPlace;
    use geocoding::{GeocodeError, GeocodeResult, Geocoder};

    /// Geocoder answering from a fixed table and counting calls.
    #[derive(Debug, Default)]
    pub struct StaticGeocoder {
        places: HashMap<String, ResolvedPlace>,
        calls: AtomicUsize,
    }

    impl StaticGeocoder {
        pub fn with_place(mut self, place_id: &str, address: &str) -> Self {
            self.places.insert(
                place_id.to_string(),
                ResolvedPlace {
                    address: address.to_string(),
                    latitude: 19.4,
                    longitude: -99.1,
                },
            );
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn shared(self) -> Arc<Self> {
            Arc::new(self)
        }
    }

    #[async_trait]
    impl Geocoder for StaticGeocoder {
        async fn resolve(&self, place_id: &str) -> GeocodeResult<ResolvedPlace> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.places
                .get(place_id)
                .cloned()
                .ok_or_else(|| GeocodeError::InvalidPlace {
                    status: "NOT_FOUND".to_string(),
                    message: None,
                })
        }
    }

    /// Geocoder standing in for a server without an API key.
    #[derive(Debug, Default)]
    pub struct UnconfiguredGeocoder;

    #[async_trait]
    impl Geocoder for UnconfiguredGeocoder {
        async fn resolve(&self, _place_id: &str) -> GeocodeResult<ResolvedPlace> {
            Err(GeocodeError::MissingApiKey)
        }
    }
}
