//! Reqwest-backed Google Places details client.

use std::time::Duration;

use async_trait::async_trait;
use entities::ResolvedPlace;
use reqwest::{Client, Url};

use crate::dto::PlaceDetailsResponseDto;
use crate::{GeocodeError, GeocodeResult, Geocoder};

/// Production Places API host.
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://maps.googleapis.com";

const DETAILS_PATH: &str = "/maps/api/place/details/json";
const DETAILS_FIELDS: &str = "formatted_address,geometry";

/// Geocoder backed by the Google Places details endpoint.
pub struct GooglePlacesGeocoder {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl std::fmt::Debug for GooglePlacesGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GooglePlacesGeocoder")
            .field("base_url", &self.base_url.as_str())
            .field("api_key_configured", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl GooglePlacesGeocoder {
    /// Builds a client with an explicit request timeout.
    ///
    /// A missing API key is accepted here; every resolution then fails with
    /// [`GeocodeError::MissingApiKey`] without touching the network.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> GeocodeResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    /// Returns true if an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn details_url(&self, place_id: &str, api_key: &str) -> GeocodeResult<Url> {
        let mut url = self.base_url.join(DETAILS_PATH)?;
        url.query_pairs_mut()
            .append_pair("place_id", place_id)
            .append_pair("fields", DETAILS_FIELDS)
            .append_pair("key", api_key);
        Ok(url)
    }
}

#[async_trait]
impl Geocoder for GooglePlacesGeocoder {
    async fn resolve(&self, place_id: &str) -> GeocodeResult<ResolvedPlace> {
        let api_key = self.api_key.as_deref().ok_or(GeocodeError::MissingApiKey)?;
        let url = self.details_url(place_id, api_key)?;

        tracing::debug!(place_id = %place_id, "Resolving place identifier");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::HttpStatus(status.as_u16()));
        }

        let body: PlaceDetailsResponseDto = response
            .json()
            .await
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;

        let resolved = body.into_resolved();
        if let Err(GeocodeError::InvalidPlace { status, .. }) = &resolved {
            tracing::info!(place_id = %place_id, status = %status, "Place identifier rejected");
        }
        resolved
    }
}
