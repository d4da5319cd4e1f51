//! DTOs for decoding Places details responses.

use entities::ResolvedPlace;
use serde::Deserialize;

use crate::{GeocodeError, GeocodeResult};

const STATUS_OK: &str = "OK";

#[derive(Debug, Deserialize)]
pub(crate) struct PlaceDetailsResponseDto {
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) error_message: Option<String>,
    #[serde(default)]
    pub(crate) result: Option<PlaceResultDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaceResultDto {
    pub(crate) formatted_address: String,
    pub(crate) geometry: GeometryDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeometryDto {
    pub(crate) location: LatLngDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LatLngDto {
    pub(crate) lat: f64,
    pub(crate) lng: f64,
}

impl PlaceDetailsResponseDto {
    pub(crate) fn into_resolved(self) -> GeocodeResult<ResolvedPlace> {
        if self.status != STATUS_OK {
            return Err(GeocodeError::InvalidPlace {
                status: self.status,
                message: self.error_message,
            });
        }

        let result = self
            .result
            .ok_or_else(|| GeocodeError::Decode("status OK without a result".to_string()))?;
        let location = result.geometry.location;
        if !location.lat.is_finite() || !location.lng.is_finite() {
            return Err(GeocodeError::Decode(
                "result includes non-finite coordinates".to_string(),
            ));
        }

        Ok(ResolvedPlace {
            address: result.formatted_address,
            latitude: location.lat,
            longitude: location.lng,
        })
    }
}
