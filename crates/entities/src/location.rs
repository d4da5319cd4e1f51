//! Location entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Address and coordinates resolved from a place identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A geocoded location.
///
/// The derived fields always come from resolving `place_id`; two locations
/// with the same place identifier carry the same resolved data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique identifier.
    pub id: Uuid,
    /// External place identifier, unique across locations.
    pub place_id: String,
    /// Formatted address.
    pub address: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Location {
    /// Creates a new location from a place identifier and its resolution.
    pub fn new(place_id: impl Into<String>, resolved: ResolvedPlace) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            place_id: place_id.into(),
            address: resolved.address,
            latitude: resolved.latitude,
            longitude: resolved.longitude,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the place identifier and every field derived from it.
    pub fn apply_resolution(&mut self, place_id: impl Into<String>, resolved: ResolvedPlace) {
        self.place_id = place_id.into();
        self.address = resolved.address;
        self.latitude = resolved.latitude;
        self.longitude = resolved.longitude;
        self.updated_at = Utc::now();
    }

    /// Builds the summary embedded in order views.
    pub fn to_summary(&self) -> LocationSummary {
        LocationSummary {
            id: self.id,
            address: self.address.clone(),
        }
    }
}

/// Location fields joined into an order view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub id: Uuid,
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(address: &str) -> ResolvedPlace {
        ResolvedPlace {
            address: address.to_string(),
            latitude: 19.4326,
            longitude: -99.1332,
        }
    }

    #[test]
    fn test_location_from_resolution() {
        let location = Location::new("ChIJ-place", resolved("Zócalo, CDMX"));

        assert_eq!(location.place_id, "ChIJ-place");
        assert_eq!(location.address, "Zócalo, CDMX");
        assert_eq!(location.latitude, 19.4326);
    }

    #[test]
    fn test_apply_resolution_rewrites_derived_fields() {
        let mut location = Location::new("old-place", resolved("Old address"));
        let id = location.id;

        location.apply_resolution(
            "new-place",
            ResolvedPlace {
                address: "New address".to_string(),
                latitude: 1.0,
                longitude: 2.0,
            },
        );

        assert_eq!(location.id, id);
        assert_eq!(location.place_id, "new-place");
        assert_eq!(location.address, "New address");
        assert_eq!(location.longitude, 2.0);
    }
}
