//! Geocoded locations.
//!
//! Writes resolve the place identifier through the [`Geocoder`] on every
//! call. A failed resolution leaves the store untouched.

use std::sync::Arc;

use api_protocol::requests::{CreateLocationRequest, UpdateLocationRequest};
use entities::Location;
use geocoding::Geocoder;
use resource_store::{LocationStore, StoreError};
use uuid::Uuid;

use super::parse_id;
use crate::error::{ServerError, ServerResult};

#[derive(Clone)]
pub struct LocationService {
    locations: Arc<dyn LocationStore>,
    geocoder: Arc<dyn Geocoder>,
}

impl LocationService {
    pub fn new(locations: Arc<dyn LocationStore>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            locations,
            geocoder,
        }
    }

    /// Resolves a place identifier and stores the result.
    pub async fn create(&self, request: CreateLocationRequest) -> ServerResult<Location> {
        let place_id = clean_place_id(&request.place_id)?;
        let resolved = self.geocoder.resolve(&place_id).await?;

        let location = self
            .locations
            .create_location(Location::new(place_id, resolved))
            .await
            .map_err(duplicate_place)?;

        tracing::info!(
            location_id = %location.id,
            place_id = %location.place_id,
            "Location created"
        );

        Ok(location)
    }

    pub async fn list(&self) -> ServerResult<Vec<Location>> {
        Ok(self.locations.list_locations().await?)
    }

    pub async fn get(&self, id: &str) -> ServerResult<Location> {
        let id = parse_id("location", id)?;
        self.find(id).await
    }

    /// Re-resolves the location when a place identifier is supplied.
    pub async fn update(
        &self,
        id: &str,
        request: UpdateLocationRequest,
    ) -> ServerResult<Location> {
        let id = parse_id("location", id)?;
        let mut location = self.find(id).await?;

        let Some(place_id) = request.place_id else {
            return Ok(location);
        };
        let place_id = clean_place_id(&place_id)?;
        let resolved = self.geocoder.resolve(&place_id).await?;
        location.apply_resolution(place_id, resolved);

        let location = self
            .locations
            .update_location(location)
            .await
            .map_err(duplicate_place)?;

        tracing::info!(location_id = %location.id, "Location re-resolved");

        Ok(location)
    }

    pub async fn delete(&self, id: &str) -> ServerResult<()> {
        let id = parse_id("location", id)?;
        self.locations.delete_location(id).await?;

        tracing::info!(location_id = %id, "Location deleted");

        Ok(())
    }

    async fn find(&self, id: Uuid) -> ServerResult<Location> {
        self.locations
            .get_location(id)
            .await?
            .ok_or_else(|| ServerError::NotFound("Location not found".to_string()))
    }
}

fn clean_place_id(raw: &str) -> ServerResult<String> {
    let place_id = raw.trim();
    if place_id.is_empty() {
        return Err(ServerError::InvalidArgument(
            "place_id must not be empty".to_string(),
        ));
    }
    Ok(place_id.to_string())
}

fn duplicate_place(err: StoreError) -> ServerError {
    match err {
        StoreError::AlreadyExists { .. } => {
            ServerError::Conflict("A location with this place_id already exists".to_string())
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use resource_store::MemoryStore;

    use super::*;
    use crate::services::test_support::{StaticGeocoder, UnconfiguredGeocoder};

    fn geocoder() -> Arc<StaticGeocoder> {
        StaticGeocoder::default()
            .with_place("place-dock", "1 Dock Rd")
            .with_place("place-yard", "9 Yard Ln")
            .shared()
    }

    fn create(place_id: &str) -> CreateLocationRequest {
        CreateLocationRequest {
            place_id: place_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_resolves_place() {
        let store = Arc::new(MemoryStore::new());
        let service = LocationService::new(store, geocoder());

        let location = service.create(create("place-dock")).await.unwrap();
        assert_eq!(location.place_id, "place-dock");
        assert_eq!(location.address, "1 Dock Rd");
        assert_eq!(location.latitude, 19.4);
    }

    #[tokio::test]
    async fn test_rejected_place_persists_nothing() {
        let store = Arc::new(MemoryStore::new());
        let service = LocationService::new(store.clone(), geocoder());

        let err = service.create(create("nowhere")).await.unwrap_err();
        assert!(matches!(err, ServerError::Geocoding(ref e) if e.is_invalid_place()));
        assert!(store.list_locations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_internal() {
        let store = Arc::new(MemoryStore::new());
        let service = LocationService::new(store.clone(), Arc::new(UnconfiguredGeocoder));

        let err = service.create(create("place-dock")).await.unwrap_err();
        assert_eq!(
            err.status_and_code().0,
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(store.list_locations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_place_conflicts() {
        let service = LocationService::new(Arc::new(MemoryStore::new()), geocoder());
        service.create(create("place-dock")).await.unwrap();

        let err = service.create(create("place-dock")).await.unwrap_err();
        assert!(matches!(err, ServerError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_blank_place_id_rejected_without_lookup() {
        let geocoder = geocoder();
        let service = LocationService::new(Arc::new(MemoryStore::new()), geocoder.clone());

        assert!(matches!(
            service.create(create("  ")).await,
            Err(ServerError::InvalidArgument(_))
        ));
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_update_re_resolves_every_time() {
        let geocoder = geocoder();
        let service = LocationService::new(Arc::new(MemoryStore::new()), geocoder.clone());
        let location = service.create(create("place-dock")).await.unwrap();
        let id = location.id.to_string();

        let moved = service
            .update(
                &id,
                UpdateLocationRequest {
                    place_id: Some("place-yard".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.address, "9 Yard Ln");
        assert_eq!(geocoder.calls(), 2);

        service
            .update(
                &id,
                UpdateLocationRequest {
                    place_id: Some("place-yard".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(geocoder.calls(), 3);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_stored_location() {
        let service = LocationService::new(Arc::new(MemoryStore::new()), geocoder());
        let location = service.create(create("place-dock")).await.unwrap();
        let id = location.id.to_string();

        let result = service
            .update(
                &id,
                UpdateLocationRequest {
                    place_id: Some("nowhere".to_string()),
                },
            )
            .await;
        assert!(result.is_err());
        assert_eq!(service.get(&id).await.unwrap(), location);
    }
}
