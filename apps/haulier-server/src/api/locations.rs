//! Location API endpoints.

use api_protocol::{requests::*, responses::*};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::error::ServerResult;
use crate::extract::ApiJson;
use crate::state::SharedState;

/// Geocodes a place identifier and stores it.
pub async fn create_location(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<CreateLocationRequest>,
) -> ServerResult<(StatusCode, Json<LocationResponse>)> {
    let location = state.locations.create(request).await?;
    Ok((StatusCode::CREATED, Json(LocationResponse { location })))
}

pub async fn list_locations(
    State(state): State<SharedState>,
) -> ServerResult<Json<ListLocationsResponse>> {
    let locations = state.locations.list().await?;
    Ok(Json(ListLocationsResponse { locations }))
}

pub async fn get_location(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ServerResult<Json<LocationResponse>> {
    let location = state.locations.get(&id).await?;
    Ok(Json(LocationResponse { location }))
}

/// Updates a location, geocoding the new place identifier if one is given.
pub async fn update_location(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateLocationRequest>,
) -> ServerResult<Json<LocationResponse>> {
    let location = state.locations.update(&id, request).await?;
    Ok(Json(LocationResponse { location }))
}

pub async fn delete_location(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    state.locations.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
