//! Truck API endpoints.

use api_protocol::{requests::*, responses::*};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::error::ServerResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::SharedState;

/// Creates a truck.
pub async fn create_truck(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<CreateTruckRequest>,
) -> ServerResult<(StatusCode, Json<TruckResponse>)> {
    let truck = state.trucks.create(request).await?;
    Ok((StatusCode::CREATED, Json(TruckResponse { truck })))
}

/// Lists trucks, optionally for one owner.
pub async fn list_trucks(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<ListTrucksQuery>,
) -> ServerResult<Json<ListTrucksResponse>> {
    let (trucks, total_count) = state.trucks.list(query).await?;
    Ok(Json(ListTrucksResponse {
        trucks,
        total_count,
    }))
}

/// Gets a truck by ID.
pub async fn get_truck(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ServerResult<Json<TruckResponse>> {
    let truck = state.trucks.get(&id).await?;
    Ok(Json(TruckResponse { truck }))
}

/// Updates a truck.
pub async fn update_truck(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateTruckRequest>,
) -> ServerResult<Json<TruckResponse>> {
    let truck = state.trucks.update(&id, request).await?;
    Ok(Json(TruckResponse { truck }))
}

/// Deletes a truck.
pub async fn delete_truck(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    state.trucks.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
