//! Order API endpoints.

use api_protocol::{requests::*, responses::*};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::error::ServerResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::SharedState;

/// Creates an order.
pub async fn create_order(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<CreateOrderRequest>,
) -> ServerResult<(StatusCode, Json<OrderResponse>)> {
    let order = state.orders.create(request).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse { order })))
}

/// Lists orders.
pub async fn list_orders(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<ListOrdersQuery>,
) -> ServerResult<Json<ListOrdersResponse>> {
    let (orders, total_count) = state.orders.list(query).await?;
    Ok(Json(ListOrdersResponse {
        orders,
        total_count,
    }))
}

/// Gets the aggregated view of an order.
pub async fn get_order(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ServerResult<Json<OrderViewResponse>> {
    let order = state.orders.get_order_view(&id).await?;
    Ok(Json(OrderViewResponse { order }))
}

/// Updates an order.
pub async fn update_order(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateOrderRequest>,
) -> ServerResult<Json<OrderResponse>> {
    let order = state.orders.update(&id, request).await?;
    Ok(Json(OrderResponse { order }))
}

/// Updates the status of an order.
pub async fn update_order_status(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateOrderStatusRequest>,
) -> ServerResult<Json<OrderResponse>> {
    let order = state.orders.update_status(&id, &request.status).await?;
    Ok(Json(OrderResponse { order }))
}

/// Deletes an order.
pub async fn delete_order(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    state.orders.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
