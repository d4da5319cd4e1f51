//! API endpoints.

pub mod auth;
pub mod locations;
pub mod orders;
pub mod trucks;
pub mod users;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::middleware::require_auth;
use crate::state::SharedState;

/// Creates the API router with all endpoints.
pub fn create_router(state: SharedState) -> Router {
    let protected = Router::new()
        // Auth endpoints
        .route("/auth/me", get(auth::me))
        // User endpoints
        .route("/users", get(users::list_users))
        .route(
            "/users/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        // Truck endpoints
        .route("/trucks", post(trucks::create_truck).get(trucks::list_trucks))
        .route(
            "/trucks/{id}",
            get(trucks::get_truck)
                .patch(trucks::update_truck)
                .delete(trucks::delete_truck),
        )
        // Location endpoints
        .route(
            "/locations",
            post(locations::create_location).get(locations::list_locations),
        )
        .route(
            "/locations/{id}",
            get(locations::get_location)
                .patch(locations::update_location)
                .delete(locations::delete_location),
        )
        // Order endpoints
        .route("/orders", post(orders::create_order).get(orders::list_orders))
        .route(
            "/orders/{id}",
            get(orders::get_order)
                .patch(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/orders/{id}/status", patch(orders::update_order_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        // Health check
        .route("/health", get(health_check))
        .merge(protected)
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
