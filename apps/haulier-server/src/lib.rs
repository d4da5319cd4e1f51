//! Haulier Server
//!
//! HTTP backend for a freight marketplace: users register and log in, own
//! trucks, geocode pickup and dropoff locations, and place orders whose
//! status moves freely between the recognized values.

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod services;
pub mod state;

use std::sync::Arc;

use auth::{AuthResult, JwtConfig, JwtManager};
use axum::{BoxError, Router, error_handling::HandleErrorLayer};
use geocoding::Geocoder;
use tower::{ServiceBuilder, timeout::TimeoutLayer, timeout::error::Elapsed};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::error::ServerError;
use crate::state::{AppState, SharedState, Stores};

/// Creates the application router with all routes configured.
pub fn create_app(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let request_timeout = state.config.request_timeout;

    api::create_router(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Renders errors raised by the tower stack with the regular error body.
async fn handle_middleware_error(err: BoxError) -> ServerError {
    if err.is::<Elapsed>() {
        ServerError::Timeout
    } else {
        ServerError::Internal(format!("middleware error: {err}"))
    }
}

/// Creates the application state.
///
/// Fails when the JWT secret is unusable.
pub fn create_state(
    config: Config,
    stores: Stores,
    geocoder: Arc<dyn Geocoder>,
) -> AuthResult<SharedState> {
    let jwt_config =
        JwtConfig::new(config.jwt_secret.clone()).with_expiration_hours(config.jwt_expiration_hours);
    let jwt_manager = JwtManager::new(jwt_config)?;

    Ok(Arc::new(AppState::new(config, jwt_manager, stores, geocoder)))
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
