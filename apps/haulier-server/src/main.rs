//! Haulier Server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use geocoding::GooglePlacesGeocoder;
use haulier_server::{
    config::{Config, StoreBackend},
    create_app, create_state, init_tracing,
    state::Stores,
};
use resource_store::{MemoryStore, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        store_backend = ?config.store_backend,
        "Starting Haulier Server"
    );

    let stores = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("database URL is not configured"))?;
            let store = PgStore::connect(url, config.database_max_connections).await?;
            tracing::info!("Connected to PostgreSQL");
            Stores::from_backend(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Stores::from_backend(MemoryStore::new())
        }
    };

    let geocoder = GooglePlacesGeocoder::new(
        &config.geocoding_base_url,
        config.google_api_key.clone(),
        config.geocoding_timeout,
    )?;
    if !geocoder.has_api_key() {
        tracing::warn!("GOOGLE_API_KEY is not set; location writes will fail");
    }

    let state = create_state(config.clone(), stores, Arc::new(geocoder))?;
    let app = create_app(state);

    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
