//! Place identifier resolution for Haulier.
//!
//! A [`Geocoder`] turns an opaque place identifier into a formatted address
//! and coordinates. The production implementation calls the Google Places
//! details API; every call goes out to the network, results are never cached.

mod dto;
mod error;
mod google;

use async_trait::async_trait;
use entities::ResolvedPlace;

pub use error::*;
pub use google::*;

/// Resolves place identifiers to addresses and coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves a place identifier.
    async fn resolve(&self, place_id: &str) -> GeocodeResult<ResolvedPlace>;
}
