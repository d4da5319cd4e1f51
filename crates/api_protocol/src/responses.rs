//! Response types.

use entities::{Location, Order, OrderView, Truck, UserPublic};
use serde::{Deserialize, Serialize};

// ============================================================================
// Auth Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: u64,
}

impl TokenResponse {
    /// Creates a bearer token response.
    pub fn bearer(access_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

// ============================================================================
// User Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserPublic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserPublic>,
}

// ============================================================================
// Truck Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckResponse {
    pub truck: Truck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTrucksResponse {
    pub trucks: Vec<Truck>,
    pub total_count: u32,
}

// ============================================================================
// Location Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListLocationsResponse {
    pub locations: Vec<Location>,
}

// ============================================================================
// Order Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order: Order,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderViewResponse {
    pub order: OrderView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOrdersResponse {
    pub orders: Vec<Order>,
    pub total_count: u32,
}
