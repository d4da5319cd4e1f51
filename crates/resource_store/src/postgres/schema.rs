use chrono::{DateTime, Utc};
use entities::{Location, Order, OrderStatus, Truck, User};
use sqlx::FromRow;
use uuid::Uuid;

use crate::StoreError;

/// Tables are created on startup when missing. References between tables are
/// plain columns without foreign keys.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS trucks (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    year TEXT,
    color TEXT,
    plates TEXT,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_trucks_user_id ON trucks (user_id);

CREATE TABLE IF NOT EXISTS locations (
    id UUID PRIMARY KEY,
    place_id TEXT NOT NULL UNIQUE,
    address TEXT NOT NULL,
    latitude DOUBLE PRECISION NOT NULL,
    longitude DOUBLE PRECISION NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS orders (
    id UUID PRIMARY KEY,
    status TEXT NOT NULL DEFAULT 'created',
    user_id UUID NOT NULL,
    truck_id UUID NOT NULL,
    pickup_id UUID NOT NULL,
    dropoff_id UUID,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_orders_user_id ON orders (user_id);
CREATE INDEX IF NOT EXISTS idx_orders_truck_id ON orders (truck_id);
"#;

/// Database row for User
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for Truck
#[derive(Debug, FromRow)]
pub struct TruckRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub year: Option<String>,
    pub color: Option<String>,
    pub plates: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TruckRow> for Truck {
    fn from(row: TruckRow) -> Self {
        Truck {
            id: row.id,
            user_id: row.user_id,
            year: row.year,
            color: row.color,
            plates: row.plates,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for Location
#[derive(Debug, FromRow)]
pub struct LocationRow {
    pub id: Uuid,
    pub place_id: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Location {
            id: row.id,
            place_id: row.place_id,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for Order
#[derive(Debug, FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub status: String,
    pub user_id: Uuid,
    pub truck_id: Uuid,
    pub pickup_id: Uuid,
    pub dropoff_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row.status.parse().map_err(|e| StoreError::Corrupt {
            entity_type: "Order",
            reason: format!("{e} (order {})", row.id),
        })?;

        Ok(Order {
            id: row.id,
            status,
            user_id: row.user_id,
            truck_id: row.truck_id,
            pickup_id: row.pickup_id,
            dropoff_id: row.dropoff_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
