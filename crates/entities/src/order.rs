//! Order entity definitions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{LocationSummary, TruckSummary, UserSummary};

/// Status of an order.
///
/// Statuses form a flat set: any status may replace any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, nobody working on it yet.
    #[default]
    Created,
    /// A driver has taken the order.
    Assigned,
    /// Cargo picked up and on its way.
    InTransit,
    /// Cargo dropped off.
    Delivered,
    /// Order called off.
    Cancelled,
}

impl OrderStatus {
    /// Every recognized status.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Created,
        OrderStatus::Assigned,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Returns the wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Assigned => "assigned",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a recognized [`OrderStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid order status: {0}")]
pub struct ParseOrderStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseOrderStatusError(s.to_string()))
    }
}

/// An order as persisted, holding raw references to other records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier.
    pub id: Uuid,
    /// Current status.
    pub status: OrderStatus,
    /// Ordering user ID.
    pub user_id: Uuid,
    /// Assigned truck ID.
    pub truck_id: Uuid,
    /// Pickup location ID.
    pub pickup_id: Uuid,
    /// Dropoff location ID.
    pub dropoff_id: Option<Uuid>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new order in the `created` status.
    pub fn new(user_id: Uuid, truck_id: Uuid, pickup_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            status: OrderStatus::Created,
            user_id,
            truck_id,
            pickup_id,
            dropoff_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the dropoff location.
    pub fn with_dropoff(mut self, dropoff_id: Uuid) -> Self {
        self.dropoff_id = Some(dropoff_id);
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }
}

/// Denormalized read view of an order.
///
/// References are replaced by the whitelisted fields of the joined records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderView {
    pub id: Uuid,
    pub status: OrderStatus,
    pub user: UserSummary,
    pub truck: TruckSummary,
    pub pickup: LocationSummary,
    pub dropoff: Option<LocationSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
