//! Truck entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A truck owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truck {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user ID.
    pub user_id: Uuid,
    /// Model year.
    pub year: Option<String>,
    /// Paint color.
    pub color: Option<String>,
    /// License plates.
    pub plates: Option<String>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Truck {
    /// Creates a new truck for the given owner.
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            year: None,
            color: None,
            plates: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the model year.
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    /// Sets the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the plates.
    pub fn with_plates(mut self, plates: impl Into<String>) -> Self {
        self.plates = Some(plates.into());
        self
    }

    /// Builds the summary embedded in order views.
    pub fn to_summary(&self) -> TruckSummary {
        TruckSummary {
            id: self.id,
            year: self.year.clone(),
            color: self.color.clone(),
            plates: self.plates.clone(),
        }
    }
}

/// Truck fields joined into an order view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruckSummary {
    pub id: Uuid,
    pub year: Option<String>,
    pub color: Option<String>,
    pub plates: Option<String>,
}
