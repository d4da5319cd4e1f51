//! Truck management.

use std::sync::Arc;

use api_protocol::requests::{CreateTruckRequest, ListTrucksQuery, UpdateTruckRequest};
use chrono::Utc;
use entities::Truck;
use resource_store::{TruckFilter, TruckStore, UserStore};
use uuid::Uuid;

use super::{clean_text, parse_id, parse_optional_id};
use crate::error::{ServerError, ServerResult};

#[derive(Clone)]
pub struct TruckService {
    trucks: Arc<dyn TruckStore>,
    users: Arc<dyn UserStore>,
}

impl TruckService {
    pub fn new(trucks: Arc<dyn TruckStore>, users: Arc<dyn UserStore>) -> Self {
        Self { trucks, users }
    }

    /// Creates a truck for an existing user.
    pub async fn create(&self, request: CreateTruckRequest) -> ServerResult<Truck> {
        let user_id = parse_id("user", &request.user)?;
        self.ensure_owner(user_id).await?;

        let mut truck = Truck::new(user_id);
        truck.year = clean_text(request.year);
        truck.color = clean_text(request.color);
        truck.plates = clean_text(request.plates);

        let truck = self.trucks.create_truck(truck).await?;

        tracing::info!(truck_id = %truck.id, user_id = %user_id, "Truck created");

        Ok(truck)
    }

    pub async fn list(&self, query: ListTrucksQuery) -> ServerResult<(Vec<Truck>, u32)> {
        let filter = TruckFilter {
            user_id: parse_optional_id("user", query.user.as_deref())?,
            limit: query.limit,
            offset: query.offset,
        };
        Ok(self.trucks.list_trucks(filter).await?)
    }

    pub async fn get(&self, id: &str) -> ServerResult<Truck> {
        let id = parse_id("truck", id)?;
        self.find(id).await
    }

    /// Applies the present fields; a blank text field clears it.
    pub async fn update(&self, id: &str, request: UpdateTruckRequest) -> ServerResult<Truck> {
        let id = parse_id("truck", id)?;
        let mut truck = self.find(id).await?;

        if let Some(user) = request.user {
            let user_id = parse_id("user", &user)?;
            self.ensure_owner(user_id).await?;
            truck.user_id = user_id;
        }
        if request.year.is_some() {
            truck.year = clean_text(request.year);
        }
        if request.color.is_some() {
            truck.color = clean_text(request.color);
        }
        if request.plates.is_some() {
            truck.plates = clean_text(request.plates);
        }
        truck.updated_at = Utc::now();

        let truck = self.trucks.update_truck(truck).await?;

        tracing::info!(truck_id = %truck.id, "Truck updated");

        Ok(truck)
    }

    pub async fn delete(&self, id: &str) -> ServerResult<()> {
        let id = parse_id("truck", id)?;
        self.trucks.delete_truck(id).await?;

        tracing::info!(truck_id = %id, "Truck deleted");

        Ok(())
    }

    async fn find(&self, id: Uuid) -> ServerResult<Truck> {
        self.trucks
            .get_truck(id)
            .await?
            .ok_or_else(|| ServerError::NotFound("Truck not found".to_string()))
    }

    async fn ensure_owner(&self, user_id: Uuid) -> ServerResult<()> {
        match self.users.get_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(ServerError::InvalidArgument(format!(
                "User {user_id} does not exist"
            ))),
        }
    }
}
