//! In-memory resource store implementation for testing and local runs.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use entities::{Location, Order, OrderStatus, Truck, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    LocationStore, OrderFilter, OrderStore, StoreError, StoreResult, TruckFilter, TruckStore,
    UserStore,
};

/// In-memory store backing every resource trait.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    trucks: Arc<RwLock<HashMap<Uuid, Truck>>>,
    locations: Arc<RwLock<HashMap<Uuid, Location>>>,
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
}

impl MemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T>(mut items: Vec<T>, offset: Option<u32>, limit: Option<u32>) -> (Vec<T>, u32) {
    let total = items.len() as u32;

    if let Some(offset) = offset {
        items = items.into_iter().skip(offset as usize).collect();
    }
    if let Some(limit) = limit {
        items.truncate(limit as usize);
    }

    (items, total)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(StoreError::already_exists("User", user.id.to_string()));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::already_exists("User", user.email));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;
        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by_key(|u| u.created_at);
        Ok(result)
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(StoreError::not_found("User", user.id));
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(StoreError::already_exists("User", user.email));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if users.remove(&id).is_none() {
            return Err(StoreError::not_found("User", id));
        }
        Ok(())
    }
}

#[async_trait]
impl TruckStore for MemoryStore {
    async fn create_truck(&self, truck: Truck) -> StoreResult<Truck> {
        let mut trucks = self.trucks.write().await;
        if trucks.contains_key(&truck.id) {
            return Err(StoreError::already_exists("Truck", truck.id.to_string()));
        }
        trucks.insert(truck.id, truck.clone());
        Ok(truck)
    }

    async fn get_truck(&self, id: Uuid) -> StoreResult<Option<Truck>> {
        let trucks = self.trucks.read().await;
        Ok(trucks.get(&id).cloned())
    }

    async fn list_trucks(&self, filter: TruckFilter) -> StoreResult<(Vec<Truck>, u32)> {
        let trucks = self.trucks.read().await;
        let mut result: Vec<Truck> = trucks
            .values()
            .filter(|t| filter.user_id.is_none_or(|user_id| t.user_id == user_id))
            .cloned()
            .collect();
        result.sort_by_key(|t| t.created_at);

        Ok(paginate(result, filter.offset, filter.limit))
    }

    async fn update_truck(&self, truck: Truck) -> StoreResult<Truck> {
        let mut trucks = self.trucks.write().await;
        if !trucks.contains_key(&truck.id) {
            return Err(StoreError::not_found("Truck", truck.id));
        }
        trucks.insert(truck.id, truck.clone());
        Ok(truck)
    }

    async fn delete_truck(&self, id: Uuid) -> StoreResult<()> {
        let mut trucks = self.trucks.write().await;
        if trucks.remove(&id).is_none() {
            return Err(StoreError::not_found("Truck", id));
        }
        Ok(())
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn create_location(&self, location: Location) -> StoreResult<Location> {
        let mut locations = self.locations.write().await;
        if locations.contains_key(&location.id) {
            return Err(StoreError::already_exists(
                "Location",
                location.id.to_string(),
            ));
        }
        if locations.values().any(|l| l.place_id == location.place_id) {
            return Err(StoreError::already_exists("Location", location.place_id));
        }
        locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn get_location(&self, id: Uuid) -> StoreResult<Option<Location>> {
        let locations = self.locations.read().await;
        Ok(locations.get(&id).cloned())
    }

    async fn list_locations(&self) -> StoreResult<Vec<Location>> {
        let locations = self.locations.read().await;
        let mut result: Vec<Location> = locations.values().cloned().collect();
        result.sort_by_key(|l| l.created_at);
        Ok(result)
    }

    async fn update_location(&self, location: Location) -> StoreResult<Location> {
        let mut locations = self.locations.write().await;
        if !locations.contains_key(&location.id) {
            return Err(StoreError::not_found("Location", location.id));
        }
        if locations
            .values()
            .any(|l| l.id != location.id && l.place_id == location.place_id)
        {
            return Err(StoreError::already_exists("Location", location.place_id));
        }
        locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn delete_location(&self, id: Uuid) -> StoreResult<()> {
        let mut locations = self.locations.write().await;
        if locations.remove(&id).is_none() {
            return Err(StoreError::not_found("Location", id));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, order: Order) -> StoreResult<Order> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(StoreError::already_exists("Order", order.id.to_string()));
        }
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn list_orders(&self, filter: OrderFilter) -> StoreResult<(Vec<Order>, u32)> {
        let orders = self.orders.read().await;
        let mut result: Vec<Order> = orders
            .values()
            .filter(|o| filter.user_id.is_none_or(|id| o.user_id == id))
            .filter(|o| filter.truck_id.is_none_or(|id| o.truck_id == id))
            .filter(|o| filter.status.is_none_or(|status| o.status == status))
            .cloned()
            .collect();
        result.sort_by_key(|o| o.created_at);

        Ok(paginate(result, filter.offset, filter.limit))
    }

    async fn update_order(&self, order: Order) -> StoreResult<Order> {
        let mut orders = self.orders.write().await;
        if !orders.contains_key(&order.id) {
            return Err(StoreError::not_found("Order", order.id));
        }
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> StoreResult<Order> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Order", id))?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn delete_order(&self, id: Uuid) -> StoreResult<()> {
        let mut orders = self.orders.write().await;
        if orders.remove(&id).is_none() {
            return Err(StoreError::not_found("Order", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use entities::ResolvedPlace;

    use super::*;

    fn resolved(address: &str) -> ResolvedPlace {
        ResolvedPlace {
            address: address.to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    #[tokio::test]
    async fn test_user_crud() {
        let store = MemoryStore::new();

        // Create
        let user = User::new("driver@example.com", "hash");
        let created = store.create_user(user).await.unwrap();

        // Get by id and email
        let fetched = store.get_user(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "driver@example.com");
        let by_email = store
            .get_user_by_email("driver@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);

        // Update
        let mut changed = fetched.clone();
        changed.email = "dispatch@example.com".to_string();
        store.update_user(changed).await.unwrap();
        assert!(store
            .get_user_by_email("driver@example.com")
            .await
            .unwrap()
            .is_none());

        // Delete
        store.delete_user(created.id).await.unwrap();
        assert!(store.get_user(created.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete_user(created.id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store
            .create_user(User::new("same@example.com", "hash-1"))
            .await
            .unwrap();

        let err = store
            .create_user(User::new("same@example.com", "hash-2"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_user_onto_taken_email_rejected() {
        let store = MemoryStore::new();
        store
            .create_user(User::new("first@example.com", "hash"))
            .await
            .unwrap();
        let mut second = store
            .create_user(User::new("second@example.com", "hash"))
            .await
            .unwrap();

        second.email = "first@example.com".to_string();
        assert!(store.update_user(second).await.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_truck_filter_and_pagination() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        for plates in ["A-1", "A-2", "A-3"] {
            store
                .create_truck(Truck::new(owner).with_plates(plates))
                .await
                .unwrap();
        }
        store.create_truck(Truck::new(Uuid::new_v4())).await.unwrap();

        let filter = TruckFilter {
            user_id: Some(owner),
            limit: Some(2),
            offset: Some(1),
        };
        let (trucks, total) = store.list_trucks(filter).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(trucks.len(), 2);
        assert!(trucks.iter().all(|t| t.user_id == owner));
    }

    #[tokio::test]
    async fn test_duplicate_place_id_rejected() {
        let store = MemoryStore::new();
        store
            .create_location(Location::new("place-1", resolved("First")))
            .await
            .unwrap();

        let err = store
            .create_location(Location::new("place-1", resolved("Again")))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.list_locations().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_order_status_update() {
        let store = MemoryStore::new();
        let order = Order::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let order = store.create_order(order).await.unwrap();

        let updated = store
            .update_order_status(order.id, OrderStatus::Delivered)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Delivered);

        let fetched = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, OrderStatus::Delivered);

        let missing = store
            .update_order_status(Uuid::new_v4(), OrderStatus::Cancelled)
            .await;
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_order_filters() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let truck = Uuid::new_v4();
        let pickup = Uuid::new_v4();

        store
            .create_order(Order::new(user, truck, pickup))
            .await
            .unwrap();
        store
            .create_order(Order::new(user, truck, pickup).with_status(OrderStatus::Assigned))
            .await
            .unwrap();
        store
            .create_order(Order::new(Uuid::new_v4(), truck, pickup))
            .await
            .unwrap();

        let (by_user, total) = store
            .list_orders(OrderFilter {
                user_id: Some(user),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(by_user.len(), 2);

        let (assigned, _) = store
            .list_orders(OrderFilter {
                status: Some(OrderStatus::Assigned),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(assigned.len(), 1);

        let (by_truck, _) = store
            .list_orders(OrderFilter {
                truck_id: Some(truck),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_truck.len(), 3);
    }
}
