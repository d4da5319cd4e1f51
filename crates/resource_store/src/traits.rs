//! Resource store trait definitions.

use async_trait::async_trait;
use entities::{Location, Order, OrderStatus, Truck, User};
use uuid::Uuid;

use crate::StoreResult;

/// Filter options for listing trucks.
#[derive(Debug, Clone, Default)]
pub struct TruckFilter {
    /// Filter by owning user ID.
    pub user_id: Option<Uuid>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
}

/// Filter options for listing orders.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Filter by ordering user ID.
    pub user_id: Option<Uuid>,
    /// Filter by truck ID.
    pub truck_id: Option<Uuid>,
    /// Filter by status.
    pub status: Option<OrderStatus>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
}

/// Storage for user credentials.
///
/// Emails are unique: creating or updating a user onto a taken email fails
/// with [`crate::StoreError::AlreadyExists`].
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a new user.
    async fn create_user(&self, user: User) -> StoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Gets a user by email.
    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Lists all users ordered by creation time.
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Replaces a stored user.
    async fn update_user(&self, user: User) -> StoreResult<User>;

    /// Deletes a user.
    async fn delete_user(&self, id: Uuid) -> StoreResult<()>;
}

/// Storage for trucks.
#[async_trait]
pub trait TruckStore: Send + Sync {
    /// Creates a new truck.
    async fn create_truck(&self, truck: Truck) -> StoreResult<Truck>;

    /// Gets a truck by ID.
    async fn get_truck(&self, id: Uuid) -> StoreResult<Option<Truck>>;

    /// Lists trucks with optional filters, returning the page and the total.
    async fn list_trucks(&self, filter: TruckFilter) -> StoreResult<(Vec<Truck>, u32)>;

    /// Replaces a stored truck.
    async fn update_truck(&self, truck: Truck) -> StoreResult<Truck>;

    /// Deletes a truck.
    async fn delete_truck(&self, id: Uuid) -> StoreResult<()>;
}

/// Storage for geocoded locations.
///
/// Place identifiers are unique across locations.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Creates a new location.
    async fn create_location(&self, location: Location) -> StoreResult<Location>;

    /// Gets a location by ID.
    async fn get_location(&self, id: Uuid) -> StoreResult<Option<Location>>;

    /// Lists all locations ordered by creation time.
    async fn list_locations(&self) -> StoreResult<Vec<Location>>;

    /// Replaces a stored location.
    async fn update_location(&self, location: Location) -> StoreResult<Location>;

    /// Deletes a location.
    async fn delete_location(&self, id: Uuid) -> StoreResult<()>;
}

/// Storage for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Creates a new order.
    async fn create_order(&self, order: Order) -> StoreResult<Order>;

    /// Gets an order by ID.
    async fn get_order(&self, id: Uuid) -> StoreResult<Option<Order>>;

    /// Lists orders with optional filters, returning the page and the total.
    async fn list_orders(&self, filter: OrderFilter) -> StoreResult<(Vec<Order>, u32)>;

    /// Replaces a stored order.
    async fn update_order(&self, order: Order) -> StoreResult<Order>;

    /// Sets the status of an order and returns the updated record.
    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> StoreResult<Order>;

    /// Deletes an order.
    async fn delete_order(&self, id: Uuid) -> StoreResult<()>;
}
