//! PostgreSQL resource store implementation.

mod schema;

use async_trait::async_trait;
use chrono::Utc;
use entities::{Location, Order, OrderStatus, Truck, User};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

pub use schema::*;

use crate::{
    LocationStore, OrderFilter, OrderStore, StoreError, StoreResult, TruckFilter, TruckStore,
    UserStore,
};

const USER_COLUMNS: &str = "id, email, password_hash, created_at, updated_at";
const TRUCK_COLUMNS: &str = "id, user_id, year, color, plates, created_at, updated_at";
const LOCATION_COLUMNS: &str =
    "id, place_id, address, latitude, longitude, created_at, updated_at";
const ORDER_COLUMNS: &str =
    "id, status, user_id, truck_id, pickup_id, dropoff_id, created_at, updated_at";

/// Resource store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects to the database and makes sure the schema exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    async fn run_migrations(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        tracing::info!("Database schema ready");
        Ok(())
    }
}

/// Translates unique-constraint violations into `AlreadyExists`.
fn map_write_error(err: sqlx::Error, entity_type: &'static str, key: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::already_exists(entity_type, key)
        }
        _ => StoreError::Database(err),
    }
}

fn to_limit(limit: Option<u32>) -> Option<i64> {
    limit.map(i64::from)
}

fn to_offset(offset: Option<u32>) -> i64 {
    offset.map(i64::from).unwrap_or(0)
}

/// Narrows a `COUNT(*)` result to the total reported by list calls.
fn to_total(count: i64, entity_type: &'static str) -> StoreResult<u32> {
    u32::try_from(count).map_err(|_| StoreError::Corrupt {
        entity_type,
        reason: format!("row count {count} does not fit the list total"),
    })
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: User) -> StoreResult<User> {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "User", &user.email))?;

        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(User::from))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at"))
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE users SET email = $2, password_hash = $3, updated_at = $4
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "User", &user.email))?;

        row.map(User::from)
            .ok_or_else(|| StoreError::not_found("User", user.id))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("User", id));
        }
        Ok(())
    }
}

#[async_trait]
impl TruckStore for PgStore {
    async fn create_truck(&self, truck: Truck) -> StoreResult<Truck> {
        sqlx::query(
            "INSERT INTO trucks (id, user_id, year, color, plates, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(truck.id)
        .bind(truck.user_id)
        .bind(&truck.year)
        .bind(&truck.color)
        .bind(&truck.plates)
        .bind(truck.created_at)
        .bind(truck.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Truck", &truck.id.to_string()))?;

        Ok(truck)
    }

    async fn get_truck(&self, id: Uuid) -> StoreResult<Option<Truck>> {
        let row: Option<TruckRow> =
            sqlx::query_as(&format!("SELECT {TRUCK_COLUMNS} FROM trucks WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Truck::from))
    }

    async fn list_trucks(&self, filter: TruckFilter) -> StoreResult<(Vec<Truck>, u32)> {
        let rows: Vec<TruckRow> = sqlx::query_as(&format!(
            "SELECT {TRUCK_COLUMNS} FROM trucks
             WHERE ($1::uuid IS NULL OR user_id = $1)
             ORDER BY created_at
             LIMIT $2 OFFSET $3"
        ))
        .bind(filter.user_id)
        .bind(to_limit(filter.limit))
        .bind(to_offset(filter.offset))
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM trucks WHERE ($1::uuid IS NULL OR user_id = $1)",
        )
        .bind(filter.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((
            rows.into_iter().map(Truck::from).collect(),
            to_total(total, "Truck")?,
        ))
    }

    async fn update_truck(&self, truck: Truck) -> StoreResult<Truck> {
        let row: Option<TruckRow> = sqlx::query_as(&format!(
            "UPDATE trucks SET user_id = $2, year = $3, color = $4, plates = $5, updated_at = $6
             WHERE id = $1
             RETURNING {TRUCK_COLUMNS}"
        ))
        .bind(truck.id)
        .bind(truck.user_id)
        .bind(&truck.year)
        .bind(&truck.color)
        .bind(&truck.plates)
        .bind(truck.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Truck::from)
            .ok_or_else(|| StoreError::not_found("Truck", truck.id))
    }

    async fn delete_truck(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM trucks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Truck", id));
        }
        Ok(())
    }
}

#[async_trait]
impl LocationStore for PgStore {
    async fn create_location(&self, location: Location) -> StoreResult<Location> {
        sqlx::query(
            "INSERT INTO locations (id, place_id, address, latitude, longitude, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(location.id)
        .bind(&location.place_id)
        .bind(&location.address)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(location.created_at)
        .bind(location.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Location", &location.place_id))?;

        Ok(location)
    }

    async fn get_location(&self, id: Uuid) -> StoreResult<Option<Location>> {
        let row: Option<LocationRow> = sqlx::query_as(&format!(
            "SELECT {LOCATION_COLUMNS} FROM locations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Location::from))
    }

    async fn list_locations(&self) -> StoreResult<Vec<Location>> {
        let rows: Vec<LocationRow> = sqlx::query_as(&format!(
            "SELECT {LOCATION_COLUMNS} FROM locations ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Location::from).collect())
    }

    async fn update_location(&self, location: Location) -> StoreResult<Location> {
        let row: Option<LocationRow> = sqlx::query_as(&format!(
            "UPDATE locations
             SET place_id = $2, address = $3, latitude = $4, longitude = $5, updated_at = $6
             WHERE id = $1
             RETURNING {LOCATION_COLUMNS}"
        ))
        .bind(location.id)
        .bind(&location.place_id)
        .bind(&location.address)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(location.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Location", &location.place_id))?;

        row.map(Location::from)
            .ok_or_else(|| StoreError::not_found("Location", location.id))
    }

    async fn delete_location(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Location", id));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn create_order(&self, order: Order) -> StoreResult<Order> {
        sqlx::query(
            "INSERT INTO orders (id, status, user_id, truck_id, pickup_id, dropoff_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(order.id)
        .bind(order.status.as_str())
        .bind(order.user_id)
        .bind(order.truck_id)
        .bind(order.pickup_id)
        .bind(order.dropoff_id)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Order", &order.id.to_string()))?;

        Ok(order)
    }

    async fn get_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Order::try_from).transpose()
    }

    async fn list_orders(&self, filter: OrderFilter) -> StoreResult<(Vec<Order>, u32)> {
        const WHERE_CLAUSE: &str = "WHERE ($1::uuid IS NULL OR user_id = $1)
               AND ($2::uuid IS NULL OR truck_id = $2)
               AND ($3::text IS NULL OR status = $3)";
        let status = filter.status.map(|s| s.as_str());

        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders {WHERE_CLAUSE}
             ORDER BY created_at
             LIMIT $4 OFFSET $5"
        ))
        .bind(filter.user_id)
        .bind(filter.truck_id)
        .bind(status)
        .bind(to_limit(filter.limit))
        .bind(to_offset(filter.offset))
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM orders {WHERE_CLAUSE}"))
            .bind(filter.user_id)
            .bind(filter.truck_id)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        let orders = rows
            .into_iter()
            .map(Order::try_from)
            .collect::<StoreResult<Vec<_>>>()?;

        Ok((orders, to_total(total, "Order")?))
    }

    async fn update_order(&self, order: Order) -> StoreResult<Order> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE orders
             SET status = $2, user_id = $3, truck_id = $4, pickup_id = $5, dropoff_id = $6,
                 updated_at = $7
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order.id)
        .bind(order.status.as_str())
        .bind(order.user_id)
        .bind(order.truck_id)
        .bind(order.pickup_id)
        .bind(order.dropoff_id)
        .bind(order.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| StoreError::not_found("Order", order.id))
            .and_then(Order::try_from)
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> StoreResult<Order> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE orders SET status = $2, updated_at = $3
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| StoreError::not_found("Order", id))
            .and_then(Order::try_from)
    }

    async fn delete_order(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Order", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_total_rejects_counts_outside_u32() {
        assert_eq!(to_total(0, "Truck").unwrap(), 0);
        assert_eq!(to_total(i64::from(u32::MAX), "Truck").unwrap(), u32::MAX);

        for count in [-1, i64::from(u32::MAX) + 1] {
            let err = to_total(count, "Order").unwrap_err();
            assert!(matches!(err, StoreError::Corrupt { entity_type: "Order", .. }));
        }
    }
}
