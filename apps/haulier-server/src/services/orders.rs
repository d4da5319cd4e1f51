//! Orders and the aggregated order view.

use std::sync::Arc;

use api_protocol::requests::{CreateOrderRequest, ListOrdersQuery, UpdateOrderRequest};
use chrono::Utc;
use entities::{Order, OrderStatus, OrderView};
use resource_store::{LocationStore, OrderFilter, OrderStore, TruckStore, UserStore};
use uuid::Uuid;

use super::{parse_id, parse_optional_id};
use crate::error::{ServerError, ServerResult};
use crate::state::Stores;

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderStore>,
    users: Arc<dyn UserStore>,
    trucks: Arc<dyn TruckStore>,
    locations: Arc<dyn LocationStore>,
}

impl OrderService {
    pub fn new(stores: Stores) -> Self {
        Self {
            orders: stores.orders,
            users: stores.users,
            trucks: stores.trucks,
            locations: stores.locations,
        }
    }

    /// Creates an order after checking that every reference exists.
    pub async fn create(&self, request: CreateOrderRequest) -> ServerResult<Order> {
        let status = match request.status.as_deref() {
            Some(raw) => parse_status(raw)?,
            None => OrderStatus::default(),
        };
        let user_id = parse_id("user", &request.user)?;
        let truck_id = parse_id("truck", &request.truck)?;
        let pickup_id = parse_id("pickup", &request.pickup)?;
        let dropoff_id = parse_optional_id("dropoff", request.dropoff.as_deref())?;

        let mut order = Order::new(user_id, truck_id, pickup_id).with_status(status);
        if let Some(dropoff_id) = dropoff_id {
            order = order.with_dropoff(dropoff_id);
        }
        self.ensure_references(&order).await?;

        let order = self.orders.create_order(order).await?;

        tracing::info!(order_id = %order.id, status = %order.status, "Order created");

        Ok(order)
    }

    pub async fn list(&self, query: ListOrdersQuery) -> ServerResult<(Vec<Order>, u32)> {
        let filter = OrderFilter {
            user_id: parse_optional_id("user", query.user.as_deref())?,
            truck_id: parse_optional_id("truck", query.truck.as_deref())?,
            status: query.status.as_deref().map(parse_status).transpose()?,
            limit: query.limit,
            offset: query.offset,
        };
        Ok(self.orders.list_orders(filter).await?)
    }

    /// Builds the denormalized view of an order.
    ///
    /// The four references are fetched concurrently. A missing dropoff
    /// becomes `None`; a missing user, truck or pickup hides the order.
    pub async fn get_order_view(&self, id: &str) -> ServerResult<OrderView> {
        let id = parse_id("order", id)?;
        let order = self.find(id).await?;

        let (user, truck, pickup, dropoff) = tokio::join!(
            self.users.get_user(order.user_id),
            self.trucks.get_truck(order.truck_id),
            self.locations.get_location(order.pickup_id),
            async {
                match order.dropoff_id {
                    Some(dropoff_id) => self.locations.get_location(dropoff_id).await,
                    None => Ok(None),
                }
            },
        );
        let (user, truck, pickup, dropoff) = (user?, truck?, pickup?, dropoff?);

        let (Some(user), Some(truck), Some(pickup)) = (user, truck, pickup) else {
            tracing::warn!(
                order_id = %order.id,
                user_id = %order.user_id,
                truck_id = %order.truck_id,
                pickup_id = %order.pickup_id,
                "Order references a missing record"
            );
            return Err(ServerError::NotFound("Order not found".to_string()));
        };

        Ok(OrderView {
            id: order.id,
            status: order.status,
            user: user.to_summary(),
            truck: truck.to_summary(),
            pickup: pickup.to_summary(),
            dropoff: dropoff.map(|location| location.to_summary()),
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
    }

    /// Applies the present fields; a blank dropoff clears it.
    pub async fn update(&self, id: &str, request: UpdateOrderRequest) -> ServerResult<Order> {
        let id = parse_id("order", id)?;
        let mut order = self.find(id).await?;

        if let Some(raw) = request.status.as_deref() {
            order.status = parse_status(raw)?;
        }
        if let Some(user) = request.user.as_deref() {
            order.user_id = parse_id("user", user)?;
        }
        if let Some(truck) = request.truck.as_deref() {
            order.truck_id = parse_id("truck", truck)?;
        }
        if let Some(pickup) = request.pickup.as_deref() {
            order.pickup_id = parse_id("pickup", pickup)?;
        }
        if let Some(dropoff) = request.dropoff.as_deref() {
            order.dropoff_id = match dropoff.trim() {
                "" => None,
                raw => Some(parse_id("dropoff", raw)?),
            };
        }
        self.ensure_references(&order).await?;
        order.updated_at = Utc::now();

        let order = self.orders.update_order(order).await?;

        tracing::info!(order_id = %order.id, "Order updated");

        Ok(order)
    }

    /// Moves an order to any recognized status.
    pub async fn update_status(&self, id: &str, status: &str) -> ServerResult<Order> {
        let id = parse_id("order", id)?;
        let status = parse_status(status)?;

        let order = self.orders.update_order_status(id, status).await?;

        tracing::info!(order_id = %order.id, status = %order.status, "Order status updated");

        Ok(order)
    }

    pub async fn delete(&self, id: &str) -> ServerResult<()> {
        let id = parse_id("order", id)?;
        self.orders.delete_order(id).await?;

        tracing::info!(order_id = %id, "Order deleted");

        Ok(())
    }

    async fn find(&self, id: Uuid) -> ServerResult<Order> {
        self.orders
            .get_order(id)
            .await?
            .ok_or_else(|| ServerError::NotFound("Order not found".to_string()))
    }

    async fn ensure_references(&self, order: &Order) -> ServerResult<()> {
        let (user, truck, pickup, dropoff) = tokio::join!(
            self.users.get_user(order.user_id),
            self.trucks.get_truck(order.truck_id),
            self.locations.get_location(order.pickup_id),
            async {
                match order.dropoff_id {
                    Some(dropoff_id) => self
                        .locations
                        .get_location(dropoff_id)
                        .await
                        .map(|location| location.is_some()),
                    None => Ok(true),
                }
            },
        );

        let missing = if user?.is_none() {
            Some(("user", order.user_id))
        } else if truck?.is_none() {
            Some(("truck", order.truck_id))
        } else if pickup?.is_none() {
            Some(("pickup", order.pickup_id))
        } else if !dropoff? {
            order.dropoff_id.map(|id| ("dropoff", id))
        } else {
            None
        };

        match missing {
            Some((field, id)) => Err(ServerError::InvalidArgument(format!(
                "Referenced {field} {id} does not exist"
            ))),
            None => Ok(()),
        }
    }
}

fn parse_status(raw: &str) -> ServerResult<OrderStatus> {
    raw.parse().map_err(|_| {
        let allowed: Vec<&str> = OrderStatus::ALL.iter().map(OrderStatus::as_str).collect();
        ServerError::InvalidArgument(format!(
            "Invalid status '{raw}', expected one of: {}",
            allowed.join(", ")
        ))
    })
}
