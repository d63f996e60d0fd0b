//! CSV row layouts. Column names match the files under `data/`.

use serde::{Deserialize, Serialize};

use dispatch_core::model::{
    Courier, CourierId, Customer, CustomerId, Order, OrderId, OrderStatus, Restaurant, RestaurantId,
};
use dispatch_core::network::{LocationId, LocationKind};
use dispatch_core::queues::QueueKind;

/// Courier id written for orders that were never assigned.
pub const UNASSIGNED_COURIER: i64 = -1;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NodeRow {
    pub id: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

pub(crate) fn parse_kind(value: &str) -> Option<LocationKind> {
    match value.to_ascii_lowercase().as_str() {
        "restaurant" => Some(LocationKind::Restaurant),
        "delivery" | "delivery_point" | "delivery-point" => Some(LocationKind::DeliveryPoint),
        _ => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EdgeRow {
    pub source: usize,
    pub destination: usize,
    pub weight: u32,
    #[serde(default)]
    pub street: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RestaurantRow {
    pub id: u32,
    pub name: String,
    #[serde(rename = "nodeId")]
    pub node_id: usize,
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Restaurant {
            id: RestaurantId(row.id),
            name: row.name,
            location: LocationId(row.node_id),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AgentRow {
    pub id: u32,
    pub name: String,
    #[serde(rename = "nodeId")]
    pub node_id: usize,
}

impl From<AgentRow> for Courier {
    fn from(row: AgentRow) -> Self {
        Courier::new(CourierId(row.id), row.name, LocationId(row.node_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UserRow {
    pub id: u32,
    pub name: String,
    #[serde(rename = "nodeId")]
    pub node_id: usize,
}

impl From<UserRow> for Customer {
    fn from(row: UserRow) -> Self {
        Customer {
            id: CustomerId(row.id),
            name: row.name,
            delivery_location: LocationId(row.node_id),
        }
    }
}

impl From<&Customer> for UserRow {
    fn from(customer: &Customer) -> Self {
        UserRow {
            id: customer.id.0,
            name: customer.name.clone(),
            node_id: customer.delivery_location.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct OrderRow {
    #[serde(rename = "orderId")]
    pub order_id: u32,
    #[serde(rename = "userId")]
    pub user_id: u32,
    #[serde(rename = "restaurantId")]
    pub restaurant_id: u32,
    #[serde(rename = "agentId")]
    pub agent_id: i64,
    pub priority: u32,
    pub status: String,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        OrderRow {
            order_id: order.id.0,
            user_id: order.customer.0,
            restaurant_id: order.restaurant.0,
            agent_id: order
                .courier
                .map_or(UNASSIGNED_COURIER, |courier| i64::from(courier.0)),
            priority: order.priority,
            status: order.status.to_string(),
        }
    }
}

pub(crate) fn parse_status(value: &str) -> Option<OrderStatus> {
    match value.to_ascii_lowercase().as_str() {
        "pending" => Some(OrderStatus::Pending),
        "assigned" => Some(OrderStatus::Assigned),
        _ => None,
    }
}

pub(crate) fn parse_courier(value: i64) -> Option<Option<CourierId>> {
    if value == UNASSIGNED_COURIER {
        return Some(None);
    }
    u32::try_from(value).ok().map(|id| Some(CourierId(id)))
}

pub(crate) fn order_from_row(row: &OrderRow, status: OrderStatus, courier: Option<CourierId>) -> Order {
    Order {
        id: OrderId(row.order_id),
        customer: CustomerId(row.user_id),
        restaurant: RestaurantId(row.restaurant_id),
        courier,
        priority: row.priority,
        status,
    }
}

/// An order still queued when a run ended: `orderId,userId,restaurantId,priority,queue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PendingRow {
    #[serde(rename = "orderId")]
    pub order_id: u32,
    #[serde(rename = "userId")]
    pub user_id: u32,
    #[serde(rename = "restaurantId")]
    pub restaurant_id: u32,
    pub priority: u32,
    pub queue: QueueKind,
}

impl PendingRow {
    pub(crate) fn new(queue: QueueKind, order: &Order) -> Self {
        PendingRow {
            order_id: order.id.0,
            user_id: order.customer.0,
            restaurant_id: order.restaurant.0,
            priority: order.priority,
            queue,
        }
    }

    pub(crate) fn into_order(self) -> (QueueKind, Order) {
        let order = Order::new(
            OrderId(self.order_id),
            CustomerId(self.user_id),
            RestaurantId(self.restaurant_id),
            self.priority,
        );
        (self.queue, order)
    }
}

/// One new order to submit: `customer,deliveryPoint,restaurantId,priority`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmissionRow {
    pub customer: String,
    #[serde(rename = "deliveryPoint")]
    pub delivery_point: usize,
    #[serde(rename = "restaurantId")]
    pub restaurant_id: u32,
    pub priority: u32,
}
