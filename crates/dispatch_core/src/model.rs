//! Dispatch entities: couriers, customers, restaurants, orders and assignments.
//!
//! Records reference each other by id only; the registries in
//! [`crate::registry`] own them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::network::LocationId;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Order id. Allocated monotonically and never reused.
    OrderId
);
id_type!(CourierId);
id_type!(CustomerId);
id_type!(RestaurantId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Courier {
    pub id: CourierId,
    pub name: String,
    /// Home/current location; couriers are matched from here.
    pub location: LocationId,
    /// `true` while the courier can take a new order.
    pub available: bool,
}

impl Courier {
    /// New couriers start available.
    pub fn new(id: CourierId, name: impl Into<String>, location: LocationId) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            available: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub delivery_location: LocationId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub location: LocationId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Assigned,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Assigned => write!(f, "Assigned"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: CustomerId,
    pub restaurant: RestaurantId,
    /// Set once when the order is matched; undo does not clear it.
    pub courier: Option<CourierId>,
    pub priority: u32,
    pub status: OrderStatus,
}

impl Order {
    pub fn new(id: OrderId, customer: CustomerId, restaurant: RestaurantId, priority: u32) -> Self {
        Self {
            id,
            customer,
            restaurant,
            courier: None,
            priority,
            status: OrderStatus::Pending,
        }
    }

    /// Pending -> Assigned. One-way.
    pub(crate) fn assign(&mut self, courier: CourierId) {
        debug_assert_eq!(
            self.status,
            OrderStatus::Pending,
            "order {} assigned twice",
            self.id
        );
        self.courier = Some(courier);
        self.status = OrderStatus::Assigned;
    }
}

/// A committed (order, courier) pairing recorded for undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub order: OrderId,
    pub courier: CourierId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_order_is_pending_without_courier() {
        let order = Order::new(OrderId(3), CustomerId(1), RestaurantId(2), 7);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.courier, None);
    }

    #[test]
    fn assign_sets_courier_and_status() {
        let mut order = Order::new(OrderId(3), CustomerId(1), RestaurantId(2), 7);
        order.assign(CourierId(9));
        assert_eq!(order.status, OrderStatus::Assigned);
        assert_eq!(order.courier, Some(CourierId(9)));
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&OrderId(42)).expect("serialize");
        assert_eq!(json, "42");
    }
}
