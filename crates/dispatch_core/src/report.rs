//! Structured results of dispatch operations, left to the caller to format.

use serde::Serialize;

use crate::model::{Assignment, CourierId, CustomerId, OrderId, RestaurantId};
use crate::network::LocationId;
use crate::queues::QueueKind;

/// One order matched during a dispatch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchRecord {
    pub order_id: OrderId,
    /// Queue the order was drained from in this cycle.
    pub queue: QueueKind,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub pickup: LocationId,
    pub dropoff: LocationId,
    pub courier_id: CourierId,
    pub courier_name: String,
    /// Courier's distance to the pickup when it was chosen.
    pub courier_distance_km: u64,
    /// Pickup to dropoff; `None` when the dropoff is unreachable.
    pub distance_km: Option<u64>,
    pub eta_minutes: Option<u64>,
    pub path: Vec<LocationId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DropReason {
    UnknownCustomer(CustomerId),
    UnknownRestaurant(RestaurantId),
}

/// An order removed from the queues without being matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DroppedOrder {
    pub order_id: OrderId,
    pub reason: DropReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub dispatched: Vec<DispatchRecord>,
    /// Urgent orders with no available courier, moved to the backlog.
    pub demoted: Vec<OrderId>,
    /// Backlog orders attempted without a match; they stay queued.
    pub unmatched: Vec<OrderId>,
    pub dropped: Vec<DroppedOrder>,
    /// Whether the order history reached the history sink after this cycle.
    pub history_persisted: bool,
}

impl DispatchReport {
    pub fn dispatched_count(&self) -> usize {
        self.dispatched.len()
    }

    /// `true` when the cycle matched nothing.
    pub fn is_empty(&self) -> bool {
        self.dispatched.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UndoOutcome {
    /// The ledger was empty; nothing changed.
    NothingToUndo,
    /// The courier is available again. The order stays Assigned.
    Reverted {
        assignment: Assignment,
        courier_name: String,
    },
    /// The assignment was consumed but its courier no longer resolves.
    CourierNotFound { assignment: Assignment },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PendingCounts {
    pub urgent: usize,
    pub backlog: usize,
}

impl PendingCounts {
    pub fn total(&self) -> usize {
        self.urgent + self.backlog
    }
}
