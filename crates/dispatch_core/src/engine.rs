//! Dispatch engine: order intake, nearest-courier matching and undo.
//!
//! Order lifecycle:
//!
//! ```text
//! submit ──> Pending(urgent) ──no courier──> Pending(backlog) ──┐
//!                 │                               ^   retry     │
//!                 │                               └─────────────┘
//!                 └────────── matched ──────────> Assigned <─────┘
//! ```
//!
//! `Assigned` is terminal; undoing an assignment frees the courier but leaves
//! the order Assigned.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{BacklogDrain, DispatchConfig, RestaurantPlacement};
use crate::history::HistorySink;
use crate::ledger::AssignmentLedger;
use crate::model::{Assignment, CourierId, CustomerId, Order, OrderId, RestaurantId};
use crate::network::{LocationId, LocationKind, RoadNetwork};
use crate::queues::{OrderQueues, QueueKind};
use crate::registry::{CourierRoster, CustomerBook, RestaurantDirectory};
use crate::report::{
    DispatchRecord, DispatchReport, DropReason, DroppedOrder, PendingCounts, UndoOutcome,
};
use crate::routing::{build_route_provider, RouteProvider};

/// Submission rejected before any state changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("invalid delivery point {0}")]
    InvalidDeliveryPoint(LocationId),

    #[error("invalid restaurant id {0}")]
    InvalidRestaurant(RestaurantId),

    #[error("invalid priority {0}: must be at least 1")]
    InvalidPriority(u32),

    #[error("no order or customer ids left")]
    IdsExhausted,
}

/// Receipt for an accepted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedOrder {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub queue: QueueKind,
}

/// Nearest available courier to a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourierMatch {
    pub courier: CourierId,
    pub distance_km: u64,
}

enum Attempt {
    Dispatched(DispatchRecord),
    NoCourier(Order),
    Dropped(DroppedOrder),
}

pub struct DispatchEngine {
    config: DispatchConfig,
    network: Arc<RoadNetwork>,
    routes: Box<dyn RouteProvider>,
    restaurants: RestaurantDirectory,
    couriers: CourierRoster,
    customers: CustomerBook,
    queues: OrderQueues,
    ledger: AssignmentLedger,
    history: Vec<Order>,
    /// `None` once `u32::MAX` has been used.
    next_order_id: Option<u32>,
    sink: Option<Box<dyn HistorySink>>,
}

impl DispatchEngine {
    pub fn new(
        network: Arc<RoadNetwork>,
        restaurants: RestaurantDirectory,
        couriers: CourierRoster,
        config: DispatchConfig,
    ) -> Self {
        let routes = build_route_provider(Arc::clone(&network), config.route_cache_capacity);
        Self {
            queues: OrderQueues::new(config.urgent_threshold),
            config,
            network,
            routes,
            restaurants,
            couriers,
            customers: CustomerBook::new(),
            ledger: AssignmentLedger::new(),
            history: Vec::new(),
            next_order_id: Some(1),
            sink: None,
        }
    }

    /// Replace the route provider built from the config.
    pub fn with_route_provider(mut self, routes: Box<dyn RouteProvider>) -> Self {
        self.routes = routes;
        self
    }

    /// Customers persisted by an earlier run. Ids already referenced by
    /// history or queued orders stay reserved whatever the call order.
    pub fn with_customers(mut self, customers: CustomerBook) -> Self {
        self.customers = customers;
        let known: Vec<CustomerId> = self
            .history
            .iter()
            .chain(self.queues.urgent_orders())
            .chain(self.queues.backlog_orders())
            .map(|order| order.customer)
            .collect();
        for customer in known {
            self.customers.reserve_through(customer);
        }
        self
    }

    /// Pre-populate the order history. New order ids continue after the
    /// highest id found; the orders are not dispatched again.
    pub fn with_history(mut self, history: Vec<Order>) -> Self {
        for order in &history {
            self.reserve_ids(order);
        }
        self.history.extend(history);
        self
    }

    /// Requeue orders left pending by an earlier run, each into the queue it
    /// was waiting in. Urgent orders keep their priority order; backlog
    /// orders keep the order given.
    pub fn with_pending(mut self, pending: Vec<(QueueKind, Order)>) -> Self {
        for (queue, order) in pending {
            self.reserve_ids(&order);
            match queue {
                QueueKind::Urgent => self.queues.push_urgent(order),
                QueueKind::Backlog => self.queues.push_backlog(order),
            }
        }
        self
    }

    pub fn with_history_sink(mut self, sink: Box<dyn HistorySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn restaurants(&self) -> &RestaurantDirectory {
        &self.restaurants
    }

    pub fn couriers(&self) -> &CourierRoster {
        &self.couriers
    }

    pub fn customers(&self) -> &CustomerBook {
        &self.customers
    }

    pub fn order_history(&self) -> &[Order] {
        &self.history
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.history.iter().find(|order| order.id == id)
    }

    pub fn pending_counts(&self) -> PendingCounts {
        PendingCounts {
            urgent: self.queues.urgent_len(),
            backlog: self.queues.backlog_len(),
        }
    }

    pub fn queues(&self) -> &OrderQueues {
        &self.queues
    }

    pub fn ledger_depth(&self) -> usize {
        self.ledger.len()
    }

    /// Id the next accepted order will get; `None` once ids are exhausted.
    pub fn next_order_id(&self) -> Option<OrderId> {
        self.next_order_id.map(OrderId)
    }

    /// Every queued order, urgent first in dequeue order, then the backlog
    /// head first.
    pub fn pending_orders(&self) -> Vec<(QueueKind, &Order)> {
        self.queues
            .urgent_orders()
            .into_iter()
            .map(|order| (QueueKind::Urgent, order))
            .chain(
                self.queues
                    .backlog_orders()
                    .into_iter()
                    .map(|order| (QueueKind::Backlog, order)),
            )
            .collect()
    }

    /// Graph location of a restaurant under the configured placement rule.
    pub fn restaurant_location(&self, restaurant: RestaurantId) -> Option<LocationId> {
        let location = match self.config.restaurant_placement {
            RestaurantPlacement::IdOffset => restaurant
                .0
                .checked_sub(1)
                .map(|index| LocationId(index as usize)),
            RestaurantPlacement::Directory => self.restaurants.get(restaurant).map(|r| r.location),
        }?;
        self.network.contains(location).then_some(location)
    }

    pub fn is_delivery_point(&self, location: LocationId) -> bool {
        match &self.config.delivery_points {
            Some(points) => points.contains(&location) && self.network.contains(location),
            None => self
                .network
                .location(location)
                .is_some_and(|l| l.kind == LocationKind::DeliveryPoint),
        }
    }

    /// Register a customer and queue a new order for them.
    pub fn submit_order(
        &mut self,
        customer_name: &str,
        delivery_location: LocationId,
        restaurant: RestaurantId,
        priority: u32,
    ) -> Result<SubmittedOrder, SubmitError> {
        if !self.is_delivery_point(delivery_location) {
            return Err(SubmitError::InvalidDeliveryPoint(delivery_location));
        }
        if !self.restaurants.contains(restaurant) || self.restaurant_location(restaurant).is_none() {
            return Err(SubmitError::InvalidRestaurant(restaurant));
        }
        if priority == 0 {
            return Err(SubmitError::InvalidPriority(priority));
        }

        let Some(next_order_id) = self.next_order_id else {
            return Err(SubmitError::IdsExhausted);
        };
        let customer_id = self
            .customers
            .register(customer_name, delivery_location)
            .map_err(|_| SubmitError::IdsExhausted)?;
        let order_id = OrderId(next_order_id);
        self.next_order_id = next_order_id.checked_add(1);

        let queue = self
            .queues
            .push(Order::new(order_id, customer_id, restaurant, priority));
        info!(
            order = %order_id,
            customer = %customer_id,
            restaurant = %restaurant,
            priority,
            queue = ?queue,
            "order submitted"
        );

        Ok(SubmittedOrder {
            order_id,
            customer_id,
            queue,
        })
    }

    /// Available courier with the shortest road distance to `location`.
    /// Earlier-registered couriers win exact ties; unreachable couriers are
    /// never chosen.
    pub fn find_nearest_available_courier(&self, location: LocationId) -> Option<CourierMatch> {
        let distances = self.routes.distances_from(location);
        let mut best: Option<CourierMatch> = None;

        for courier in self.couriers.iter().filter(|c| c.available) {
            let Some(distance_km) = distances.get(courier.location) else {
                continue;
            };
            if best.map_or(true, |b| distance_km < b.distance_km) {
                best = Some(CourierMatch {
                    courier: courier.id,
                    distance_km,
                });
            }
        }

        best
    }

    /// One matching pass: the whole urgent queue, then the backlog.
    pub fn dispatch_cycle(&mut self) -> DispatchReport {
        let mut report = DispatchReport::default();

        while let Some(order) = self.queues.pop_urgent() {
            match self.attempt(order, QueueKind::Urgent) {
                Attempt::Dispatched(record) => report.dispatched.push(record),
                Attempt::NoCourier(order) => {
                    debug!(order = %order.id, "no courier for urgent order, moving to backlog");
                    report.demoted.push(order.id);
                    self.queues.push_backlog(order);
                }
                Attempt::Dropped(dropped) => report.dropped.push(dropped),
            }
        }

        let cap = match self.config.backlog_drain {
            BacklogDrain::All => usize::MAX,
            BacklogDrain::Capped(n) => n,
        };
        let mut backlog_dispatched = 0;
        let mut held = Vec::new();

        while backlog_dispatched < cap {
            let Some(order) = self.queues.pop_backlog() else {
                break;
            };
            match self.attempt(order, QueueKind::Backlog) {
                Attempt::Dispatched(record) => {
                    report.dispatched.push(record);
                    backlog_dispatched += 1;
                }
                Attempt::NoCourier(order) => {
                    report.unmatched.push(order.id);
                    held.push(order);
                }
                Attempt::Dropped(dropped) => report.dropped.push(dropped),
            }
        }

        // Untouched orders past the cap queue up behind the held ones.
        while let Some(order) = self.queues.pop_backlog() {
            held.push(order);
        }
        for order in held {
            self.queues.push_backlog(order);
        }

        if !report.dispatched.is_empty() {
            report.history_persisted = self.persist_history();
        }

        info!(
            dispatched = report.dispatched.len(),
            demoted = report.demoted.len(),
            unmatched = report.unmatched.len(),
            dropped = report.dropped.len(),
            urgent_pending = self.queues.urgent_len(),
            backlog_pending = self.queues.backlog_len(),
            "dispatch cycle finished"
        );

        report
    }

    /// Free the courier of the most recent assignment.
    pub fn undo_last_assignment(&mut self) -> UndoOutcome {
        let Some(assignment) = self.ledger.pop() else {
            return UndoOutcome::NothingToUndo;
        };

        match self.couriers.get_mut(assignment.courier) {
            Some(courier) => {
                courier.available = true;
                info!(
                    order = %assignment.order,
                    courier = %assignment.courier,
                    "assignment undone, courier available again"
                );
                UndoOutcome::Reverted {
                    assignment,
                    courier_name: courier.name.clone(),
                }
            }
            None => {
                warn!(
                    order = %assignment.order,
                    courier = %assignment.courier,
                    "courier not found for undo"
                );
                UndoOutcome::CourierNotFound { assignment }
            }
        }
    }

    fn attempt(&mut self, mut order: Order, queue: QueueKind) -> Attempt {
        let Some(customer) = self.customers.get(order.customer).cloned() else {
            warn!(order = %order.id, customer = %order.customer, "customer not found, dropping order");
            return Attempt::Dropped(DroppedOrder {
                order_id: order.id,
                reason: DropReason::UnknownCustomer(order.customer),
            });
        };
        let Some(pickup) = self.restaurant_location(order.restaurant) else {
            warn!(order = %order.id, restaurant = %order.restaurant, "restaurant has no location, dropping order");
            return Attempt::Dropped(DroppedOrder {
                order_id: order.id,
                reason: DropReason::UnknownRestaurant(order.restaurant),
            });
        };

        let Some(found) = self.find_nearest_available_courier(pickup) else {
            return Attempt::NoCourier(order);
        };
        let Some(courier) = self.couriers.get_mut(found.courier) else {
            return Attempt::NoCourier(order);
        };
        courier.available = false;
        let courier_name = courier.name.clone();

        order.assign(found.courier);
        let route = self.routes.route(pickup, customer.delivery_location);
        let distance_km = route.distance_km();
        if distance_km.is_none() {
            warn!(
                order = %order.id,
                pickup = %pickup,
                dropoff = %customer.delivery_location,
                "delivery point unreachable from restaurant"
            );
        }
        let eta_minutes = distance_km.and_then(|d| self.config.eta_minutes(d));

        self.ledger.push(Assignment {
            order: order.id,
            courier: found.courier,
        });
        info!(
            order = %order.id,
            courier = %found.courier,
            distance_km = ?distance_km,
            eta_minutes = ?eta_minutes,
            "order dispatched"
        );

        let restaurant_name = self
            .restaurants
            .get(order.restaurant)
            .map_or_else(|| self.network.location_name(pickup).to_string(), |r| r.name.clone());
        let record = DispatchRecord {
            order_id: order.id,
            queue,
            customer_id: customer.id,
            customer_name: customer.name,
            restaurant_id: order.restaurant,
            restaurant_name,
            pickup,
            dropoff: customer.delivery_location,
            courier_id: found.courier,
            courier_name,
            courier_distance_km: found.distance_km,
            distance_km,
            eta_minutes,
            path: route.path,
        };
        self.history.push(order);
        Attempt::Dispatched(record)
    }

    fn reserve_ids(&mut self, order: &Order) {
        self.next_order_id = match (self.next_order_id, order.id.0.checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };
        self.customers.reserve_through(order.customer);
    }

    fn persist_history(&self) -> bool {
        let Some(sink) = &self.sink else {
            return false;
        };
        match sink.persist(&self.history) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "order history not persisted");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Courier, Restaurant};

    /// R(0) --10-- D(1), courier C at 0.
    fn two_node_engine() -> DispatchEngine {
        let network = RoadNetwork::builder()
            .location("R", LocationKind::Restaurant)
            .location("D", LocationKind::DeliveryPoint)
            .segment(0, 1, 10, "Main Rd")
            .build()
            .expect("network");
        let restaurants: RestaurantDirectory = [Restaurant {
            id: RestaurantId(1),
            name: "R".into(),
            location: LocationId(0),
        }]
        .into_iter()
        .collect();
        let mut couriers = CourierRoster::new();
        couriers
            .register(Courier::new(CourierId(1), "C", LocationId(0)))
            .expect("courier");
        DispatchEngine::new(
            Arc::new(network),
            restaurants,
            couriers,
            DispatchConfig::default(),
        )
    }

    #[test]
    fn dispatches_single_order_with_eta() {
        let mut engine = two_node_engine();
        let receipt = engine
            .submit_order("Alice", LocationId(1), RestaurantId(1), 7)
            .expect("submit");
        assert_eq!(receipt.queue, QueueKind::Urgent);

        let report = engine.dispatch_cycle();
        assert_eq!(report.dispatched.len(), 1);
        let record = &report.dispatched[0];
        assert_eq!(record.courier_name, "C");
        assert_eq!(record.distance_km, Some(10));
        assert_eq!(record.eta_minutes, Some(20));
        assert_eq!(record.path, vec![LocationId(0), LocationId(1)]);
        assert!(!engine.couriers().get(CourierId(1)).expect("courier").available);
    }

    #[test]
    fn rejects_invalid_submissions_without_mutation() {
        let mut engine = two_node_engine();
        assert_eq!(
            engine.submit_order("Bob", LocationId(0), RestaurantId(1), 3),
            Err(SubmitError::InvalidDeliveryPoint(LocationId(0)))
        );
        assert_eq!(
            engine.submit_order("Bob", LocationId(1), RestaurantId(9), 3),
            Err(SubmitError::InvalidRestaurant(RestaurantId(9)))
        );
        assert_eq!(
            engine.submit_order("Bob", LocationId(1), RestaurantId(1), 0),
            Err(SubmitError::InvalidPriority(0))
        );
        assert_eq!(engine.pending_counts().total(), 0);
        assert!(engine.customers().is_empty());
        assert_eq!(engine.next_order_id(), Some(OrderId(1)));
    }

    #[test]
    fn nearest_courier_prefers_earlier_registration_on_ties() {
        let network = RoadNetwork::builder()
            .location("R", LocationKind::Restaurant)
            .location("A", LocationKind::DeliveryPoint)
            .location("B", LocationKind::DeliveryPoint)
            .segment(0, 1, 4, "a")
            .segment(0, 2, 4, "b")
            .build()
            .expect("network");
        let mut couriers = CourierRoster::new();
        couriers
            .register(Courier::new(CourierId(5), "Second", LocationId(2)))
            .expect("courier");
        couriers
            .register(Courier::new(CourierId(3), "Third", LocationId(1)))
            .expect("courier");
        let engine = DispatchEngine::new(
            Arc::new(network),
            RestaurantDirectory::new(),
            couriers,
            DispatchConfig::default(),
        );
        let found = engine
            .find_nearest_available_courier(LocationId(0))
            .expect("courier");
        assert_eq!(found.courier, CourierId(5));
        assert_eq!(found.distance_km, 4);
    }

    #[test]
    fn undo_on_empty_ledger_reports_nothing() {
        let mut engine = two_node_engine();
        assert_eq!(engine.undo_last_assignment(), UndoOutcome::NothingToUndo);
    }

    #[test]
    fn undo_of_unknown_courier_consumes_the_assignment() {
        let mut engine = two_node_engine();
        let stale = Assignment {
            order: OrderId(4),
            courier: CourierId(99),
        };
        engine.ledger.push(stale);

        assert_eq!(
            engine.undo_last_assignment(),
            UndoOutcome::CourierNotFound { assignment: stale }
        );
        assert_eq!(engine.ledger_depth(), 0);
        assert!(engine.couriers().get(CourierId(1)).expect("courier").available);
    }

    #[test]
    fn order_ids_stop_at_the_top_of_the_range() {
        let mut last = Order::new(OrderId(u32::MAX), CustomerId(1), RestaurantId(1), 3);
        last.status = crate::model::OrderStatus::Assigned;
        let mut engine = two_node_engine().with_history(vec![last]);
        assert_eq!(engine.next_order_id(), None);

        assert_eq!(
            engine.submit_order("Late", LocationId(1), RestaurantId(1), 7),
            Err(SubmitError::IdsExhausted)
        );
        assert_eq!(engine.pending_counts().total(), 0);
        assert_eq!(engine.customers().len(), 0);
    }

    #[test]
    fn last_order_id_is_handed_out_once() {
        let prior = Order::new(OrderId(u32::MAX - 1), CustomerId(1), RestaurantId(1), 3);
        let mut engine = two_node_engine().with_history(vec![prior]);
        let placed = engine
            .submit_order("Final", LocationId(1), RestaurantId(1), 7)
            .expect("submit");
        assert_eq!(placed.order_id, OrderId(u32::MAX));
        assert_eq!(
            engine.submit_order("Late", LocationId(1), RestaurantId(1), 7),
            Err(SubmitError::IdsExhausted)
        );
        assert_eq!(engine.pending_counts().total(), 1);
    }

    #[test]
    fn exhausted_customer_ids_reject_without_consuming_an_order_id() {
        let mut customers = CustomerBook::new();
        customers.reserve_through(CustomerId(u32::MAX));
        let mut engine = two_node_engine().with_customers(customers);
        assert_eq!(
            engine.submit_order("Late", LocationId(1), RestaurantId(1), 7),
            Err(SubmitError::IdsExhausted)
        );
        assert_eq!(engine.next_order_id(), Some(OrderId(1)));
    }

    #[test]
    fn customers_loaded_after_history_keep_history_ids_reserved() {
        let prior = Order::new(OrderId(2), CustomerId(6), RestaurantId(1), 3);
        let mut engine = two_node_engine()
            .with_history(vec![prior])
            .with_customers(CustomerBook::new());
        let placed = engine
            .submit_order("New", LocationId(1), RestaurantId(1), 7)
            .expect("submit");
        assert_eq!(placed.customer_id, CustomerId(7));
        assert_eq!(placed.order_id, OrderId(3));
    }

    #[test]
    fn id_offset_placement_maps_restaurant_one_to_location_zero() {
        let engine = two_node_engine();
        assert_eq!(engine.restaurant_location(RestaurantId(1)), Some(LocationId(0)));
        assert_eq!(engine.restaurant_location(RestaurantId(0)), None);
        assert_eq!(engine.restaurant_location(RestaurantId(3)), None);
    }
}
