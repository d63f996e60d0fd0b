//! Food-delivery dispatch over a small road network.
//!
//! - [`network`]: undirected weighted graph with shortest distances and paths
//! - [`routing`]: route provider seam with an LRU-cached implementation
//! - [`queues`]: urgent priority queue and FIFO backlog
//! - [`ledger`]: LIFO undo history of assignments
//! - [`engine`]: order intake, nearest-courier dispatch cycles and undo
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use dispatch_core::config::DispatchConfig;
//! use dispatch_core::engine::DispatchEngine;
//! use dispatch_core::model::{Courier, CourierId, Restaurant, RestaurantId};
//! use dispatch_core::network::{LocationId, LocationKind, RoadNetwork};
//! use dispatch_core::registry::{CourierRoster, RestaurantDirectory};
//!
//! let network = RoadNetwork::builder()
//!     .location("Kitchen", LocationKind::Restaurant)
//!     .location("Home", LocationKind::DeliveryPoint)
//!     .segment(0, 1, 10, "Main Road")
//!     .build()
//!     .unwrap();
//! let restaurants: RestaurantDirectory = [Restaurant {
//!     id: RestaurantId(1),
//!     name: "Kitchen".into(),
//!     location: LocationId(0),
//! }]
//! .into_iter()
//! .collect();
//! let mut couriers = CourierRoster::new();
//! couriers.register(Courier::new(CourierId(1), "Chris", LocationId(0))).unwrap();
//!
//! let mut engine = DispatchEngine::new(Arc::new(network), restaurants, couriers, DispatchConfig::default());
//! engine.submit_order("Alice", LocationId(1), RestaurantId(1), 7).unwrap();
//! let report = engine.dispatch_cycle();
//! assert_eq!(report.dispatched[0].eta_minutes, Some(20));
//! ```

pub mod config;
pub mod engine;
pub mod history;
pub mod ledger;
pub mod model;
pub mod network;
pub mod queues;
pub mod registry;
pub mod report;
pub mod routing;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
