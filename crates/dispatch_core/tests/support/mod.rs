#![allow(dead_code)]

use std::sync::Arc;

use dispatch_core::config::DispatchConfig;
use dispatch_core::engine::{DispatchEngine, SubmittedOrder};
use dispatch_core::model::{Courier, CourierId, Restaurant, RestaurantId};
use dispatch_core::network::{LocationId, LocationKind, RoadNetwork};
use dispatch_core::registry::{CourierRoster, RestaurantDirectory};
use dispatch_core::test_helpers::{sample_network, sample_restaurants};
use rand::rngs::StdRng;
use rand::Rng;

/// Sample network and restaurants with a custom courier list.
pub fn sample_engine_with_couriers(
    couriers: &[(u32, &str, usize)],
    config: DispatchConfig,
) -> DispatchEngine {
    DispatchEngine::new(
        Arc::new(sample_network()),
        sample_restaurants(),
        roster(couriers),
        config,
    )
}

pub fn roster(couriers: &[(u32, &str, usize)]) -> CourierRoster {
    let mut roster = CourierRoster::new();
    for &(id, name, location) in couriers {
        roster
            .register(Courier::new(CourierId(id), name, LocationId(location)))
            .expect("unique courier id");
    }
    roster
}

/// Restaurants recorded at their own location ids.
pub fn restaurants(entries: &[(u32, &str, usize)]) -> RestaurantDirectory {
    entries
        .iter()
        .map(|&(id, name, location)| Restaurant {
            id: RestaurantId(id),
            name: name.to_string(),
            location: LocationId(location),
        })
        .collect()
}

pub fn submit(
    engine: &mut DispatchEngine,
    customer: &str,
    delivery: usize,
    restaurant: u32,
    priority: u32,
) -> SubmittedOrder {
    engine
        .submit_order(customer, LocationId(delivery), RestaurantId(restaurant), priority)
        .expect("valid submission")
}

/// Two disconnected islands: restaurant 0 with delivery point 1, and
/// restaurant 2 with delivery point 3.
pub fn two_island_network() -> Arc<RoadNetwork> {
    Arc::new(
        RoadNetwork::builder()
            .location("North Kitchen", LocationKind::Restaurant)
            .location("North Homes", LocationKind::DeliveryPoint)
            .location("South Kitchen", LocationKind::Restaurant)
            .location("South Homes", LocationKind::DeliveryPoint)
            .segment(0, 1, 3, "North Lane")
            .segment(2, 3, 4, "South Lane")
            .build()
            .expect("network"),
    )
}

/// Random simple graph: at most one segment per pair, weights `0..=max_weight`.
pub fn random_network(rng: &mut StdRng, size: usize, edge_probability: f64, max_weight: u32) -> RoadNetwork {
    let mut builder = RoadNetwork::builder();
    for index in 0..size {
        let kind = if index % 2 == 0 {
            LocationKind::Restaurant
        } else {
            LocationKind::DeliveryPoint
        };
        builder = builder.location(format!("L{index}"), kind);
    }
    for a in 0..size {
        for b in (a + 1)..size {
            if rng.gen_bool(edge_probability) {
                let weight = rng.gen_range(0..=max_weight);
                builder = builder.segment(a, b, weight, format!("S{a}-{b}"));
            }
        }
    }
    builder.build().expect("random network")
}

/// Neighbours of `node` with weights, straight from the segment list.
pub fn neighbours(network: &RoadNetwork, node: usize) -> Vec<(usize, u64)> {
    network
        .segments()
        .iter()
        .filter_map(|s| {
            if s.from.0 == node {
                Some((s.to.0, u64::from(s.distance_km)))
            } else if s.to.0 == node {
                Some((s.from.0, u64::from(s.distance_km)))
            } else {
                None
            }
        })
        .collect()
}

/// Cheapest simple path by exhaustive enumeration.
pub fn brute_force_distance(network: &RoadNetwork, source: usize, target: usize) -> Option<u64> {
    fn walk(
        network: &RoadNetwork,
        node: usize,
        target: usize,
        cost: u64,
        visited: &mut Vec<bool>,
        best: &mut Option<u64>,
    ) {
        if node == target {
            *best = Some(best.map_or(cost, |b| b.min(cost)));
            return;
        }
        for (next, weight) in neighbours(network, node) {
            if !visited[next] {
                visited[next] = true;
                walk(network, next, target, cost + weight, visited, best);
                visited[next] = false;
            }
        }
    }

    let mut visited = vec![false; network.len()];
    visited[source] = true;
    let mut best = None;
    walk(network, source, target, 0, &mut visited, &mut best);
    best
}
