//! Performance benchmarks for dispatch_core using Criterion.rs.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dispatch_core::config::DispatchConfig;
use dispatch_core::engine::DispatchEngine;
use dispatch_core::model::{Courier, CourierId, Restaurant, RestaurantId};
use dispatch_core::network::{LocationId, LocationKind, RoadNetwork};
use dispatch_core::registry::{CourierRoster, RestaurantDirectory};

/// Grid of `side * side` locations; even ids are restaurants.
fn grid_network(side: usize) -> RoadNetwork {
    let mut builder = RoadNetwork::builder();
    for index in 0..side * side {
        let kind = if index % 2 == 0 {
            LocationKind::Restaurant
        } else {
            LocationKind::DeliveryPoint
        };
        builder = builder.location(format!("L{index}"), kind);
    }
    for row in 0..side {
        for col in 0..side {
            let here = row * side + col;
            if col + 1 < side {
                builder = builder.segment(here, here + 1, 1 + (here % 7) as u32, "east-west");
            }
            if row + 1 < side {
                builder = builder.segment(here, here + side, 1 + (here % 5) as u32, "north-south");
            }
        }
    }
    builder.build().expect("grid network")
}

fn bench_shortest_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_paths");
    for side in [4, 8, 16] {
        let network = grid_network(side);
        let far_corner = LocationId(side * side - 1);
        group.bench_with_input(BenchmarkId::new("distances", side), &network, |b, network| {
            b.iter(|| black_box(network.shortest_distances(LocationId(0))));
        });
        group.bench_with_input(BenchmarkId::new("path", side), &network, |b, network| {
            b.iter(|| black_box(network.shortest_path(LocationId(0), far_corner)));
        });
    }
    group.finish();
}

fn bench_dispatch_cycle(c: &mut Criterion) {
    let side = 8;
    let network = Arc::new(grid_network(side));

    let mut group = c.benchmark_group("dispatch_cycle");
    for cache_capacity in [0, 64] {
        group.bench_with_input(
            BenchmarkId::new("route_cache", cache_capacity),
            &cache_capacity,
            |b, &cache_capacity| {
                b.iter(|| {
                    let restaurants: RestaurantDirectory = (1..=8u32)
                        .map(|id| Restaurant {
                            id: RestaurantId(id),
                            name: format!("R{id}"),
                            location: LocationId((id as usize - 1) * 2),
                        })
                        .collect();
                    let mut couriers = CourierRoster::new();
                    for id in 0..20u32 {
                        let location = LocationId((id as usize * 3) % (side * side));
                        couriers
                            .register(Courier::new(CourierId(id), format!("C{id}"), location))
                            .expect("courier");
                    }
                    let config = DispatchConfig::default()
                        .with_restaurant_placement(
                            dispatch_core::config::RestaurantPlacement::Directory,
                        )
                        .with_route_cache_capacity(cache_capacity);
                    let mut engine =
                        DispatchEngine::new(Arc::clone(&network), restaurants, couriers, config);
                    for n in 0..30u32 {
                        let delivery = LocationId(((n as usize * 2) + 1) % (side * side));
                        let _ = engine.submit_order("bench", delivery, RestaurantId(1 + n % 8), 1 + n % 9);
                    }
                    black_box(engine.dispatch_cycle())
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_shortest_paths, bench_dispatch_cycle);
criterion_main!(benches);
