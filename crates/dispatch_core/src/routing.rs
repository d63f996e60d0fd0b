//! Route providers: the seam between the dispatch engine and the road network.
//!
//! Two implementations:
//!
//! - **`RoadNetwork`** itself: recomputes every query.
//! - **`CachedRouteProvider`**: keeps recently computed single-source distance
//!   tables in an LRU cache. The network never changes after construction, so
//!   cached tables never go stale.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;

use crate::network::{LocationId, RoadNetwork, Route, ShortestDistances};

/// Shortest-path queries used by dispatch. Implementations must be
/// `Send + Sync` so an engine can be moved behind a lock by its front end.
pub trait RouteProvider: Send + Sync {
    /// Distance table from `source` to every location.
    fn distances_from(&self, source: LocationId) -> Arc<ShortestDistances>;

    /// Shortest route between two locations.
    fn route(&self, source: LocationId, destination: LocationId) -> Route;
}

impl RouteProvider for RoadNetwork {
    fn distances_from(&self, source: LocationId) -> Arc<ShortestDistances> {
        Arc::new(self.shortest_distances(source))
    }

    fn route(&self, source: LocationId, destination: LocationId) -> Route {
        self.shortest_path(source, destination)
    }
}

/// LRU-cached distance tables keyed by source location.
///
/// Routes are not cached: they are computed once per dispatched order.
pub struct CachedRouteProvider {
    network: Arc<RoadNetwork>,
    cache: Mutex<LruCache<LocationId, Arc<ShortestDistances>>>,
}

impl CachedRouteProvider {
    /// A capacity of zero is treated as one.
    pub fn new(network: Arc<RoadNetwork>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            network,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn cached_sources(&self) -> usize {
        self.cache.lock().map_or(0, |cache| cache.len())
    }
}

impl RouteProvider for CachedRouteProvider {
    fn distances_from(&self, source: LocationId) -> Arc<ShortestDistances> {
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(table) = cache.get(&source) {
                return Arc::clone(table);
            }
        }

        let table = Arc::new(self.network.shortest_distances(source));
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(source, Arc::clone(&table));
        }
        table
    }

    fn route(&self, source: LocationId, destination: LocationId) -> Route {
        self.network.shortest_path(source, destination)
    }
}

/// Pick a provider for `network`: cached when `cache_capacity > 0`.
pub fn build_route_provider(network: Arc<RoadNetwork>, cache_capacity: usize) -> Box<dyn RouteProvider> {
    if cache_capacity == 0 {
        Box::new(SharedNetwork(network))
    } else {
        Box::new(CachedRouteProvider::new(network, cache_capacity))
    }
}

/// Uncached provider over a shared network handle.
struct SharedNetwork(Arc<RoadNetwork>);

impl RouteProvider for SharedNetwork {
    fn distances_from(&self, source: LocationId) -> Arc<ShortestDistances> {
        self.0.distances_from(source)
    }

    fn route(&self, source: LocationId, destination: LocationId) -> Route {
        self.0.shortest_path(source, destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::LocationKind;

    fn network() -> Arc<RoadNetwork> {
        Arc::new(
            RoadNetwork::builder()
                .location("A", LocationKind::Restaurant)
                .location("B", LocationKind::DeliveryPoint)
                .location("C", LocationKind::Restaurant)
                .segment(0, 1, 2, "x")
                .segment(1, 2, 5, "y")
                .build()
                .expect("network"),
        )
    }

    #[test]
    fn cached_tables_match_direct_computation() {
        let network = network();
        let provider = CachedRouteProvider::new(Arc::clone(&network), 4);
        let first = provider.distances_from(LocationId(0));
        let second = provider.distances_from(LocationId(0));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, network.shortest_distances(LocationId(0)));
        assert_eq!(provider.cached_sources(), 1);
    }

    #[test]
    fn cache_evicts_least_recently_used_source() {
        let provider = CachedRouteProvider::new(network(), 2);
        provider.distances_from(LocationId(0));
        provider.distances_from(LocationId(1));
        provider.distances_from(LocationId(2));
        assert_eq!(provider.cached_sources(), 2);
    }

    #[test]
    fn zero_capacity_builds_uncached_provider() {
        let network = network();
        let provider = build_route_provider(Arc::clone(&network), 0);
        let route = provider.route(LocationId(0), LocationId(2));
        assert_eq!(route.distance, 7);
        assert_eq!(route.path, vec![LocationId(0), LocationId(1), LocationId(2)]);
    }
}
