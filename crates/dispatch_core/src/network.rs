//! Road network: an undirected weighted graph over restaurants and delivery points.
//!
//! The network is built once and never edited. Shortest paths use the
//! linear-scan form of Dijkstra's algorithm (O(V²)); networks are small and
//! the scan keeps tie-breaking fully deterministic:
//!
//! - the unvisited location with the smallest tentative distance is settled
//!   next, the lowest id winning equal distances;
//! - a neighbour is only relaxed on a strictly shorter distance, so the first
//!   shortest path found (in segment insertion order) wins.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Distance reported for locations that cannot be reached from the source.
/// Larger than any real path sum.
pub const UNREACHABLE: u64 = u64::MAX;

/// Dense location index (`0..V`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub usize);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    Restaurant,
    DeliveryPoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub kind: LocationKind,
}

/// Undirected road segment; traversable both ways with the same weight and label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub from: LocationId,
    pub to: LocationId,
    pub distance_km: u32,
    pub street: String,
}

/// Predecessor of a settled location and the segment used to reach it.
#[derive(Debug, Clone, Copy)]
struct Step {
    parent: usize,
    segment: usize,
}

/// Adjacency entry: the far end of a segment plus its index in `segments`.
#[derive(Debug, Clone, Copy)]
struct Edge {
    to: LocationId,
    distance_km: u32,
    segment: usize,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NetworkError {
    #[error("location ids must be dense: expected id {expected}, found {found}")]
    NonDenseIds { expected: usize, found: LocationId },

    #[error("segment {segment} references unknown location {location}")]
    UnknownLocation { segment: usize, location: LocationId },
}

#[derive(Debug, Clone)]
pub struct RoadNetwork {
    locations: Vec<Location>,
    segments: Vec<RoadSegment>,
    adjacency: Vec<Vec<Edge>>,
}

impl RoadNetwork {
    /// Build a network. Locations must carry ids `0..V` in order; every
    /// segment must reference existing locations.
    pub fn new(locations: Vec<Location>, segments: Vec<RoadSegment>) -> Result<Self, NetworkError> {
        for (expected, location) in locations.iter().enumerate() {
            if location.id.0 != expected {
                return Err(NetworkError::NonDenseIds {
                    expected,
                    found: location.id,
                });
            }
        }

        let mut adjacency = vec![Vec::new(); locations.len()];
        for (index, segment) in segments.iter().enumerate() {
            for end in [segment.from, segment.to] {
                if end.0 >= locations.len() {
                    return Err(NetworkError::UnknownLocation {
                        segment: index,
                        location: end,
                    });
                }
            }
            adjacency[segment.from.0].push(Edge {
                to: segment.to,
                distance_km: segment.distance_km,
                segment: index,
            });
            adjacency[segment.to.0].push(Edge {
                to: segment.from,
                distance_km: segment.distance_km,
                segment: index,
            });
        }

        Ok(Self {
            locations,
            segments,
            adjacency,
        })
    }

    pub fn builder() -> RoadNetworkBuilder {
        RoadNetworkBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn contains(&self, id: LocationId) -> bool {
        id.0 < self.locations.len()
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.0)
    }

    /// Display name, or `"Unknown"` for ids outside the network.
    pub fn location_name(&self, id: LocationId) -> &str {
        self.location(id).map_or("Unknown", |l| l.name.as_str())
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn locations_of_kind(&self, kind: LocationKind) -> impl Iterator<Item = &Location> + '_ {
        self.locations.iter().filter(move |l| l.kind == kind)
    }

    /// Every segment once, in insertion order.
    pub fn segments(&self) -> &[RoadSegment] {
        &self.segments
    }

    /// Least-cost distance from `source` to every location.
    pub fn shortest_distances(&self, source: LocationId) -> ShortestDistances {
        let (distances, _) = self.search(source);
        ShortestDistances { distances }
    }

    /// Least-cost route from `source` to `destination`. Unreachable
    /// destinations give an empty path and [`UNREACHABLE`] distance.
    pub fn shortest_path(&self, source: LocationId, destination: LocationId) -> Route {
        let (distances, parents) = self.search(source);
        let distance = distances.get(destination.0).copied().unwrap_or(UNREACHABLE);
        if distance == UNREACHABLE {
            return Route {
                source,
                destination,
                distance,
                path: Vec::new(),
                segments: Vec::new(),
            };
        }

        let mut path = vec![destination];
        let mut segments = Vec::new();
        let mut current = destination.0;
        while let Some(step) = parents[current] {
            path.push(LocationId(step.parent));
            segments.push(step.segment);
            current = step.parent;
        }
        path.reverse();
        segments.reverse();

        Route {
            source,
            destination,
            distance,
            path,
            segments,
        }
    }

    /// Shared relaxation loop: tentative distances plus the predecessor and
    /// segment that last improved each location.
    fn search(&self, source: LocationId) -> (Vec<u64>, Vec<Option<Step>>) {
        let n = self.locations.len();
        let mut distances = vec![UNREACHABLE; n];
        let mut parents = vec![None; n];
        if source.0 >= n {
            return (distances, parents);
        }

        let mut settled = vec![false; n];
        distances[source.0] = 0;

        for _ in 0..n {
            let mut current = None;
            let mut best = UNREACHABLE;
            for (index, &distance) in distances.iter().enumerate() {
                if !settled[index] && distance < best {
                    best = distance;
                    current = Some(index);
                }
            }
            let Some(u) = current else {
                break;
            };
            settled[u] = true;

            for edge in &self.adjacency[u] {
                let v = edge.to.0;
                let candidate = best + u64::from(edge.distance_km);
                if !settled[v] && candidate < distances[v] {
                    distances[v] = candidate;
                    parents[v] = Some(Step {
                        parent: u,
                        segment: edge.segment,
                    });
                }
            }
        }

        (distances, parents)
    }
}

/// Incremental construction for fixtures and loaders; ids are assigned in
/// insertion order.
#[derive(Debug, Default)]
pub struct RoadNetworkBuilder {
    locations: Vec<Location>,
    segments: Vec<RoadSegment>,
}

impl RoadNetworkBuilder {
    pub fn location(mut self, name: impl Into<String>, kind: LocationKind) -> Self {
        let id = LocationId(self.locations.len());
        self.locations.push(Location {
            id,
            name: name.into(),
            kind,
        });
        self
    }

    pub fn segment(
        mut self,
        from: usize,
        to: usize,
        distance_km: u32,
        street: impl Into<String>,
    ) -> Self {
        self.segments.push(RoadSegment {
            from: LocationId(from),
            to: LocationId(to),
            distance_km,
            street: street.into(),
        });
        self
    }

    pub fn build(self) -> Result<RoadNetwork, NetworkError> {
        RoadNetwork::new(self.locations, self.segments)
    }
}

/// Single-source distance table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestDistances {
    distances: Vec<u64>,
}

impl ShortestDistances {
    /// Distance to `id`, `None` when unreachable or outside the network.
    pub fn get(&self, id: LocationId) -> Option<u64> {
        self.distances
            .get(id.0)
            .copied()
            .filter(|&d| d != UNREACHABLE)
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LocationId, u64)> + '_ {
        self.distances
            .iter()
            .enumerate()
            .map(|(index, &distance)| (LocationId(index), distance))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub source: LocationId,
    pub destination: LocationId,
    /// Total km, or [`UNREACHABLE`].
    pub distance: u64,
    /// Locations from source to destination inclusive; empty when unreachable.
    pub path: Vec<LocationId>,
    /// Index into [`RoadNetwork::segments`] of the segment taken for each leg.
    pub segments: Vec<usize>,
}

/// One hop of a route, labelled with the street it follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLeg<'a> {
    pub from: &'a Location,
    pub to: &'a Location,
    pub street: &'a str,
    pub distance_km: u32,
}

impl Route {
    pub fn is_reachable(&self) -> bool {
        self.distance != UNREACHABLE
    }

    pub fn distance_km(&self) -> Option<u64> {
        self.is_reachable().then_some(self.distance)
    }

    pub fn legs<'a>(&self, network: &'a RoadNetwork) -> Vec<RouteLeg<'a>> {
        self.path
            .windows(2)
            .zip(&self.segments)
            .filter_map(|(pair, &index)| {
                let segment = network.segments().get(index)?;
                Some(RouteLeg {
                    from: network.location(pair[0])?,
                    to: network.location(pair[1])?,
                    street: segment.street.as_str(),
                    distance_km: segment.distance_km,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> RoadNetwork {
        RoadNetwork::builder()
            .location("A", LocationKind::Restaurant)
            .location("B", LocationKind::DeliveryPoint)
            .location("C", LocationKind::DeliveryPoint)
            .segment(0, 1, 4, "First St")
            .segment(1, 2, 3, "Second St")
            .build()
            .expect("network")
    }

    #[test]
    fn distances_accumulate_along_a_line() {
        let network = line();
        let table = network.shortest_distances(LocationId(0));
        assert_eq!(table.get(LocationId(0)), Some(0));
        assert_eq!(table.get(LocationId(1)), Some(4));
        assert_eq!(table.get(LocationId(2)), Some(7));
    }

    #[test]
    fn segments_are_traversable_both_ways() {
        let network = line();
        let route = network.shortest_path(LocationId(2), LocationId(0));
        assert_eq!(route.distance, 7);
        assert_eq!(route.path, vec![LocationId(2), LocationId(1), LocationId(0)]);
    }

    #[test]
    fn unreachable_destination_gives_empty_path() {
        let network = RoadNetwork::builder()
            .location("A", LocationKind::Restaurant)
            .location("B", LocationKind::DeliveryPoint)
            .build()
            .expect("network");
        let route = network.shortest_path(LocationId(0), LocationId(1));
        assert!(!route.is_reachable());
        assert!(route.path.is_empty());
        assert_eq!(route.distance, UNREACHABLE);
        assert_eq!(network.shortest_distances(LocationId(0)).get(LocationId(1)), None);
    }

    #[test]
    fn route_to_self_is_single_location() {
        let network = line();
        let route = network.shortest_path(LocationId(1), LocationId(1));
        assert_eq!(route.distance, 0);
        assert_eq!(route.path, vec![LocationId(1)]);
    }

    #[test]
    fn equal_length_paths_keep_the_first_found() {
        // 0 -> 1 -> 3 and 0 -> 2 -> 3 both cost 2; 1 is settled before 2,
        // so 3 is reached through 1 and the later equal offer is ignored.
        let network = RoadNetwork::builder()
            .location("S", LocationKind::Restaurant)
            .location("L", LocationKind::DeliveryPoint)
            .location("R", LocationKind::DeliveryPoint)
            .location("T", LocationKind::DeliveryPoint)
            .segment(0, 1, 1, "left")
            .segment(0, 2, 1, "right")
            .segment(1, 3, 1, "left down")
            .segment(2, 3, 1, "right down")
            .build()
            .expect("network");
        let route = network.shortest_path(LocationId(0), LocationId(3));
        assert_eq!(route.path, vec![LocationId(0), LocationId(1), LocationId(3)]);
    }

    #[test]
    fn out_of_range_source_reaches_nothing() {
        let network = line();
        let table = network.shortest_distances(LocationId(99));
        assert!(table.iter().all(|(_, d)| d == UNREACHABLE));
        assert!(network.shortest_path(LocationId(99), LocationId(0)).path.is_empty());
    }

    #[test]
    fn rejects_segment_to_unknown_location() {
        let err = RoadNetwork::builder()
            .location("A", LocationKind::Restaurant)
            .segment(0, 5, 1, "nowhere")
            .build()
            .expect_err("unknown location");
        assert_eq!(
            err,
            NetworkError::UnknownLocation {
                segment: 0,
                location: LocationId(5)
            }
        );
    }

    #[test]
    fn rejects_sparse_location_ids() {
        let locations = vec![Location {
            id: LocationId(1),
            name: "A".into(),
            kind: LocationKind::Restaurant,
        }];
        let err = RoadNetwork::new(locations, Vec::new()).expect_err("sparse ids");
        assert!(matches!(err, NetworkError::NonDenseIds { expected: 0, .. }));
    }

    #[test]
    fn legs_follow_street_labels() {
        let network = line();
        let route = network.shortest_path(LocationId(0), LocationId(2));
        let legs = route.legs(&network);
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].street, "First St");
        assert_eq!(legs[1].street, "Second St");
        assert_eq!(legs[1].distance_km, 3);
        assert_eq!(legs[1].to.name, "C");
    }

    #[test]
    fn legs_use_the_segment_the_search_took() {
        // The slow road is inserted first; the route takes the bypass.
        let network = RoadNetwork::builder()
            .location("A", LocationKind::Restaurant)
            .location("B", LocationKind::DeliveryPoint)
            .segment(0, 1, 9, "Old Road")
            .segment(1, 0, 3, "Bypass")
            .build()
            .expect("network");
        let route = network.shortest_path(LocationId(0), LocationId(1));
        assert_eq!(route.distance, 3);
        assert_eq!(route.segments, vec![1]);

        let legs = route.legs(&network);
        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].street, "Bypass");
        assert_eq!(legs[0].distance_km, 3);
    }
}
