//! Dispatch engine configuration.
//!
//! Every field has a default; JSON files only need to name the fields they
//! change.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::network::LocationId;
use crate::queues::DEFAULT_URGENT_THRESHOLD;

/// Flat average speed used for ETA estimates (km/h).
pub const DEFAULT_AVG_SPEED_KMH: u32 = 30;

/// Distance tables kept by the route cache; one per restaurant location is plenty.
pub const DEFAULT_ROUTE_CACHE_CAPACITY: usize = 64;

/// How much of the backlog one dispatch cycle works through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacklogDrain {
    /// Attempt every backlog order.
    #[default]
    All,
    /// Stop after this many successful backlog dispatches; the remainder
    /// keeps its queue position.
    Capped(usize),
}

/// How a restaurant id is turned into a graph location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestaurantPlacement {
    /// Location id = restaurant id - 1.
    #[default]
    IdOffset,
    /// The location recorded on the restaurant itself.
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Orders with priority >= this value go to the urgent queue.
    pub urgent_threshold: u32,
    pub avg_speed_kmh: u32,
    pub backlog_drain: BacklogDrain,
    pub restaurant_placement: RestaurantPlacement,
    /// Accepted delivery locations. `None` accepts every delivery-point
    /// location of the network.
    pub delivery_points: Option<Vec<LocationId>>,
    /// 0 disables distance-table caching.
    pub route_cache_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            urgent_threshold: DEFAULT_URGENT_THRESHOLD,
            avg_speed_kmh: DEFAULT_AVG_SPEED_KMH,
            backlog_drain: BacklogDrain::All,
            restaurant_placement: RestaurantPlacement::IdOffset,
            delivery_points: None,
            route_cache_capacity: DEFAULT_ROUTE_CACHE_CAPACITY,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("avg_speed_kmh must be greater than zero")]
    ZeroSpeed,
}

impl DispatchConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.avg_speed_kmh == 0 {
            return Err(ConfigError::ZeroSpeed);
        }
        Ok(())
    }

    pub fn with_urgent_threshold(mut self, threshold: u32) -> Self {
        self.urgent_threshold = threshold;
        self
    }

    pub fn with_avg_speed_kmh(mut self, speed: u32) -> Self {
        self.avg_speed_kmh = speed;
        self
    }

    pub fn with_backlog_drain(mut self, drain: BacklogDrain) -> Self {
        self.backlog_drain = drain;
        self
    }

    pub fn with_restaurant_placement(mut self, placement: RestaurantPlacement) -> Self {
        self.restaurant_placement = placement;
        self
    }

    pub fn with_delivery_points(mut self, points: Vec<LocationId>) -> Self {
        self.delivery_points = Some(points);
        self
    }

    pub fn with_route_cache_capacity(mut self, capacity: usize) -> Self {
        self.route_cache_capacity = capacity;
        self
    }

    /// Whole minutes to cover `distance_km` at the configured speed.
    pub fn eta_minutes(&self, distance_km: u64) -> Option<u64> {
        distance_km
            .checked_mul(60)?
            .checked_div(u64::from(self.avg_speed_kmh))
    }
}
