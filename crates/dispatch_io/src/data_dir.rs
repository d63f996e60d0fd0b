//! Standard layout of a data directory and a one-call engine loader.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use dispatch_core::config::DispatchConfig;
use dispatch_core::engine::DispatchEngine;
use dispatch_core::network::RoadNetwork;

use crate::error::LoadError;
use crate::load::{
    load_couriers, load_customers, load_network, load_order_history, load_pending,
    load_restaurants,
};
use crate::store::{save_customers, save_pending, CsvHistorySink};

pub const NODES_FILE: &str = "nodes.csv";
pub const EDGES_FILE: &str = "edges.csv";
pub const RESTAURANTS_FILE: &str = "restaurants.csv";
pub const AGENTS_FILE: &str = "agents.csv";
pub const ORDERS_FILE: &str = "orders.csv";
pub const USERS_FILE: &str = "users.csv";
pub const PENDING_FILE: &str = "pending.csv";

#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn nodes(&self) -> PathBuf {
        self.root.join(NODES_FILE)
    }

    pub fn edges(&self) -> PathBuf {
        self.root.join(EDGES_FILE)
    }

    pub fn restaurants(&self) -> PathBuf {
        self.root.join(RESTAURANTS_FILE)
    }

    pub fn agents(&self) -> PathBuf {
        self.root.join(AGENTS_FILE)
    }

    pub fn orders(&self) -> PathBuf {
        self.root.join(ORDERS_FILE)
    }

    pub fn users(&self) -> PathBuf {
        self.root.join(USERS_FILE)
    }

    pub fn pending(&self) -> PathBuf {
        self.root.join(PENDING_FILE)
    }

    pub fn load_network(&self) -> Result<RoadNetwork, LoadError> {
        load_network(&self.nodes(), &self.edges())
    }

    /// Build an engine from every file in the directory. Prior orders,
    /// customers and still-pending orders are replayed; the returned engine
    /// persists its history back to `orders.csv`.
    pub fn load_engine(&self, config: DispatchConfig) -> Result<DispatchEngine, LoadError> {
        let network = Arc::new(self.load_network()?);
        let restaurants = load_restaurants(&self.restaurants())?;
        let couriers = load_couriers(&self.agents())?;
        let customers = load_customers(&self.users())?;
        let history = load_order_history(&self.orders())?;
        let pending = load_pending(&self.pending())?;
        info!(
            root = %self.root.display(),
            prior_orders = history.len(),
            pending_orders = pending.len(),
            "data directory loaded"
        );

        Ok(
            DispatchEngine::new(network, restaurants, couriers, config)
                .with_customers(customers)
                .with_history(history)
                .with_pending(pending)
                .with_history_sink(Box::new(CsvHistorySink::new(self.orders()))),
        )
    }

    /// Write the engine's queued orders to `pending.csv` for the next run.
    pub fn save_pending(&self, engine: &DispatchEngine) -> Result<(), LoadError> {
        save_pending(&self.pending(), engine.pending_orders())
    }

    /// Write the engine's customers to `users.csv`.
    pub fn save_customers(&self, engine: &DispatchEngine) -> Result<(), LoadError> {
        save_customers(&self.users(), engine.customers().iter())
    }
}
