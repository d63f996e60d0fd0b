//! History sinks: where the order history goes after a productive dispatch cycle.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::model::Order;

#[derive(Error, Debug)]
#[error("failed to persist order history: {0}")]
pub struct SinkError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl SinkError {
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(err))
    }
}

/// Receives the full order history whenever a cycle dispatched at least one
/// order. Implementations overwrite what they stored previously.
pub trait HistorySink: Send + Sync {
    fn persist(&self, history: &[Order]) -> Result<(), SinkError>;
}

/// Keeps every persisted snapshot in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryHistorySink {
    snapshots: Arc<Mutex<Vec<Vec<Order>>>>,
}

impl MemoryHistorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.lock().map_or(0, |s| s.len())
    }

    pub fn latest(&self) -> Option<Vec<Order>> {
        self.snapshots.lock().ok()?.last().cloned()
    }
}

impl HistorySink for MemoryHistorySink {
    fn persist(&self, history: &[Order]) -> Result<(), SinkError> {
        let mut snapshots = self
            .snapshots
            .lock()
            .map_err(|e| SinkError(e.to_string().into()))?;
        snapshots.push(history.to_vec());
        Ok(())
    }
}
