//! Writers for order history, customers and pending orders, plus the CSV
//! history sink.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use dispatch_core::history::{HistorySink, SinkError};
use dispatch_core::model::{Customer, Order};
use dispatch_core::queues::QueueKind;

use crate::error::LoadError;
use crate::records::{OrderRow, PendingRow, UserRow};

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<(), LoadError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| LoadError::csv(path, e))?;
    let mut count = 0usize;
    for row in rows {
        writer.serialize(row).map_err(|e| LoadError::csv(path, e))?;
        count += 1;
    }
    writer.flush().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), rows = count, "wrote csv");
    Ok(())
}

/// Overwrite `path` with the full order history.
///
/// An empty history still writes the header row.
pub fn save_order_history(path: &Path, history: &[Order]) -> Result<(), LoadError> {
    if history.is_empty() {
        return write_header(path, "orderId,userId,restaurantId,agentId,priority,status");
    }
    write_rows(path, history.iter().map(OrderRow::from))
}

/// Overwrite `path` with every known customer.
pub fn save_customers<'a>(
    path: &Path,
    customers: impl IntoIterator<Item = &'a Customer>,
) -> Result<(), LoadError> {
    let rows: Vec<UserRow> = customers.into_iter().map(UserRow::from).collect();
    if rows.is_empty() {
        return write_header(path, "id,name,nodeId");
    }
    write_rows(path, rows)
}

/// Overwrite `path` with the orders still queued, in requeue order.
pub fn save_pending<'a>(
    path: &Path,
    pending: impl IntoIterator<Item = (QueueKind, &'a Order)>,
) -> Result<(), LoadError> {
    let rows: Vec<PendingRow> = pending
        .into_iter()
        .map(|(queue, order)| PendingRow::new(queue, order))
        .collect();
    if rows.is_empty() {
        return write_header(path, "orderId,userId,restaurantId,priority,queue");
    }
    write_rows(path, rows)
}

fn write_header(path: &Path, header: &str) -> Result<(), LoadError> {
    std::fs::write(path, format!("{header}\n")).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// History sink that rewrites an `orders.csv` file on every persist.
#[derive(Debug, Clone)]
pub struct CsvHistorySink {
    path: PathBuf,
}

impl CsvHistorySink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistorySink for CsvHistorySink {
    fn persist(&self, history: &[Order]) -> Result<(), SinkError> {
        save_order_history(&self.path, history).map_err(SinkError::new)
    }
}
