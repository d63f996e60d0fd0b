//! Readers for the data directory's CSV files.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use dispatch_core::model::{Courier, Customer, Order, Restaurant};
use dispatch_core::network::{Location, LocationId, RoadNetwork, RoadSegment};
use dispatch_core::queues::QueueKind;
use dispatch_core::registry::{CourierRoster, CustomerBook, RestaurantDirectory};

use crate::error::LoadError;
use crate::records::{
    order_from_row, parse_courier, parse_kind, parse_status, AgentRow, EdgeRow, NodeRow,
    OrderRow, PendingRow, RestaurantRow, SubmissionRow, UserRow,
};

pub(crate) fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| LoadError::csv(path, e))?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| LoadError::csv(path, e))?;
    debug!(path = %path.display(), rows = rows.len(), "read csv");
    Ok(rows)
}

/// Load locations from `nodes` and road segments from `edges`.
pub fn load_network(nodes: &Path, edges: &Path) -> Result<RoadNetwork, LoadError> {
    let locations = read_rows::<NodeRow>(nodes)?
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let kind = parse_kind(&row.kind).ok_or_else(|| LoadError::InvalidField {
                path: nodes.to_path_buf(),
                row: index + 1,
                field: "type",
                value: row.kind.clone(),
            })?;
            Ok(Location {
                id: LocationId(row.id),
                name: row.name,
                kind,
            })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    let segments: Vec<RoadSegment> = read_rows::<EdgeRow>(edges)?
        .into_iter()
        .map(|row| RoadSegment {
            from: LocationId(row.source),
            to: LocationId(row.destination),
            distance_km: row.weight,
            street: row.street,
        })
        .collect();

    let network = RoadNetwork::new(locations, segments).map_err(|source| {
        let path = match source {
            dispatch_core::network::NetworkError::NonDenseIds { .. } => nodes,
            dispatch_core::network::NetworkError::UnknownLocation { .. } => edges,
        };
        LoadError::Network {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!(
        locations = network.len(),
        segments = network.segments().len(),
        "loaded road network"
    );
    Ok(network)
}

pub fn load_restaurants(path: &Path) -> Result<RestaurantDirectory, LoadError> {
    let mut directory = RestaurantDirectory::new();
    for row in read_rows::<RestaurantRow>(path)? {
        directory
            .insert(Restaurant::from(row))
            .map_err(|source| LoadError::Registry {
                path: path.to_path_buf(),
                source,
            })?;
    }
    info!(restaurants = directory.len(), "loaded restaurants");
    Ok(directory)
}

/// Couriers start available regardless of any earlier run.
pub fn load_couriers(path: &Path) -> Result<CourierRoster, LoadError> {
    let mut roster = CourierRoster::new();
    for row in read_rows::<AgentRow>(path)? {
        roster
            .register(Courier::from(row))
            .map_err(|source| LoadError::Registry {
                path: path.to_path_buf(),
                source,
            })?;
    }
    info!(couriers = roster.len(), "loaded couriers");
    Ok(roster)
}

/// Order history from an earlier run. A missing file is an empty history.
pub fn load_order_history(path: &Path) -> Result<Vec<Order>, LoadError> {
    if !path.exists() {
        debug!(path = %path.display(), "no order history yet");
        return Ok(Vec::new());
    }

    let orders = read_rows::<OrderRow>(path)?
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let invalid = |field: &'static str, value: String| LoadError::InvalidField {
                path: path.to_path_buf(),
                row: index + 1,
                field,
                value,
            };
            let status = parse_status(&row.status)
                .ok_or_else(|| invalid("status", row.status.clone()))?;
            let courier = parse_courier(row.agent_id)
                .ok_or_else(|| invalid("agentId", row.agent_id.to_string()))?;
            Ok(order_from_row(row, status, courier))
        })
        .collect::<Result<Vec<_>, LoadError>>()?;
    info!(orders = orders.len(), "loaded order history");
    Ok(orders)
}

/// Customers from an earlier run. A missing file is an empty book.
pub fn load_customers(path: &Path) -> Result<CustomerBook, LoadError> {
    let mut book = CustomerBook::new();
    if !path.exists() {
        return Ok(book);
    }
    for row in read_rows::<UserRow>(path)? {
        book.insert(Customer::from(row))
            .map_err(|source| LoadError::Registry {
                path: path.to_path_buf(),
                source,
            })?;
    }
    info!(customers = book.len(), "loaded customers");
    Ok(book)
}

/// Orders left queued by an earlier run, in file order. A missing file
/// means nothing is pending.
pub fn load_pending(path: &Path) -> Result<Vec<(QueueKind, Order)>, LoadError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let pending: Vec<(QueueKind, Order)> = read_rows::<PendingRow>(path)?
        .into_iter()
        .map(PendingRow::into_order)
        .collect();
    info!(orders = pending.len(), "loaded pending orders");
    Ok(pending)
}

/// New orders to submit, in file order.
pub fn load_submissions(path: &Path) -> Result<Vec<SubmissionRow>, LoadError> {
    read_rows(path)
}
