use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use dispatch_core::config::DispatchConfig;
use dispatch_core::engine::DispatchEngine;
use dispatch_core::model::{Courier, Customer, Order, Restaurant, RestaurantId};
use dispatch_core::network::{Location, LocationId, RoadSegment};
use dispatch_core::queues::QueueKind;
use dispatch_core::report::{DispatchReport, PendingCounts, UndoOutcome};
use dispatch_io::{load_submissions, DataDir};

use crate::cli::{Cli, Commands, OutputFormat};
use crate::render;

#[derive(Serialize)]
struct NetworkOutput<'a> {
    locations: &'a [Location],
    segments: &'a [RoadSegment],
}

#[derive(Serialize)]
struct RouteOutput<'a> {
    from: LocationId,
    to: LocationId,
    distance_km: Option<u64>,
    eta_minutes: Option<u64>,
    path: &'a [LocationId],
}

#[derive(Serialize)]
struct RestaurantEntry<'a> {
    #[serde(flatten)]
    restaurant: &'a Restaurant,
    /// Where orders are picked up under the configured placement.
    pickup: Option<LocationId>,
}

#[derive(Serialize)]
struct CouriersOutput<'a> {
    available: usize,
    couriers: Vec<&'a Courier>,
}

#[derive(Serialize)]
struct PendingEntry<'a> {
    queue: QueueKind,
    #[serde(flatten)]
    order: &'a Order,
}

#[derive(Serialize)]
struct PendingOutput<'a> {
    urgent_threshold: u32,
    counts: PendingCounts,
    orders: Vec<PendingEntry<'a>>,
}

#[derive(Serialize)]
struct Rejection {
    customer: String,
    error: String,
}

#[derive(Serialize, Default)]
struct DispatchOutput {
    accepted: usize,
    rejected: Vec<Rejection>,
    cycles: Vec<DispatchReport>,
    undone: Vec<UndoOutcome>,
    pending: PendingCounts,
}

fn load_config(path: Option<&Path>) -> Result<DispatchConfig> {
    let Some(path) = path else {
        return Ok(DispatchConfig::default());
    };
    DispatchConfig::from_path(path).with_context(|| format!("loading config {}", path.display()))
}

fn load_engine(data: &DataDir, config: DispatchConfig) -> Result<DispatchEngine> {
    data.load_engine(config)
        .with_context(|| format!("loading data directory {}", data.root().display()))
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Execute one parsed command line, writing results to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let data = DataDir::new(&cli.data_dir);

    match &cli.command {
        Commands::Network => {
            let network = data
                .load_network()
                .with_context(|| format!("loading network from {}", data.root().display()))?;
            match cli.format {
                OutputFormat::Text => render::network(out, &network)?,
                OutputFormat::Json => write_json(
                    out,
                    &NetworkOutput {
                        locations: network.locations(),
                        segments: network.segments(),
                    },
                )?,
            }
        }
        Commands::Route { from, to } => {
            let network = data
                .load_network()
                .with_context(|| format!("loading network from {}", data.root().display()))?;
            let (from, to) = (LocationId(*from), LocationId(*to));
            for id in [from, to] {
                anyhow::ensure!(network.contains(id), "unknown location {id}");
            }
            let route = network.shortest_path(from, to);
            let eta = route.distance_km().and_then(|km| config.eta_minutes(km));
            match cli.format {
                OutputFormat::Text => render::route(out, &network, &route, eta)?,
                OutputFormat::Json => write_json(
                    out,
                    &RouteOutput {
                        from,
                        to,
                        distance_km: route.distance_km(),
                        eta_minutes: eta,
                        path: &route.path,
                    },
                )?,
            }
        }
        Commands::Restaurants => {
            let engine = load_engine(&data, config)?;
            match cli.format {
                OutputFormat::Text => render::restaurants(out, &engine)?,
                OutputFormat::Json => {
                    let entries: Vec<RestaurantEntry> = engine
                        .restaurants()
                        .by_name()
                        .into_iter()
                        .map(|restaurant| RestaurantEntry {
                            restaurant,
                            pickup: engine.restaurant_location(restaurant.id),
                        })
                        .collect();
                    write_json(out, &entries)?
                }
            }
        }
        Commands::Couriers => {
            let engine = load_engine(&data, config)?;
            match cli.format {
                OutputFormat::Text => render::couriers(out, &engine)?,
                OutputFormat::Json => write_json(
                    out,
                    &CouriersOutput {
                        available: engine.couriers().available_count(),
                        couriers: engine.couriers().iter().collect(),
                    },
                )?,
            }
        }
        Commands::Customers => {
            let engine = load_engine(&data, config)?;
            match cli.format {
                OutputFormat::Text => render::customers(out, &engine)?,
                OutputFormat::Json => {
                    let customers: Vec<&Customer> = engine.customers().iter().collect();
                    write_json(out, &customers)?
                }
            }
        }
        Commands::History => {
            let engine = load_engine(&data, config)?;
            match cli.format {
                OutputFormat::Text => render::history(out, &engine)?,
                OutputFormat::Json => write_json(out, &engine.order_history())?,
            }
        }
        Commands::Pending => {
            let engine = load_engine(&data, config)?;
            match cli.format {
                OutputFormat::Text => render::pending_orders(out, &engine)?,
                OutputFormat::Json => write_json(
                    out,
                    &PendingOutput {
                        urgent_threshold: engine.config().urgent_threshold,
                        counts: engine.pending_counts(),
                        orders: engine
                            .pending_orders()
                            .into_iter()
                            .map(|(queue, order)| PendingEntry { queue, order })
                            .collect(),
                    },
                )?,
            }
        }
        Commands::Dispatch {
            orders,
            cycles,
            undo,
        } => dispatch(&data, config, orders.as_deref(), *cycles, *undo, cli.format, out)?,
    }
    Ok(())
}

fn dispatch(
    data: &DataDir,
    config: DispatchConfig,
    orders: Option<&Path>,
    cycles: usize,
    undo: usize,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let mut engine = load_engine(data, config)?;
    let submissions = match orders {
        Some(path) => load_submissions(path)
            .with_context(|| format!("loading orders {}", path.display()))?,
        None => Vec::new(),
    };

    let text = format == OutputFormat::Text;
    let mut output = DispatchOutput::default();

    for row in &submissions {
        match engine.submit_order(
            &row.customer,
            LocationId(row.delivery_point),
            RestaurantId(row.restaurant_id),
            row.priority,
        ) {
            Ok(_) => output.accepted += 1,
            Err(err) => {
                warn!(customer = %row.customer, error = %err, "order rejected");
                if text {
                    render::rejected(out, row, &err)?;
                }
                output.rejected.push(Rejection {
                    customer: row.customer.clone(),
                    error: err.to_string(),
                });
            }
        }
    }
    info!(
        accepted = output.accepted,
        rejected = output.rejected.len(),
        "orders submitted"
    );

    for number in 1..=cycles {
        let report = engine.dispatch_cycle();
        if text {
            render::cycle(out, number, &report)?;
        }
        output.cycles.push(report);
    }

    for _ in 0..undo {
        let outcome = engine.undo_last_assignment();
        if text {
            render::undo(out, &outcome)?;
        }
        output.undone.push(outcome);
    }

    data.save_customers(&engine)
        .with_context(|| format!("saving customers to {}", data.users().display()))?;
    data.save_pending(&engine)
        .with_context(|| format!("saving pending orders to {}", data.pending().display()))?;

    output.pending = engine.pending_counts();
    if output.pending.total() > 0 {
        warn!(
            urgent = output.pending.urgent,
            backlog = output.pending.backlog,
            "orders still waiting; kept for the next run"
        );
    }
    if text {
        render::pending(out, output.pending)?;
    } else {
        write_json(out, &output)?;
    }
    Ok(())
}
