use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "dispatch",
    about = "Food-delivery dispatch over a city road network",
    long_about = "Loads a data directory of CSV files (locations, road segments,\n\
                  restaurants, couriers, order history), submits new orders and\n\
                  matches them to the nearest available courier. Orders left\n\
                  waiting are kept in pending.csv for the next run."
)]
pub struct Cli {
    /// Directory holding nodes.csv, edges.csv, restaurants.csv, agents.csv
    #[arg(long, global = true, env = "DISPATCH_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// JSON engine configuration; defaults apply when omitted
    #[arg(long, global = true, env = "DISPATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List locations and road segments
    Network,
    /// Shortest route between two locations
    Route {
        #[arg(long)]
        from: usize,
        #[arg(long)]
        to: usize,
    },
    /// Restaurants in alphabetical order
    Restaurants,
    /// Couriers and whether each is available
    Couriers,
    /// Customers registered by earlier runs
    Customers,
    /// Every order dispatched so far
    History,
    /// Orders still queued from the last run
    Pending,
    /// Submit orders from a CSV file and run dispatch cycles
    Dispatch {
        /// CSV with columns customer,deliveryPoint,restaurantId,priority;
        /// without it only the orders left pending are dispatched
        #[arg(long)]
        orders: Option<PathBuf>,
        /// Number of dispatch cycles to run after submitting
        #[arg(long, default_value_t = 1)]
        cycles: usize,
        /// Undo this many of the most recent assignments afterwards
        #[arg(long, default_value_t = 0)]
        undo: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
