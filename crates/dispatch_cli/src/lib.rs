//! Command-line front end for the dispatch engine.

pub mod cli;
pub mod commands;
mod render;

pub use cli::Cli;
pub use commands::run;
