//! Finadvisor CLI Library
//!
//! This crate provides the command-line interface for the finance advisor:
//!
//! - **Train**: train the model and answer one request
//! - **Predict**: train once and predict a batch of incomes
//! - **Dataset**: print the synthetic training fixture
//!
//! # Example
//!
//! ```bash
//! # Answer one request with a monthly income
//! finadvisor train --income 5000
//!
//! # Same, from a yearly figure, with fewer epochs
//! finadvisor train --income 60000 --yearly --epochs 500
//!
//! # Predict the fixture's test incomes
//! finadvisor predict
//! ```

pub mod commands;

use clap::{Parser, Subcommand};

pub use commands::{ConfigArgs, DatasetCommand, PolicyArg, PredictCommand, TrainCommand};

/// Finadvisor - savings, retirement and investment recommendations
///
/// Trains a small regression network on a synthetic income table and
/// recommends monthly amounts for a given income.
#[derive(Parser, Debug)]
#[command(name = "finadvisor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the model and answer one request
    Train(TrainCommand),

    /// Train once and predict a batch of incomes
    Predict(PredictCommand),

    /// Print the synthetic training fixture as JSON
    Dataset(DatasetCommand),
}

/// Result type alias for CLI operations
pub type CliResult<T> = anyhow::Result<T>;
