//! Dataset Command Implementation

use anyhow::{Context, Result};
use clap::Args;
use finadvisor_training::{SyntheticDataset, PROBE_INCOME};
use serde_json::{json, Value};

/// Print the synthetic training fixture as JSON
#[derive(Args, Debug, Clone, Default)]
pub struct DatasetCommand {}

impl DatasetCommand {
    /// The fixture as a JSON document.
    pub fn execute(&self) -> Value {
        let dataset = SyntheticDataset;
        json!({
            "training": dataset.examples(),
            "testIncomes": dataset.test_set().incomes(),
            "probeIncome": PROBE_INCOME,
        })
    }

    /// Prints the fixture.
    pub fn run(&self) -> Result<()> {
        let rendered =
            serde_json::to_string_pretty(&self.execute()).context("Failed to render dataset")?;
        println!("{}", rendered);
        Ok(())
    }
}
