//! Predict Command Implementation
//!
//! Trains a single model and prints predictions for a batch of incomes.

use super::{to_monthly, ConfigArgs};
use anyhow::{Context, Result};
use clap::Args;
use finadvisor_serving::AdvisorService;
use finadvisor_training::{Prediction, SyntheticDataset};

/// Train once and predict a batch of incomes
///
/// Without `--income`, the fixture's test incomes are used.
///
/// # Example
///
/// ```bash
/// finadvisor predict --income 2500 --income 9000
/// ```
#[derive(Args, Debug, Clone)]
pub struct PredictCommand {
    /// Incomes to predict for (repeatable)
    #[arg(long = "income")]
    pub incomes: Vec<f64>,

    /// Treat incomes as yearly figures and divide them by 12
    #[arg(long)]
    pub yearly: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl PredictCommand {
    /// The monthly incomes this command predicts for.
    pub fn incomes(&self) -> Vec<f64> {
        if self.incomes.is_empty() {
            SyntheticDataset.test_set().incomes().to_vec()
        } else {
            self.incomes
                .iter()
                .map(|&income| to_monthly(income, self.yearly))
                .collect()
        }
    }

    /// Trains and predicts without printing.
    pub async fn execute(&self) -> Result<Vec<Prediction>> {
        let config = self.config.load()?;
        let service =
            AdvisorService::new(config).context("Failed to create advisor service")?;
        service
            .predict(&self.incomes())
            .await
            .context("Prediction failed")
    }

    /// Executes the command and prints the predictions.
    pub async fn run(&self) -> Result<()> {
        let predictions = self.execute().await?;
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&predictions)
                    .context("Failed to render predictions")?
            );
        } else {
            print!("{}", render_table(&predictions));
        }
        Ok(())
    }
}

fn render_table(predictions: &[Prediction]) -> String {
    let mut out = format!(
        "{:>12} {:>12} {:>12} {:>12}\n",
        "income", "savings", "retirement", "investments"
    );
    for p in predictions {
        out.push_str(&format!(
            "{:>12.2} {:>12.2} {:>12.2} {:>12.2}\n",
            p.income, p.savings, p.retirement, p.investments
        ));
    }
    out
}
