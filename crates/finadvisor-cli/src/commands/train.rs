//! Train Command Implementation
//!
//! Sends one request through the advisor service and prints the response
//! payload, exactly as an HTTP client would receive it.

use super::{to_monthly, ConfigArgs};
use anyhow::{bail, Context, Result};
use clap::Args;
use finadvisor_serving::{AdvisorService, TrainingOutcome};
use serde_json::{json, Value};
use tracing::info;

/// Train the model and answer one request
///
/// # Example
///
/// ```bash
/// finadvisor train --income 5000
/// finadvisor train --income 60000 --yearly
/// finadvisor train --body '{"income": "4200"}'
/// ```
#[derive(Args, Debug, Clone)]
pub struct TrainCommand {
    /// Monthly income to predict for
    #[arg(long, conflicts_with = "body")]
    pub income: Option<f64>,

    /// Raw JSON request body
    #[arg(long)]
    pub body: Option<String>,

    /// Treat --income as a yearly figure and divide it by 12
    #[arg(long, requires = "income")]
    pub yearly: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl TrainCommand {
    /// Runs the request and returns the outcome without printing it.
    pub async fn execute(&self) -> Result<TrainingOutcome> {
        let config = self.config.load()?;
        let service =
            AdvisorService::new(config).context("Failed to create advisor service")?;

        let outcome = match &self.body {
            Some(body) => service.handle_body(body).await,
            None => service.handle(&self.request_body()).await,
        };
        Ok(outcome)
    }

    /// Executes the command and prints the response JSON.
    pub async fn run(&self) -> Result<()> {
        let outcome = self.execute().await?;
        let rendered =
            serde_json::to_string_pretty(&outcome.body).context("Failed to render response")?;
        println!("{}", rendered);

        if !outcome.is_success() {
            bail!("Request failed with status {}", outcome.status.code());
        }
        info!(status = outcome.status.code(), "Request completed");
        Ok(())
    }

    fn request_body(&self) -> Value {
        match self.income {
            Some(income) => json!({ "income": to_monthly(income, self.yearly) }),
            None => json!({}),
        }
    }
}
