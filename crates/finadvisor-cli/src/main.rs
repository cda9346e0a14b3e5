//! Finadvisor CLI - train the advisor model and query it from the command line.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use finadvisor_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("finadvisor=info".parse()?))
        .init();

    let cli = Cli::parse();

    info!("Finadvisor CLI starting...");

    match cli.command {
        Commands::Train(cmd) => cmd.run().await?,
        Commands::Predict(cmd) => cmd.run().await?,
        Commands::Dataset(cmd) => cmd.run()?,
    }

    info!("Finadvisor CLI completed successfully");
    Ok(())
}
