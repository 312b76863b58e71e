use anyhow::{Context, Result};
use clap::Parser;
use price_tracker::{init_logging, Application, Cli};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Preload environment variables from .env file if it exists before parsing CLI args
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let _guard = init_logging(cli.log_file()).context("initializing logging")?;
    info!("price-tracker {} starting", env!("CARGO_PKG_VERSION"));

    Application::init(cli)?.run().await
}
