//! BikeNode server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p bikenode-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use bikenode_common::{try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // LOG_LEVEL may come from .env, so load it before the subscriber
    let _ = dotenvy::dotenv();

    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    info!("Starting BikeNode server...");

    let config = AppConfig::from_env().inspect_err(|e| {
        error!(error = %e, "Failed to load configuration");
    })?;

    info!(
        env = ?config.app.env,
        address = %config.server.address(),
        "Configuration loaded"
    );

    bikenode_api::run(config).await?;

    Ok(())
}
