//! OpenAPI-aware edge proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────────┐
//!                       │                   EDGE PROXY                      │
//!                       │                                                   │
//!   Client Request      │  ┌──────────┐   /api/*   ┌──────────┐             │
//!   ────────────────────┼─▶│  server  │───────────▶│  filter  │─── 404/405  │
//!                       │  │ (axum)   │            │ (openapi)│             │
//!                       │  └────┬─────┘            └────┬─────┘             │
//!                       │       │ everything else       │ allowed           │
//!                       │       ▼                       ▼                   │
//!                       │  ┌──────────┐            ┌──────────┐             │
//!                       │  │  static  │            │ director │             │
//!                       │  │ + index  │            │ + proxy  │─────────────┼──▶ Upstream
//!                       │  │ fallback │            │ observer │◀────────────┼─── API
//!                       │  └──────────┘            └──────────┘             │
//!                       └──────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use api_edge_proxy::config::{load_from_cli, Cli};
use api_edge_proxy::lifecycle::{signals, startup, Shutdown, StartupError};
use api_edge_proxy::observability::logging;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            eprintln!("api-edge-proxy: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let config = load_from_cli(&cli)?;
    logging::init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        api_prefix = %config.api.prefix,
        match_order = ?config.api.match_order,
        request_timeout_secs = config.timeouts.request_secs,
        "api-edge-proxy starting"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
