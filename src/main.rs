//! Bookmark Server
//!
//! A URI shortener built with Tokio and Axum. It keeps a mapping from short
//! names to long URIs and only accepts a new URI after a GET against it
//! returns 200 OK.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ handlers ──┬──▶ GET  /        form + listing
//!                     (trace, id,                 ├──▶ GET  /<name>  303 / 404
//!                      timeout)                   └──▶ POST /...     validator ──▶ registry
//!                                                                       │
//!                                                                       ▼
//!                                                                 remote URI (GET)
//! ```
//!
//! Configuration: an optional TOML file (`--config`), then the `PORT`
//! environment variable (default 8000).

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use bookmark_server::config::resolve_config;
use bookmark_server::lifecycle::{signals::wait_for_signal, Shutdown};
use bookmark_server::observability::{logging::init_logging, metrics::init_metrics};
use bookmark_server::BookmarkServer;

#[derive(Parser)]
#[command(name = "bookmark-server")]
#[command(about = "Short-link registry that only admits live URIs", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(args.config.as_deref())?;

    init_logging(&config.observability);

    tracing::info!("bookmark-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        validator_timeout_secs = config.validator.timeout_secs,
        cookie_max_age_secs = config.cookie.max_age_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = BookmarkServer::new(config)?;
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    wait_for_signal().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
