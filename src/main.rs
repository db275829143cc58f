//! JSON-RPC Admission Gateway
//!
//! A single-endpoint gateway built with Tokio and Axum: it accepts
//! JSON-RPC requests over HTTP, decides per method name whether the call
//! may proceed, and relays admitted requests byte-for-byte to one
//! configured upstream, streaming the response back.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────┐
//!                  │                 RPC GATEWAY                    │
//!                  │                                                │
//!   JSON-RPC       │  ┌─────────┐   ┌───────────┐   ┌───────────┐  │
//!   request ───────┼─▶│  http   │──▶│  gateway  │──▶│ admission │  │
//!                  │  │ server  │   │  handler  │   │  policy   │  │
//!                  │  └─────────┘   └─────┬─────┘   └───────────┘  │
//!                  │                      │ raw bytes              │
//!                  │                      ▼                        │
//!   response       │                ┌───────────┐                  │     Upstream
//!   ◀──────────────┼────────────────│   relay   │◀─────────────────┼──── JSON-RPC
//!                  │                └───────────┘                  │     endpoint
//!                  │                                                │
//!                  │  config · lifecycle · observability            │
//!                  └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use rpc_gateway::config::{load_config, GatewayConfig};
use rpc_gateway::lifecycle::Shutdown;
use rpc_gateway::observability::{logging, metrics};
use rpc_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "rpc-gateway", version, about = "Single-endpoint JSON-RPC admission gateway", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.endpoint,
        max_content_length = config.limits.max_content_length,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // run() also watches OS signals; the coordinator exists so tests and
    // embedders can stop the server programmatically.
    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
