//! WHOIS Blob Gateway
//!
//! Serves files embedded as `rbs$` blobs in registry records, fetched over
//! WHOIS and cached in memory until invalidated.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request             ┌──────────────────────────────────────────────┐
//!     ───────────────────────────┼─▶ http server ─▶ dispatcher ─▶ record cache  │
//!                                │                      │             │ miss    │
//!                                │                      │             ▼         │
//!                                │                      │        registry ──────┼──▶ WHOIS
//!                                │                      ▼                       │
//!     Client Response            │               blob extractor                 │
//!     ◀──────────────────────────┼─────────────────────┘                        │
//!                                │                                              │
//!                                │  admin API (status, cache, invalidate)       │
//!                                │  signals (SIGHUP clears, SIGTERM drains)     │
//!                                └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use whois_blob_gateway::config::load_config;
use whois_blob_gateway::lifecycle;
use whois_blob_gateway::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "whois-blob-gateway")]
#[command(about = "Serve rbs$ blobs embedded in WHOIS records over HTTP", long_about = None)]
#[command(version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    init_logging(config.observability.log_format);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.listener.bind_host(),
        port = config.listener.port,
        "whois-blob-gateway starting"
    );

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
