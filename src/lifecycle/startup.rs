//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order (metrics, cache, registry, dispatcher)
//! - Install signal handlers before any listener accepts traffic
//! - Bind the admin and public listeners and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The public listener starts last

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::admin::{self, AdminState};
use crate::cache::RecordCache;
use crate::config::GatewayConfig;
use crate::dispatch::RequestDispatcher;
use crate::http::GatewayServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::registry::WhoisClient;

/// Fatal errors while bringing the gateway up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] std::io::Error),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Bring the gateway up and serve until SIGINT/SIGTERM.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let cache = RecordCache::new();
    let registry = Arc::new(WhoisClient::new(&config.registry));
    let dispatcher =
        RequestDispatcher::new(registry, cache.clone(), config.client_key.default.clone());

    let shutdown = Shutdown::new();
    signals::spawn_signal_handlers(cache.clone(), shutdown.clone())
        .map_err(StartupError::Signals)?;

    let admin_task = if config.admin.enabled {
        let listener = bind(&config.admin.bind_address).await?;
        let state = AdminState::new(cache.clone(), &config.admin.api_key);
        let signal = shutdown.subscribe();
        Some(tokio::spawn(async move {
            if let Err(e) = admin::serve(listener, state, signal).await {
                tracing::error!(error = %e, "Admin server failed");
            }
        }))
    } else {
        None
    };

    let address = format!("{}:{}", config.listener.bind_host(), config.listener.port);
    let listener = TcpListener::bind((config.listener.bind_host(), config.listener.port))
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    tracing::info!(
        client_key_header = %config.client_key.header,
        default_client_key = ?config.client_key.default,
        registry = %config.registry.server,
        "Gateway configured"
    );

    let result = GatewayServer::new(&config, dispatcher)
        .run(listener, shutdown.subscribe())
        .await;

    // Take the admin listener down with the public one, even on error.
    shutdown.trigger();
    if let Some(task) = admin_task {
        let _ = task.await;
    }

    Ok(result?)
}

async fn bind(address: &str) -> Result<TcpListener, StartupError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.to_string(),
            source,
        })
}
