//! OS signal handling.
//!
//! # Responsibilities
//! - SIGHUP → clear the record cache (the invalidation trigger)
//! - SIGINT / SIGTERM → trigger graceful shutdown
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Handlers are installed before `spawn_signal_handlers` returns, so a
//!   SIGHUP right after startup is never fatal to the process

use std::future::Future;
use tokio::signal;
use tracing::{error, info};

use crate::cache::RecordCache;
use crate::lifecycle::Shutdown;

/// Install the SIGHUP handler and return the loop that clears `cache` on
/// every delivery.
#[cfg(unix)]
pub fn invalidate_on_hangup(cache: RecordCache) -> std::io::Result<impl Future<Output = ()>> {
    let mut hangup = signal::unix::signal(signal::unix::SignalKind::hangup())?;

    Ok(async move {
        while hangup.recv().await.is_some() {
            cache.invalidate("sighup");
        }
    })
}

/// Resolve on SIGINT, or SIGTERM on unix.
pub async fn wait_for_termination() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                error!("failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, initiating graceful shutdown"),
        _ = terminate => info!("received SIGTERM, initiating graceful shutdown"),
    }
}

/// Spawn the invalidation and termination tasks.
pub fn spawn_signal_handlers(cache: RecordCache, shutdown: Shutdown) -> std::io::Result<()> {
    #[cfg(unix)]
    tokio::spawn(invalidate_on_hangup(cache)?);

    #[cfg(not(unix))]
    drop(cache);

    tokio::spawn(async move {
        wait_for_termination().await;
        shutdown.trigger();
    });

    Ok(())
}
