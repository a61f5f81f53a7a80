//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): replies by status
//! - `gateway_request_duration_seconds` (histogram): time to reply
//! - `gateway_cache_lookups_total` (counter): cache hits and misses
//! - `gateway_cache_entries` (gauge): records currently cached
//! - `gateway_cache_invalidations_total` (counter): clears by trigger
//! - `gateway_registry_lookups_total` (counter): registry calls by outcome
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(status: u16, start: Instant) {
    counter!("gateway_requests_total", "status" => status.to_string()).increment(1);
    histogram!("gateway_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("gateway_cache_lookups_total", "result" => result).increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("gateway_cache_entries").set(entries as f64);
}

pub fn record_cache_invalidation(trigger: &'static str) {
    counter!("gateway_cache_invalidations_total", "trigger" => trigger).increment(1);
}

pub fn record_registry_lookup(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("gateway_registry_lookups_total", "outcome" => outcome).increment(1);
}
