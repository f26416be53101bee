//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bookmark_requests_total` (counter): requests by flow, status
//! - `bookmark_request_duration_seconds` (histogram): latency by flow
//! - `bookmark_liveness_checks_total` (counter): checks by outcome
//! - `bookmark_liveness_check_duration_seconds` (histogram)
//! - `bookmark_registry_entries` (gauge): current registry size
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics recorder"),
    }
}

/// Record a completed request.
pub fn record_request(flow: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "bookmark_requests_total",
        "flow" => flow,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("bookmark_request_duration_seconds", "flow" => flow)
        .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of one liveness check.
pub fn record_liveness_check(outcome: &'static str, elapsed: Duration) {
    metrics::counter!("bookmark_liveness_checks_total", "outcome" => outcome).increment(1);
    metrics::histogram!("bookmark_liveness_check_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record the current registry size.
pub fn record_registry_size(entries: usize) {
    metrics::gauge!("bookmark_registry_entries").set(entries as f64);
}
