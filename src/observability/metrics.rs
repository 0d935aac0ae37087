//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by mode and status
//! - `relay_request_duration_seconds` (histogram): latency by mode
//! - `relay_upstream_calls_total` (counter): secret/broker calls by outcome
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Mode label for requests that failed before they could be classified.
pub const UNCLASSIFIED: &str = "unclassified";

pub fn record_request(mode: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "mode" => mode,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "mode" => mode)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_call(target: &'static str, outcome: &'static str) {
    metrics::counter!(
        "relay_upstream_calls_total",
        "target" => target,
        "outcome" => outcome
    )
    .increment(1);
}
