//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): endpoint requests by outcome
//! - `proxy_upstream_duration_seconds` (histogram): forward latency by status
//! - `fallback_requests_total` (counter): fallback client results by path
//!
//! Recording is a no-op until [`init_metrics`] installs the recorder.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics recorder"),
    }
}

/// Count one proxy endpoint request.
pub fn record_request(outcome: &'static str) {
    counter!("proxy_requests_total", "outcome" => outcome).increment(1);
}

/// Record one forwarded upstream call.
pub fn record_upstream(status: u16, start: Instant) {
    histogram!("proxy_upstream_duration_seconds", "status" => status.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Count one fallback client call by the path that produced its result.
pub fn record_fallback(path: &'static str) {
    counter!("fallback_requests_total", "path" => path).increment(1);
}
