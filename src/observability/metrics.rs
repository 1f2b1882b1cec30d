//! Metrics collection and exposition.
//!
//! # Metrics
//! - `json_guard_evaluations_total` (counter): evaluations by outcome
//!   (`skipped`, `passed`, `rejected`)
//! - `json_guard_declared_bytes` (histogram): declared length of checked requests
//! - `json_guard_config_reloads_total` (counter): reloads by result
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op, which keeps unit tests silent
//! - Labels are fixed sets; route identifiers are never used as labels

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_evaluation(outcome: &'static str) {
    metrics::counter!("json_guard_evaluations_total", "outcome" => outcome).increment(1);
}

pub fn record_declared_bytes(bytes: u64) {
    metrics::histogram!("json_guard_declared_bytes").record(bytes as f64);
}

pub fn record_config_reload(result: &'static str) {
    metrics::counter!("json_guard_config_reloads_total", "result" => result).increment(1);
}
