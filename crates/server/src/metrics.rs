//! Prometheus metrics

use axum::http::StatusCode;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global Prometheus recorder. Safe to call more than once;
/// later calls are no-ops (tests construct the app repeatedly).
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    if HANDLE.get().is_none() {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                let _ = HANDLE.set(handle);
            }
            Err(e) => {
                tracing::warn!(error = %e, "metrics recorder already installed");
            }
        }
    }
    HANDLE.get()
}

pub fn record_chat_turn() {
    metrics::counter!("vox_chat_turns_total").increment(1);
}

pub fn record_llm_latency(millis: u64) {
    metrics::histogram!("vox_llm_latency_ms").record(millis as f64);
}

pub fn record_request(endpoint: &'static str) {
    metrics::counter!("vox_requests_total", "endpoint" => endpoint).increment(1);
}

/// GET /metrics
pub async fn metrics_handler() -> Result<String, StatusCode> {
    match HANDLE.get() {
        Some(handle) => Ok(handle.render()),
        None => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}
