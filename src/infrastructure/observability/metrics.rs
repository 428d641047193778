//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::config::MetricsConfig;
use crate::domain::DocumentOutcome;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("pdf_search_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record how one document left the pipeline
pub fn record_document_outcome(outcome: &DocumentOutcome, duration: Duration) {
    let labels = [("outcome", outcome.label())];

    counter!("pdf_ingest_documents_total", &labels).increment(1);
    histogram!("pdf_ingest_document_duration_seconds", &labels).record(duration.as_secs_f64());
    counter!("pdf_ingest_pages_indexed_total").increment(outcome.pages_indexed() as u64);
}

/// Record the attempts a bulk submission took
pub fn record_bulk_attempts(attempts: u32, success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!("pdf_index_bulk_attempts_total", "result" => result).increment(attempts as u64);
}

/// Record a search request
pub fn record_search_request(status: u16, duration: Duration) {
    let labels = [("status", status.to_string())];

    counter!("pdf_search_requests_total", &labels).increment(1);
    histogram!("pdf_search_request_duration_seconds", &labels).record(duration.as_secs_f64());
}
