//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_bulk_attempts, record_document_outcome,
    record_search_request, PrometheusMetrics,
};
