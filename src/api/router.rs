use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{cors_middleware, security_headers_middleware};
use super::search;
use super::state::AppState;
use crate::config::MetricsConfig;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
pub fn create_router(
    state: AppState,
    metrics: Option<PrometheusMetrics>,
    metrics_config: &MetricsConfig,
) -> Router {
    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .route("/search", get(search::search).options(search::preflight))
        .with_state(state);

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m, &metrics_config.path));
    }

    router
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(cors_middleware))
        .layer(TraceLayer::new_for_http())
}
