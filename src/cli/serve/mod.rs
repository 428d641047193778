//! Serve command - runs the search API

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::AppConfig;
use crate::infrastructure::observability::init_metrics;

/// Run the search API server
pub async fn run() -> anyhow::Result<()> {
    let config = super::init()?;

    let search_service = crate::build_search_service(&config)?;
    let cdn_domain = config.search.cdn_domain().map(str::to_string);

    if cdn_domain.is_none() {
        warn!("No CDN domain configured; search results will not carry URLs");
    }

    let state = AppState::new(search_service, cdn_domain);
    let metrics = init_metrics(&config.observability.metrics);
    let app = create_router(state, metrics, &config.observability.metrics);

    let addr = build_socket_addr(&config)?;
    info!("Starting search API on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Search API shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}
