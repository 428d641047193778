//! PDF Search
//!
//! Ingests uploaded PDFs into a full-text index and serves searches over it:
//! - OCR jobs started per uploaded document and polled to completion
//! - Line text merged per page and bulk-indexed with retry
//! - A paginated search API with highlighted snippets

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::{DomainError, TokioClock};
use infrastructure::{ElasticsearchClient, IngestionPipeline, SearchService, TextractEngine};
use tracing::info;

/// Build the ingestion pipeline; clients are created once and shared
pub fn build_pipeline(
    config: &AppConfig,
    aws_config: &aws_config::SdkConfig,
) -> Result<IngestionPipeline, DomainError> {
    let index =
        ElasticsearchClient::new(&config.search)?.with_bulk_timeout(config.ingest.bulk_timeout());
    let engine = TextractEngine::with_config(aws_config);

    info!(
        es_host = %config.search.es_host,
        index = %config.search.index,
        "Ingestion pipeline configured"
    );

    Ok(IngestionPipeline::new(
        Arc::new(engine),
        Arc::new(index),
        Arc::new(TokioClock),
        config.search.index.clone(),
        config.ingest.poll_policy(),
        config.ingest.retry_policy(),
    ))
}

/// Build the search service over the configured index
pub fn build_search_service(config: &AppConfig) -> Result<SearchService, DomainError> {
    let client = ElasticsearchClient::new(&config.search)?;

    Ok(
        SearchService::new(Arc::new(client), config.search.page_size)
            .with_max_result_window(config.search.max_result_window),
    )
}
