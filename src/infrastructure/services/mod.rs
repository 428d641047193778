//! Infrastructure services

mod ingestion_service;
mod search_service;

pub use ingestion_service::IngestionPipeline;
pub use search_service::SearchService;
