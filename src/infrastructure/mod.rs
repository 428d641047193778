//! Infrastructure layer - External service implementations

pub mod aws;
pub mod elasticsearch;
pub mod logging;
pub mod observability;
pub mod s3;
pub mod services;
pub mod textract;

pub use elasticsearch::ElasticsearchClient;
pub use s3::{ObjectLister, S3ObjectLister};
pub use services::{IngestionPipeline, SearchService};
pub use textract::TextractEngine;
