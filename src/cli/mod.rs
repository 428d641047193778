//! CLI module for PDF Search
//!
//! Provides subcommands for serving searches and ingesting documents:
//! - `serve`: the search API
//! - `ingest`: run the ingestion pipeline for an upload event or one object
//! - `reprocess`: run the pipeline over every PDF already in a bucket

pub mod ingest;
pub mod reprocess;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// PDF Search - OCR ingestion and full-text search for uploaded PDFs
#[derive(Parser)]
#[command(name = "pdf-search")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the search API server
    Serve,

    /// Ingest documents from an upload event or a single object
    Ingest(ingest::IngestArgs),

    /// Re-ingest every matching object in a bucket
    Reprocess(reprocess::ReprocessArgs),
}

/// Load `.env`, configuration and logging shared by every subcommand
pub(crate) fn init() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);
    config.validate()?;

    Ok(config)
}
