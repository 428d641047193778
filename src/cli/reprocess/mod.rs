//! Reprocess command - re-runs ingestion for objects already in a bucket

use std::time::Duration;

use clap::Args;
use tracing::{error, info};

use crate::domain::clock::{Clock, TokioClock};
use crate::domain::ingestion::{DocumentLocation, InvocationSummary};
use crate::domain::DomainError;
use crate::infrastructure::aws::load_sdk_config;
use crate::infrastructure::s3::{filter_by_suffix, ObjectLister, S3ObjectLister};
use crate::infrastructure::services::IngestionPipeline;

#[derive(Args, Debug)]
pub struct ReprocessArgs {
    /// Bucket to list
    #[arg(long)]
    pub bucket: String,

    /// Only keys ending with this suffix are processed
    #[arg(long, default_value = ".pdf")]
    pub suffix: String,

    /// Pause between documents, in milliseconds
    #[arg(long, default_value_t = 200)]
    pub rate_limit_ms: u64,
}

/// List the bucket and run every matching object through the pipeline
pub async fn run(args: ReprocessArgs) -> anyhow::Result<()> {
    let config = super::init()?;
    let aws_config = load_sdk_config(&config.aws).await;

    let pipeline = crate::build_pipeline(&config, &aws_config)?;
    let lister = S3ObjectLister::with_config(&aws_config);

    let summary = reprocess_bucket(
        &lister,
        &pipeline,
        &TokioClock,
        &args.bucket,
        &args.suffix,
        Duration::from_millis(args.rate_limit_ms),
    )
    .await?;

    println!(
        "Done! Processed {} documents successfully, {} failed.",
        summary.succeeded(),
        summary.failed()
    );

    Ok(())
}

/// Ingest matching keys one by one, pausing `pause` between documents
pub async fn reprocess_bucket(
    lister: &dyn ObjectLister,
    pipeline: &IngestionPipeline,
    clock: &dyn Clock,
    bucket: &str,
    suffix: &str,
    pause: Duration,
) -> Result<InvocationSummary, DomainError> {
    info!(bucket, "Fetching object list");
    let keys = filter_by_suffix(lister.list_keys(bucket).await?, suffix);
    let total = keys.len();

    info!(bucket, suffix, total, "Starting reprocessing");

    let mut summary = InvocationSummary::new();

    for (i, key) in keys.into_iter().enumerate() {
        info!("[{}/{}] Processing: {}", i + 1, total, key);

        let location = DocumentLocation::new(bucket, key);
        let outcome = pipeline.ingest(&location).await;

        if outcome.is_failure() {
            error!(key = %location.key, outcome = outcome.label(), "Reprocessing failed");
        }
        summary.record(location, outcome);

        if i + 1 < total && !pause.is_zero() {
            clock.sleep(pause).await;
        }
    }

    Ok(summary)
}
