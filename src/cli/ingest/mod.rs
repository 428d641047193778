//! Ingest command - runs the pipeline for an upload event or a single object

use std::io::Read;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::domain::ingestion::{DocumentLocation, InvocationSummary, S3Event};
use crate::infrastructure::aws::load_sdk_config;

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// S3 event notification JSON file, `-` reads stdin
    #[arg(long, conflicts_with_all = ["bucket", "key"], required_unless_present = "bucket")]
    pub event: Option<String>,

    /// Bucket of a single object to ingest
    #[arg(long, requires = "key")]
    pub bucket: Option<String>,

    /// Key of a single object to ingest (already decoded)
    #[arg(long, requires = "bucket")]
    pub key: Option<String>,
}

/// Run the ingestion pipeline and print the invocation summary
pub async fn run(args: IngestArgs) -> anyhow::Result<()> {
    let config = super::init()?;
    let aws_config = load_sdk_config(&config.aws).await;
    let pipeline = crate::build_pipeline(&config, &aws_config)?;

    let summary: InvocationSummary = match (&args.event, &args.bucket, &args.key) {
        (Some(source), _, _) => {
            let event = read_event(source)?;
            info!(records = event.records.len(), "Ingesting event");
            pipeline.ingest_event(&event).await
        }
        (None, Some(bucket), Some(key)) => {
            pipeline
                .ingest_all(&[DocumentLocation::new(bucket.clone(), key.clone())])
                .await
        }
        _ => anyhow::bail!("Either --event or both --bucket and --key are required"),
    };

    println!("{}", serde_json::to_string_pretty(&summary.to_response())?);

    Ok(())
}

fn read_event(source: &str) -> anyhow::Result<S3Event> {
    let raw = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read event from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read event file {}", source))?
    };

    parse_event(&raw)
}

fn parse_event(raw: &str) -> anyhow::Result<S3Event> {
    serde_json::from_str(raw).context("Invalid S3 event JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    #[test]
    fn test_parse_event() {
        let event = parse_event(
            r#"{"Records":[{"eventName":"ObjectCreated:Put",
                "s3":{"bucket":{"name":"uploads"},"object":{"key":"a+b.pdf","size":10}}}]}"#,
        )
        .unwrap();

        assert_eq!(event.records.len(), 1);
        assert_eq!(event.records[0].s3.object.key, "a+b.pdf");
    }

    #[test]
    fn test_parse_event_rejects_garbage() {
        assert!(parse_event("{not json").is_err());
    }

    #[test]
    fn test_args_single_object() {
        let cli = Cli::try_parse_from([
            "pdf-search", "ingest", "--bucket", "uploads", "--key", "a.pdf",
        ])
        .unwrap();

        match cli.command {
            Command::Ingest(args) => {
                assert_eq!(args.bucket.as_deref(), Some("uploads"));
                assert_eq!(args.key.as_deref(), Some("a.pdf"));
                assert!(args.event.is_none());
            }
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn test_args_conflicts() {
        assert!(Cli::try_parse_from(["pdf-search", "ingest"]).is_err());
        assert!(Cli::try_parse_from(["pdf-search", "ingest", "--bucket", "uploads"]).is_err());
        assert!(Cli::try_parse_from([
            "pdf-search", "ingest", "--event", "-", "--bucket", "b", "--key", "k",
        ])
        .is_err());
    }
}
