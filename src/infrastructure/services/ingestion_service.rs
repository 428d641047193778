//! Ingestion pipeline driver - OCR start, aggregation and indexing per document

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, instrument, warn};

use crate::domain::clock::Clock;
use crate::domain::index::{BulkBatch, IndexTransport, IndexWriter, RetryPolicy};
use crate::domain::ingestion::{
    decode_object_key, DocumentLocation, DocumentOutcome, Extraction, InvocationSummary,
    PollPolicy, ResultAggregator, S3Event,
};
use crate::domain::ocr::OcrEngine;
use crate::infrastructure::observability::{record_bulk_attempts, record_document_outcome};

/// Drives uploaded documents through OCR into the search index
#[derive(Debug, Clone)]
pub struct IngestionPipeline {
    engine: Arc<dyn OcrEngine>,
    aggregator: ResultAggregator,
    writer: IndexWriter,
    index: String,
}

impl IngestionPipeline {
    /// Create a new ingestion pipeline
    pub fn new(
        engine: Arc<dyn OcrEngine>,
        transport: Arc<dyn IndexTransport>,
        clock: Arc<dyn Clock>,
        index: impl Into<String>,
        poll_policy: PollPolicy,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            aggregator: ResultAggregator::new(engine.clone(), clock.clone(), poll_policy),
            writer: IndexWriter::new(transport, clock, retry_policy),
            engine,
            index: index.into(),
        }
    }

    /// Process every record of an S3 event in delivery order
    pub async fn ingest_event(&self, event: &S3Event) -> InvocationSummary {
        let mut summary = InvocationSummary::new();

        for record in &event.records {
            let bucket = &record.s3.bucket.name;
            let raw_key = &record.s3.object.key;

            match decode_object_key(raw_key) {
                Ok(key) => {
                    let location = DocumentLocation::new(bucket.clone(), key);
                    let outcome = self.ingest(&location).await;
                    summary.record(location, outcome);
                }
                Err(e) => {
                    error!(bucket = %bucket, key = %raw_key, error = %e, "Skipping undecodable key");
                    summary.record(
                        DocumentLocation::new(bucket.clone(), raw_key.clone()),
                        DocumentOutcome::StartFailed {
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        log_summary(&summary);
        summary
    }

    /// Process documents one after another; a failure never stops the rest
    pub async fn ingest_all(&self, locations: &[DocumentLocation]) -> InvocationSummary {
        let mut summary = InvocationSummary::new();

        for location in locations {
            let outcome = self.ingest(location).await;
            summary.record(location.clone(), outcome);
        }

        log_summary(&summary);
        summary
    }

    /// Run one document through the pipeline
    #[instrument(skip(self), fields(bucket = %location.bucket, key = %location.key))]
    pub async fn ingest(&self, location: &DocumentLocation) -> DocumentOutcome {
        let start = Instant::now();
        info!("Processing PDF: {}", location);

        let outcome = self.run(location).await;
        record_document_outcome(&outcome, start.elapsed());
        outcome
    }

    async fn run(&self, location: &DocumentLocation) -> DocumentOutcome {
        let job_id = match self.engine.start(location).await {
            Ok(job_id) => job_id,
            Err(e) => {
                error!(engine = self.engine.engine_name(), error = %e, "Could not start OCR job");
                return DocumentOutcome::StartFailed {
                    reason: e.to_string(),
                };
            }
        };

        let pages = match self.aggregator.aggregate(&job_id).await {
            Ok(Extraction::Completed(pages)) => pages,
            Ok(Extraction::JobFailed(status)) => {
                error!(job_id = %job_id, status = %status, "OCR job failed");
                return DocumentOutcome::JobFailed { status };
            }
            Err(e) => {
                error!(job_id = %job_id, error = %e, "OCR extraction aborted");
                return DocumentOutcome::ExtractionFailed {
                    reason: e.to_string(),
                };
            }
        };

        info!(job_id = %job_id, pages = pages.len(), "OCR completed");

        if pages.is_empty() {
            warn!("No text extracted from {}", location.key);
            return DocumentOutcome::NoText;
        }

        let batch = BulkBatch::from_pages(&self.index, &location.key, &pages);

        match self.writer.submit(&batch).await {
            Ok(ack) => {
                record_bulk_attempts(ack.attempts, true);

                if ack.partial {
                    warn!(
                        pages = ack.documents,
                        rejected = ack.rejected.len(),
                        "Bulk indexing for {} had errors",
                        location.key
                    );
                    DocumentOutcome::IndexedWithErrors {
                        pages: ack.documents,
                        rejected: ack.rejected,
                    }
                } else {
                    info!("Bulk indexed {} pages from {}", ack.documents, location.key);
                    DocumentOutcome::Indexed {
                        pages: ack.documents,
                    }
                }
            }
            Err(failure) => {
                record_bulk_attempts(failure.attempts, false);
                error!(
                    attempts = failure.attempts,
                    error = %failure.last_error,
                    "Bulk indexing failed for {}",
                    location.key
                );
                DocumentOutcome::IndexFailed {
                    attempts: failure.attempts,
                    reason: failure.last_error,
                }
            }
        }
    }
}

fn log_summary(summary: &InvocationSummary) {
    info!(
        attempted = summary.attempted(),
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        pages_indexed = summary.pages_indexed(),
        "Invocation finished"
    );
}
