use std::fmt::Debug;

use async_trait::async_trait;

use super::job::{JobId, JobResultPage};
use crate::domain::ingestion::DocumentLocation;
use crate::domain::DomainError;

/// Asynchronous text-detection service (Textract and friends)
#[async_trait]
pub trait OcrEngine: Send + Sync + Debug {
    /// Start a text-detection job for the document at `location`
    async fn start(&self, location: &DocumentLocation) -> Result<JobId, DomainError>;

    /// Fetch the job status and one page of results.
    ///
    /// `next_token` continues a previous result page of a finished job.
    async fn poll(
        &self,
        job_id: &JobId,
        next_token: Option<&str>,
    ) -> Result<JobResultPage, DomainError>;

    /// Engine name used in logs and errors
    fn engine_name(&self) -> &'static str;
}
