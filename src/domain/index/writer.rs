//! Index writer - submits a bulk batch with bounded retry

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use super::bulk::BulkBatch;
use super::response::{BulkResponse, RejectedItem};
use crate::domain::clock::Clock;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Transport for the search index bulk endpoint
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IndexTransport: Send + Sync {
    /// Send one NDJSON bulk body. Errors are transport failures or
    /// non-success status codes.
    async fn bulk(&self, body: String) -> Result<BulkResponse, DomainError>;
}

/// Retry behaviour for bulk submission
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub delay: Duration,
    /// Growth factor per failed attempt (1.0 keeps the delay fixed)
    pub backoff_multiplier: f64,
    /// Upper bound for any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
            backoff_multiplier: 1.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            ..Default::default()
        }
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Delay after failed attempt `attempt` (1-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let factor = self.backoff_multiplier.max(1.0).powi(exponent);
        let delay = self.delay.as_secs_f64() * factor;

        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }
}

/// Acknowledgement of a submitted batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexAck {
    pub documents: usize,
    pub attempts: u32,
    /// Documents refused by the index although the call succeeded
    pub rejected: Vec<RejectedItem>,
    /// The index reported `errors: true`
    pub partial: bool,
}

impl IndexAck {
    fn empty() -> Self {
        Self {
            documents: 0,
            attempts: 0,
            rejected: Vec::new(),
            partial: false,
        }
    }
}

/// Bulk submission gave up
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Bulk indexing failed after {attempts} attempts: {last_error}")]
pub struct IndexFailure {
    pub attempts: u32,
    pub last_error: String,
}

/// Writes bulk batches through an [`IndexTransport`]
#[derive(Clone)]
pub struct IndexWriter {
    transport: Arc<dyn IndexTransport>,
    clock: Arc<dyn Clock>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for IndexWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexWriter")
            .field("policy", &self.policy)
            .finish()
    }
}

impl IndexWriter {
    pub fn new(
        transport: Arc<dyn IndexTransport>,
        clock: Arc<dyn Clock>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            clock,
            policy,
        }
    }

    /// Submit `batch`. Empty batches are never sent.
    pub async fn submit(&self, batch: &BulkBatch) -> Result<IndexAck, IndexFailure> {
        if batch.is_empty() {
            return Ok(IndexAck::empty());
        }

        let body = batch.to_ndjson().map_err(|e| IndexFailure {
            attempts: 0,
            last_error: e.to_string(),
        })?;

        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            match self.transport.bulk(body.clone()).await {
                Ok(response) => {
                    let rejected = response.rejected();

                    if response.errors {
                        warn!(
                            index = batch.index(),
                            documents = batch.len(),
                            rejected = rejected.len(),
                            attempt,
                            "Bulk indexing completed with item errors"
                        );
                    } else {
                        info!(
                            index = batch.index(),
                            documents = batch.len(),
                            attempt,
                            "Bulk indexed batch"
                        );
                    }

                    return Ok(IndexAck {
                        documents: batch.len(),
                        attempts: attempt,
                        rejected,
                        partial: response.errors,
                    });
                }
                Err(e) => {
                    warn!(
                        index = batch.index(),
                        attempt,
                        max_attempts,
                        error = %e,
                        "Bulk request failed"
                    );
                    last_error = e.to_string();
                }
            }

            if attempt < max_attempts {
                self.clock.sleep(self.policy.delay_for_attempt(attempt)).await;
            }
        }

        Err(IndexFailure {
            attempts: max_attempts,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::mock::ManualClock;
    use crate::domain::index::IndexDocument;
    use mockall::Sequence;

    fn batch(pages: u32) -> BulkBatch {
        BulkBatch::new(
            "pdfs",
            (1..=pages)
                .map(|n| IndexDocument::new("doc.pdf", n, format!("page {}", n)))
                .collect(),
        )
    }

    fn writer(transport: MockIndexTransport, clock: Arc<ManualClock>) -> IndexWriter {
        IndexWriter::new(Arc::new(transport), clock, RetryPolicy::default())
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let mut transport = MockIndexTransport::new();
        transport
            .expect_bulk()
            .times(1)
            .withf(|body| body.ends_with('\n') && body.lines().count() == 4)
            .returning(|_| Ok(BulkResponse::default()));
        let clock = Arc::new(ManualClock::new());

        let ack = writer(transport, clock.clone()).submit(&batch(2)).await.unwrap();

        assert_eq!(ack.documents, 2);
        assert_eq!(ack.attempts, 1);
        assert!(!ack.partial);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_retries_until_third_attempt_succeeds() {
        let mut transport = MockIndexTransport::new();
        let mut seq = Sequence::new();
        transport
            .expect_bulk()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(DomainError::index("connection refused")));
        transport
            .expect_bulk()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(BulkResponse::default()));
        let clock = Arc::new(ManualClock::new());

        let ack = writer(transport, clock.clone()).submit(&batch(1)).await.unwrap();

        assert_eq!(ack.attempts, 3);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(2); 2]);
    }

    #[tokio::test]
    async fn test_exhausted_retries_fail() {
        let mut transport = MockIndexTransport::new();
        transport
            .expect_bulk()
            .times(3)
            .returning(|_| Err(DomainError::index("HTTP 503 Service Unavailable")));
        let clock = Arc::new(ManualClock::new());

        let failure = writer(transport, clock.clone())
            .submit(&batch(1))
            .await
            .unwrap_err();

        assert_eq!(failure.attempts, 3);
        assert!(failure.last_error.contains("503"));
        assert_eq!(clock.sleeps().len(), 2);
    }

    #[tokio::test]
    async fn test_partial_errors_are_not_retried() {
        let mut transport = MockIndexTransport::new();
        transport.expect_bulk().times(1).returning(|_| {
            Ok(serde_json::from_value::<BulkResponse>(serde_json::json!({
                "errors": true,
                "items": [
                    {"index": {"_id": "doc.pdf__1", "status": 201}},
                    {"index": {"_id": "doc.pdf__2", "status": 400,
                        "error": {"type": "illegal_argument_exception", "reason": "bad"}}}
                ]
            }))
            .unwrap())
        });

        let ack = writer(transport, Arc::new(ManualClock::new()))
            .submit(&batch(2))
            .await
            .unwrap();

        assert!(ack.partial);
        assert_eq!(ack.attempts, 1);
        assert_eq!(ack.rejected.len(), 1);
        assert_eq!(ack.rejected[0].id, "doc.pdf__2");
    }

    #[tokio::test]
    async fn test_empty_batch_is_not_sent() {
        let mut transport = MockIndexTransport::new();
        transport.expect_bulk().never();

        let ack = writer(transport, Arc::new(ManualClock::new()))
            .submit(&batch(0))
            .await
            .unwrap();

        assert_eq!(ack.documents, 0);
        assert_eq!(ack.attempts, 0);
    }

    #[test]
    fn test_fixed_delay_by_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_secs(2));
    }

    #[test]
    fn test_growing_delay_is_capped() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1))
            .with_backoff_multiplier(2.0)
            .with_max_delay(Duration::from_secs(5));

        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_secs(5));
    }
}
