//! Result aggregator - drives an OCR job to a terminal state and collects
//! its text page by page

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::pages::{PageAccumulator, PageText};
use crate::domain::clock::Clock;
use crate::domain::ocr::{JobId, JobResultPage, JobStatus, OcrEngine};
use crate::domain::DomainError;

/// How often and how long to poll a running job
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Wait between polls while the job is running
    pub interval: Duration,
    /// Give up after this many polls (unbounded when `None`)
    pub max_polls: Option<u32>,
    /// Give up once this much time has passed (unbounded when `None`)
    pub max_wait: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_polls: None,
            max_wait: None,
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = Some(max_polls);
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    fn limit_reached(&self, polls: u32, waited: Duration) -> bool {
        self.max_polls.is_some_and(|max| polls >= max)
            || self.max_wait.is_some_and(|max| waited >= max)
    }
}

/// Terminal result of an extraction job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Job succeeded; pages in ascending order, possibly empty
    Completed(Vec<PageText>),
    /// Engine gave up on the job
    JobFailed(JobStatus),
}

/// Polls a job until it is terminal and reduces its output to page text
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    engine: Arc<dyn OcrEngine>,
    clock: Arc<dyn Clock>,
    policy: PollPolicy,
}

impl ResultAggregator {
    pub fn new(engine: Arc<dyn OcrEngine>, clock: Arc<dyn Clock>, policy: PollPolicy) -> Self {
        Self {
            engine,
            clock,
            policy,
        }
    }

    /// Wait for `job_id` to finish and collect every result page
    pub async fn aggregate(&self, job_id: &JobId) -> Result<Extraction, DomainError> {
        let started = self.clock.now();
        let mut polls: u32 = 0;

        loop {
            let response = self.engine.poll(job_id, None).await?;
            polls += 1;

            if response.status.is_terminal() {
                return match response.status {
                    JobStatus::Succeeded => {
                        let pages = self.collect(job_id, response).await?;
                        info!(job_id = %job_id, polls, pages = pages.len(), "OCR job completed");
                        Ok(Extraction::Completed(pages))
                    }
                    status => {
                        warn!(job_id = %job_id, status = %status, "OCR job ended without usable output");
                        Ok(Extraction::JobFailed(status))
                    }
                };
            }

            let waited = self.clock.now().saturating_duration_since(started);

            if self.policy.limit_reached(polls, waited) {
                return Err(DomainError::poll_limit(job_id.as_str(), polls, waited));
            }

            debug!(job_id = %job_id, polls, "OCR job still running");
            self.clock.sleep(self.policy.interval).await;
        }
    }

    /// Drain the continuation chain starting at `first`
    async fn collect(
        &self,
        job_id: &JobId,
        first: JobResultPage,
    ) -> Result<Vec<PageText>, DomainError> {
        let mut accumulator = PageAccumulator::new();
        accumulator.extend(&first.blocks);

        let mut next_token = continuation(first.next_token);
        let mut result_pages = 1;

        while let Some(token) = next_token {
            let response = self.engine.poll(job_id, Some(&token)).await?;
            accumulator.extend(&response.blocks);
            next_token = continuation(response.next_token);
            result_pages += 1;
        }

        debug!(
            job_id = %job_id,
            result_pages,
            pages = accumulator.page_count(),
            "Collected OCR result pages"
        );

        Ok(accumulator.into_pages())
    }
}

fn continuation(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::mock::ManualClock;
    use crate::domain::ocr::{RecognitionBlock, ScriptedOcrEngine};

    fn aggregator(
        engine: Arc<ScriptedOcrEngine>,
        clock: Arc<ManualClock>,
        policy: PollPolicy,
    ) -> ResultAggregator {
        ResultAggregator::new(engine, clock, policy)
    }

    fn texts(extraction: Extraction) -> Vec<(u32, String)> {
        match extraction {
            Extraction::Completed(pages) => pages.into_iter().map(|p| (p.number, p.text)).collect(),
            other => panic!("expected completed extraction, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_polls_until_succeeded_and_drains_pagination() {
        let engine = Arc::new(
            ScriptedOcrEngine::new()
                .with_response("job-1", JobResultPage::running())
                .with_response("job-1", JobResultPage::running())
                .with_response(
                    "job-1",
                    JobResultPage::succeeded(vec![
                        RecognitionBlock::line(1, "Title"),
                        RecognitionBlock::line(2, "Body"),
                    ])
                    .with_next_token("t1"),
                )
                .with_response(
                    "job-1",
                    JobResultPage::succeeded(vec![RecognitionBlock::line(3, "Appendix")])
                        .with_next_token("t2"),
                )
                .with_response(
                    "job-1",
                    JobResultPage::succeeded(vec![RecognitionBlock::line(3, "continued")]),
                ),
        );
        let clock = Arc::new(ManualClock::new());
        let agg = aggregator(engine.clone(), clock.clone(), PollPolicy::default());

        let result = agg.aggregate(&JobId::new("job-1")).await.unwrap();

        assert_eq!(
            texts(result),
            vec![
                (1, "Title".to_string()),
                (2, "Body".to_string()),
                (3, "Appendix continued".to_string()),
            ]
        );
        assert_eq!(
            engine.tokens_seen("job-1"),
            vec![
                None,
                None,
                None,
                Some("t1".to_string()),
                Some("t2".to_string())
            ]
        );
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(5); 2]);
    }

    #[tokio::test]
    async fn test_aggregation_is_pagination_transparent() {
        let blocks = vec![
            RecognitionBlock::line(2, "b1"),
            RecognitionBlock::line(1, "a1"),
            RecognitionBlock::line(3, "c1"),
            RecognitionBlock::line(3, "c2"),
            RecognitionBlock::line(1, "a2"),
            RecognitionBlock::line(3, "c3"),
        ];

        let single = Arc::new(
            ScriptedOcrEngine::new()
                .with_response("whole", JobResultPage::succeeded(blocks.clone())),
        );
        let split = Arc::new(
            ScriptedOcrEngine::new()
                .with_response(
                    "split",
                    JobResultPage::succeeded(blocks[..3].to_vec()).with_next_token("n1"),
                )
                .with_response(
                    "split",
                    JobResultPage::succeeded(blocks[3..4].to_vec()).with_next_token("n2"),
                )
                .with_response("split", JobResultPage::succeeded(blocks[4..].to_vec())),
        );

        let clock = Arc::new(ManualClock::new());
        let whole = aggregator(single, clock.clone(), PollPolicy::default())
            .aggregate(&JobId::new("whole"))
            .await
            .unwrap();
        let pieces = aggregator(split, clock, PollPolicy::default())
            .aggregate(&JobId::new("split"))
            .await
            .unwrap();

        assert_eq!(whole, pieces);
        assert_eq!(
            texts(pieces),
            vec![
                (1, "a1 a2".to_string()),
                (2, "b1".to_string()),
                (3, "c1 c2 c3".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_job_yields_no_pages() {
        let engine = Arc::new(
            ScriptedOcrEngine::new()
                .with_response("job-f", JobResultPage::running())
                .with_response("job-f", JobResultPage::with_status(JobStatus::Failed)),
        );
        let clock = Arc::new(ManualClock::new());
        let agg = aggregator(engine.clone(), clock, PollPolicy::default());

        let result = agg.aggregate(&JobId::new("job-f")).await.unwrap();

        assert_eq!(result, Extraction::JobFailed(JobStatus::Failed));
        assert_eq!(engine.poll_count("job-f"), 2);
    }

    #[tokio::test]
    async fn test_partial_success_is_terminal_failure() {
        let engine = Arc::new(ScriptedOcrEngine::new().with_response(
            "job-p",
            JobResultPage::with_status(JobStatus::PartialSuccess)
                .with_next_token("ignored"),
        ));
        let agg = aggregator(
            engine.clone(),
            Arc::new(ManualClock::new()),
            PollPolicy::default(),
        );

        let result = agg.aggregate(&JobId::new("job-p")).await.unwrap();

        assert_eq!(result, Extraction::JobFailed(JobStatus::PartialSuccess));
        assert_eq!(engine.poll_count("job-p"), 1);
    }

    #[tokio::test]
    async fn test_running_job_is_polled_at_interval_without_cap() {
        let mut engine = ScriptedOcrEngine::new();
        for _ in 0..50 {
            engine = engine.with_response("slow", JobResultPage::running());
        }
        let engine = Arc::new(engine.with_response(
            "slow",
            JobResultPage::succeeded(vec![RecognitionBlock::line(1, "done")]),
        ));
        let clock = Arc::new(ManualClock::new());
        let agg = aggregator(engine.clone(), clock.clone(), PollPolicy::default());

        let result = agg.aggregate(&JobId::new("slow")).await.unwrap();

        assert_eq!(texts(result), vec![(1, "done".to_string())]);
        assert_eq!(engine.poll_count("slow"), 51);
        assert_eq!(clock.elapsed(), Duration::from_secs(5 * 50));
    }

    #[tokio::test]
    async fn test_endless_job_hits_poll_cap() {
        let engine = Arc::new(ScriptedOcrEngine::new().with_endless_job("stuck"));
        let clock = Arc::new(ManualClock::new());
        let policy = PollPolicy::new(Duration::from_secs(5)).with_max_polls(4);
        let agg = aggregator(engine.clone(), clock.clone(), policy);

        let err = agg.aggregate(&JobId::new("stuck")).await.unwrap_err();

        assert!(matches!(
            err,
            DomainError::PollLimitExceeded { polls: 4, .. }
        ));
        assert_eq!(engine.poll_count("stuck"), 4);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(5); 3]);
    }

    #[tokio::test]
    async fn test_endless_job_hits_wait_cap() {
        let engine = Arc::new(ScriptedOcrEngine::new().with_endless_job("stuck"));
        let clock = Arc::new(ManualClock::new());
        let policy =
            PollPolicy::new(Duration::from_secs(5)).with_max_wait(Duration::from_secs(12));
        let agg = aggregator(engine.clone(), clock.clone(), policy);

        let err = agg.aggregate(&JobId::new("stuck")).await.unwrap_err();

        assert!(matches!(err, DomainError::PollLimitExceeded { polls: 4, .. }));
        assert_eq!(engine.poll_count("stuck"), 4);
        assert_eq!(clock.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_poll_error_during_pagination_is_reported() {
        let engine = Arc::new(
            ScriptedOcrEngine::new()
                .with_response(
                    "job-e",
                    JobResultPage::succeeded(vec![RecognitionBlock::line(1, "x")])
                        .with_next_token("t1"),
                )
                .with_poll_error("job-e", "ThrottlingException"),
        );
        let agg = aggregator(engine, Arc::new(ManualClock::new()), PollPolicy::default());

        let err = agg.aggregate(&JobId::new("job-e")).await.unwrap_err();

        assert!(matches!(err, DomainError::Ocr { .. }));
    }

    #[tokio::test]
    async fn test_succeeded_without_lines_is_empty() {
        let engine = Arc::new(ScriptedOcrEngine::new().with_response(
            "blank",
            JobResultPage::succeeded(vec![RecognitionBlock::word(1, "stray")]),
        ));
        let agg = aggregator(engine, Arc::new(ManualClock::new()), PollPolicy::default());

        let result = agg.aggregate(&JobId::new("blank")).await.unwrap();

        assert_eq!(result, Extraction::Completed(Vec::new()));
    }
}
