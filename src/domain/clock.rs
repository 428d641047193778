//! Time source for the pipeline's two waits: the OCR poll interval and the
//! bulk retry delay.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use async_trait::async_trait;

/// Clock abstraction injected into the aggregator and the index writer
#[async_trait]
pub trait Clock: Send + Sync + Debug {
    /// Current instant
    fn now(&self) -> Instant;

    /// Suspend the caller for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
