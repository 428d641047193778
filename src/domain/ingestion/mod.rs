//! Document ingestion domain
//!
//! This module provides:
//! - `DocumentLocation` and S3 event decoding for trigger notifications
//! - `PageAccumulator` for merging recognition blocks into page text
//! - `ResultAggregator`, the poll-until-terminal state machine
//! - `DocumentOutcome` / `InvocationSummary` reported by the pipeline driver

pub mod aggregator;
pub mod notification;
pub mod outcome;
pub mod pages;

pub use aggregator::{Extraction, PollPolicy, ResultAggregator};
pub use notification::{decode_object_key, DocumentLocation, S3Event};
pub use outcome::{DocumentOutcome, DocumentReport, InvocationSummary};
pub use pages::{PageAccumulator, PageText};
