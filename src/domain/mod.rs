//! Domain layer - Core pipeline logic and entities

pub mod clock;
pub mod error;
pub mod index;
pub mod ingestion;
pub mod ocr;
pub mod search;

pub use clock::{Clock, TokioClock};
pub use error::DomainError;
pub use index::{
    BulkBatch, BulkResponse, IndexAck, IndexDocument, IndexFailure, IndexTransport, IndexWriter,
    RejectedItem, RetryPolicy,
};
pub use ingestion::{
    DocumentLocation, DocumentOutcome, DocumentReport, Extraction, InvocationSummary, PageText,
    PollPolicy, ResultAggregator, S3Event,
};
pub use ocr::{BlockType, JobId, JobResultPage, JobStatus, OcrEngine, RecognitionBlock};
pub use search::{Pagination, SearchBackend, SearchHit, SearchHits, SearchPage, SearchRequest};
