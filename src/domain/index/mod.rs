//! Search index domain - bulk batches and the index writer

pub mod bulk;
pub mod response;
pub mod writer;

pub use bulk::{BulkBatch, IndexDocument};
pub use response::{BulkItemResult, BulkResponse, RejectedItem};
pub use writer::{IndexAck, IndexFailure, IndexTransport, IndexWriter, RetryPolicy};

#[cfg(test)]
pub use writer::MockIndexTransport;
