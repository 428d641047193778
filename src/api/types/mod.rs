//! HTTP request and response types

pub mod error;
pub mod search;

pub use error::{ApiError, ApiErrorResponse};
pub use search::{document_url, SearchParams, SearchResponse, SearchResultItem};
