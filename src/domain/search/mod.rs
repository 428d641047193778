//! Search domain - query validation, pagination and the backend seam

pub mod backend;
pub mod query;

pub use backend::{SearchBackend, SearchHit, SearchHits, SearchPage};
pub use query::{Pagination, SearchRequest};

#[cfg(test)]
pub use backend::MockSearchBackend;
