use async_trait::async_trait;

use super::query::{Pagination, SearchRequest};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// One matching page as returned by the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub filename: String,
    /// Highlighted fragment, empty when the index returned none
    pub snippet: String,
}

/// One page of hits plus the total hit count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHits {
    pub total: u64,
    pub hits: Vec<SearchHit>,
}

/// Hits for the requested page with their pagination block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub hits: Vec<SearchHit>,
    pub pagination: Pagination,
}

/// Full-text query seam over the search index
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchHits, DomainError>;

    /// Cheap reachability check for readiness probes
    async fn ping(&self) -> Result<(), DomainError>;
}
