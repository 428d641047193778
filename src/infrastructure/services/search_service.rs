//! Search service - validates queries and pages through the index

use std::sync::Arc;

use tracing::debug;

use crate::domain::search::{Pagination, SearchBackend, SearchPage, SearchRequest};
use crate::domain::DomainError;

/// Elasticsearch's default `index.max_result_window`
const DEFAULT_MAX_RESULT_WINDOW: u64 = 10_000;

/// Full-text search over indexed pages
#[derive(Clone)]
pub struct SearchService {
    backend: Arc<dyn SearchBackend>,
    page_size: u64,
    max_result_window: u64,
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("page_size", &self.page_size)
            .field("max_result_window", &self.max_result_window)
            .finish()
    }
}

impl SearchService {
    pub fn new(backend: Arc<dyn SearchBackend>, page_size: u64) -> Self {
        Self {
            backend,
            page_size,
            max_result_window: DEFAULT_MAX_RESULT_WINDOW,
        }
    }

    pub fn with_max_result_window(mut self, max_result_window: u64) -> Self {
        self.max_result_window = max_result_window;
        self
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Run `query` and return the 1-based `page` of hits
    pub async fn search(&self, query: &str, page: u64) -> Result<SearchPage, DomainError> {
        let request = SearchRequest::new(query.trim(), page, self.page_size)?
            .within_window(self.max_result_window)?;
        let hits = self.backend.search(&request).await?;

        debug!(
            query = request.query(),
            page,
            total = hits.total,
            returned = hits.hits.len(),
            "Search completed"
        );

        Ok(SearchPage {
            pagination: Pagination::new(&request, hits.total),
            hits: hits.hits,
        })
    }

    /// Whether the index is reachable
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.backend.ping().await
    }
}
