//! Search request and pagination

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Validated full-text query for one result page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    page: u64,
    page_size: u64,
}

impl SearchRequest {
    /// Build a request; the query must be non-blank and `page` 1-based
    pub fn new(
        query: impl Into<String>,
        page: u64,
        page_size: u64,
    ) -> Result<Self, DomainError> {
        let query = query.into();

        if query.trim().is_empty() {
            return Err(DomainError::validation("Missing query parameter q"));
        }

        if page == 0 {
            return Err(DomainError::validation("Parameter page must be >= 1"));
        }

        if page_size == 0 {
            return Err(DomainError::configuration("Page size must be >= 1"));
        }

        Ok(Self {
            query,
            page,
            page_size,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Offset of the first hit on this page
    pub fn from(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Reject pages whose last hit lies past `max_result_window`
    pub fn within_window(self, max_result_window: u64) -> Result<Self, DomainError> {
        let end = (self.page - 1)
            .checked_mul(self.page_size)
            .and_then(|from| from.checked_add(self.page_size));

        match end {
            Some(end) if end <= max_result_window => Ok(self),
            _ => Err(DomainError::validation(format!(
                "Parameter page exceeds the result window of {}",
                max_result_window
            ))),
        }
    }
}

/// Pagination block returned with search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u64,
    pub page_size: u64,
    pub total_results: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(request: &SearchRequest, total_results: u64) -> Self {
        let total_pages = total_results.div_ceil(request.page_size);

        Self {
            current_page: request.page,
            page_size: request.page_size,
            total_results,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}
