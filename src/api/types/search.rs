//! Search endpoint request and response types

use serde::{Deserialize, Serialize};

use crate::domain::search::{Pagination, SearchHit, SearchPage};
use crate::domain::DomainError;

/// Raw query string of `GET /search`
///
/// Fields stay strings so malformed values produce our own error body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

impl SearchParams {
    /// Query text; missing or blank is a validation error
    pub fn query(&self) -> Result<&str, DomainError> {
        match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => Ok(q),
            _ => Err(DomainError::validation("Missing query parameter q")),
        }
    }

    /// 1-based page number, defaulting to 1
    pub fn page(&self) -> Result<u64, DomainError> {
        match self.page.as_deref().map(str::trim) {
            None | Some("") => Ok(1),
            Some(raw) => match raw.parse::<u64>() {
                Ok(page) if page >= 1 => Ok(page),
                _ => Err(DomainError::validation(
                    "Parameter page must be a positive integer",
                )),
            },
        }
    }
}

/// One hit as returned to the browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub filename: String,
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SearchResultItem {
    pub fn from_hit(hit: SearchHit, cdn_domain: Option<&str>) -> Self {
        let url = cdn_domain.map(|domain| document_url(domain, &hit.filename));

        Self {
            filename: hit.filename,
            snippet: hit.snippet,
            url,
        }
    }
}

/// Body of a successful search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    pub pagination: Pagination,
}

impl SearchResponse {
    pub fn from_page(page: SearchPage, cdn_domain: Option<&str>) -> Self {
        Self {
            results: page
                .hits
                .into_iter()
                .map(|hit| SearchResultItem::from_hit(hit, cdn_domain))
                .collect(),
            pagination: page.pagination,
        }
    }
}

/// Public URL of a stored document; every reserved character is escaped
pub fn document_url(cdn_domain: &str, filename: &str) -> String {
    format!("https://{}/{}", cdn_domain, urlencoding::encode(filename))
}
