//! Application state for shared services

use crate::infrastructure::services::SearchService;

/// Application state shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub search_service: SearchService,
    /// Public domain serving the stored PDFs
    pub cdn_domain: Option<String>,
}

impl AppState {
    pub fn new(search_service: SearchService, cdn_domain: Option<String>) -> Self {
        Self {
            search_service,
            cdn_domain,
        }
    }
}
