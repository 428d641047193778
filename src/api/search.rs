//! `GET /search` - full-text search over indexed pages

use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use super::state::AppState;
use super::types::{ApiError, SearchParams, SearchResponse};
use crate::infrastructure::observability::record_search_request;

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let start = Instant::now();

    let response = match run_search(&state, &params).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => {
            if err.status.is_server_error() {
                error!(error = %err, "Search failed");
            } else {
                warn!(error = %err, "Rejected search request");
            }
            err.into_response()
        }
    };

    record_search_request(response.status().as_u16(), start.elapsed());
    response
}

/// CORS preflight; headers come from the CORS middleware
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn run_search(state: &AppState, params: &SearchParams) -> Result<SearchResponse, ApiError> {
    let query = params.query()?;
    let page = params.page()?;

    let results = state.search_service.search(query, page).await?;

    Ok(SearchResponse::from_page(
        results,
        state.cdn_domain.as_deref(),
    ))
}
