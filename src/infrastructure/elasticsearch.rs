//! Elasticsearch HTTP adapter: `_bulk` writes and `_search` queries

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::SearchConfig;
use crate::domain::index::{BulkResponse, IndexTransport};
use crate::domain::search::{SearchBackend, SearchHit, SearchHits, SearchRequest};
use crate::domain::DomainError;

/// Highlight fragment length in characters
pub const SNIPPET_FRAGMENT_SIZE: u32 = 150;

const UNKNOWN_FILENAME: &str = "unknown.pdf";

const DEFAULT_BULK_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for one Elasticsearch index
#[derive(Debug, Clone)]
pub struct ElasticsearchClient {
    client: Client,
    base_url: String,
    index: String,
    bulk_timeout: Duration,
    search_timeout: Duration,
}

impl ElasticsearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.es_host.trim_end_matches('/').to_string(),
            index: config.index.clone(),
            bulk_timeout: DEFAULT_BULK_TIMEOUT,
            search_timeout: config.timeout(),
        })
    }

    /// Per-request timeout for `_bulk` writes
    pub fn with_bulk_timeout(mut self, timeout: Duration) -> Self {
        self.bulk_timeout = timeout;
        self
    }

    fn bulk_url(&self) -> String {
        format!("{}/_bulk", self.base_url)
    }

    fn search_url(&self) -> String {
        format!("{}/{}/_search", self.base_url, self.index)
    }
}

/// Request body for one page of a full-text query
pub fn build_search_body(request: &SearchRequest) -> Value {
    json!({
        "query": {
            "multi_match": {
                "query": request.query(),
                "fields": ["content"]
            }
        },
        "highlight": {
            "fields": {
                "content": {
                    "fragment_size": SNIPPET_FRAGMENT_SIZE,
                    "number_of_fragments": 1
                }
            }
        },
        "_source": ["filename"],
        "from": request.from(),
        "size": request.page_size(),
        "track_total_hits": true
    })
}

#[derive(Debug, Deserialize)]
struct EsSearchResponse {
    #[serde(default)]
    hits: EsHits,
}

#[derive(Debug, Default, Deserialize)]
struct EsHits {
    #[serde(default)]
    total: Option<EsTotal>,
    #[serde(default)]
    hits: Vec<EsHit>,
}

/// `hits.total` is an object on 7.x+ and a bare number before that
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EsTotal {
    Count(u64),
    Object { value: u64 },
}

#[derive(Debug, Deserialize)]
struct EsHit {
    #[serde(rename = "_source", default)]
    source: Option<Value>,
    #[serde(default)]
    highlight: Option<HashMap<String, Vec<String>>>,
}

impl From<EsSearchResponse> for SearchHits {
    fn from(response: EsSearchResponse) -> Self {
        let total = match response.hits.total {
            Some(EsTotal::Count(n)) | Some(EsTotal::Object { value: n }) => n,
            None => response.hits.hits.len() as u64,
        };

        let hits = response
            .hits
            .hits
            .into_iter()
            .map(|hit| SearchHit {
                filename: hit
                    .source
                    .as_ref()
                    .and_then(|s| s.get("filename"))
                    .and_then(Value::as_str)
                    .unwrap_or(UNKNOWN_FILENAME)
                    .to_string(),
                snippet: hit
                    .highlight
                    .and_then(|mut h| h.remove("content"))
                    .and_then(|fragments| fragments.into_iter().next())
                    .unwrap_or_default(),
            })
            .collect();

        Self { total, hits }
    }
}

async fn error_body(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("HTTP {}: {}", status, body.chars().take(1000).collect::<String>())
}

#[async_trait]
impl IndexTransport for ElasticsearchClient {
    async fn bulk(&self, body: String) -> Result<BulkResponse, DomainError> {
        let response = self
            .client
            .post(self.bulk_url())
            .timeout(self.bulk_timeout)
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "Request timed out".to_string()
                } else if e.is_connect() {
                    format!("Connection failed: {}", e)
                } else {
                    format!("Request failed: {}", e)
                };
                DomainError::index(message)
            })?;

        if !response.status().is_success() {
            return Err(DomainError::index(error_body(response).await));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::index(format!("Failed to parse bulk response: {}", e)))
    }
}

#[async_trait]
impl SearchBackend for ElasticsearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchHits, DomainError> {
        let response = self
            .client
            .post(self.search_url())
            .timeout(self.search_timeout)
            .json(&build_search_body(request))
            .send()
            .await
            .map_err(|e| DomainError::search(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DomainError::search(error_body(response).await));
        }

        let parsed: EsSearchResponse = response
            .json()
            .await
            .map_err(|e| DomainError::search(format!("Failed to parse search response: {}", e)))?;

        Ok(parsed.into())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let response = self
            .client
            .get(&self.base_url)
            .timeout(self.search_timeout)
            .send()
            .await
            .map_err(|e| DomainError::search(format!("Search host unreachable: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(DomainError::search(error_body(response).await))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ElasticsearchClient {
        let config = SearchConfig {
            es_host: format!("{}/", server.uri()),
            ..Default::default()
        };
        ElasticsearchClient::new(&config)
            .unwrap()
            .with_bulk_timeout(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_bulk_posts_ndjson() {
        let server = MockServer::start().await;
        let body = "{\"index\":{\"_index\":\"pdfs\",\"_id\":\"a.pdf__1\"}}\n{\"filename\":\"a.pdf\",\"page\":1,\"content\":\"x\"}\n";

        Mock::given(method("POST"))
            .and(path("/_bulk"))
            .and(header("content-type", "application/x-ndjson"))
            .and(body_string(body))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "took": 2,
                "errors": false,
                "items": [{"index": {"_id": "a.pdf__1", "status": 201}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).bulk(body.to_string()).await.unwrap();

        assert!(!response.errors);
        assert_eq!(response.items.len(), 1);
    }

    #[tokio::test]
    async fn test_bulk_non_success_status_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/_bulk"))
            .respond_with(ResponseTemplate::new(503).set_body_string("cluster unavailable"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .bulk("{}\n".to_string())
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("503"));
        assert!(message.contains("cluster unavailable"));
    }

    #[tokio::test]
    async fn test_bulk_uses_its_own_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/_bulk"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"errors": false, "items": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .with_bulk_timeout(Duration::from_millis(100))
            .bulk("{}\n".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Index { .. }));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_search_builds_paged_highlight_query() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pdfs/_search"))
            .and(body_partial_json(json!({
                "query": {"multi_match": {"query": "invoice", "fields": ["content"]}},
                "highlight": {"fields": {"content": {"fragment_size": 150, "number_of_fragments": 1}}},
                "from": 20,
                "size": 20
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hits": {
                    "total": {"value": 45, "relation": "eq"},
                    "hits": [
                        {
                            "_source": {"filename": "billing/march.pdf"},
                            "highlight": {"content": ["Your <em>invoice</em> total"]}
                        },
                        {"_source": {}}
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = SearchRequest::new("invoice", 2, 20).unwrap();
        let hits = client_for(&server).search(&request).await.unwrap();

        assert_eq!(hits.total, 45);
        assert_eq!(
            hits.hits,
            vec![
                SearchHit {
                    filename: "billing/march.pdf".to_string(),
                    snippet: "Your <em>invoice</em> total".to_string(),
                },
                SearchHit {
                    filename: "unknown.pdf".to_string(),
                    snippet: String::new(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_search_legacy_numeric_total() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pdfs/_search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hits": {"total": 7, "hits": []}
            })))
            .mount(&server)
            .await;

        let request = SearchRequest::new("anything", 1, 20).unwrap();
        let hits = client_for(&server).search(&request).await.unwrap();

        assert_eq!(hits.total, 7);
        assert!(hits.hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/pdfs/_search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let request = SearchRequest::new("anything", 1, 20).unwrap();
        let err = client_for(&server).search(&request).await.unwrap_err();

        assert!(matches!(err, DomainError::Search { .. }));
    }

    #[tokio::test]
    async fn test_ping() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tagline": "You Know, for Search"})))
            .mount(&server)
            .await;

        assert!(client_for(&server).ping().await.is_ok());
    }
}
