use std::time::Duration;

use serde::Deserialize;

use crate::domain::{DomainError, PollPolicy, RetryPolicy};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub aws: AwsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Search index connection and query settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the search engine, e.g. `http://localhost:9200`
    pub es_host: String,
    pub index: String,
    /// Public CDN domain serving the original PDFs
    pub cdn_domain: Option<String>,
    pub page_size: u64,
    /// Deepest hit the engine will page to (`index.max_result_window`)
    pub max_result_window: u64,
    pub timeout_secs: u64,
}

/// Ingestion pipeline tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub poll_interval_secs: u64,
    pub max_polls: Option<u32>,
    pub max_wait_secs: Option<u64>,
    pub bulk_max_attempts: u32,
    pub bulk_retry_delay_secs: u64,
    pub bulk_backoff_multiplier: f64,
    pub bulk_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Prometheus metrics configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AwsConfig {
    /// Region override; the SDK default chain applies when unset
    #[serde(default)]
    pub region: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            es_host: String::new(),
            index: "pdfs".to_string(),
            cdn_domain: None,
            page_size: 20,
            max_result_window: 10_000,
            timeout_secs: 10,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            max_polls: None,
            max_wait_secs: None,
            bulk_max_attempts: 3,
            bulk_retry_delay_secs: 2,
            bulk_backoff_multiplier: 1.0,
            bulk_timeout_secs: 30,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// CDN domain, ignoring blank values
    pub fn cdn_domain(&self) -> Option<&str> {
        self.cdn_domain
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

impl IngestConfig {
    pub fn poll_policy(&self) -> PollPolicy {
        let mut policy = PollPolicy::new(Duration::from_secs(self.poll_interval_secs));
        policy.max_polls = self.max_polls;
        policy.max_wait = self.max_wait_secs.map(Duration::from_secs);
        policy
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.bulk_max_attempts,
            Duration::from_secs(self.bulk_retry_delay_secs),
        )
        .with_backoff_multiplier(self.bulk_backoff_multiplier)
    }

    pub fn bulk_timeout(&self) -> Duration {
        Duration::from_secs(self.bulk_timeout_secs)
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local`, `APP__*` variables, and
    /// finally the plain `ES_HOST` / `INDEX` / `CLOUDFRONT_DOMAIN` variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("search.es_host", std::env::var("ES_HOST").ok())?
            .set_override_option("search.index", std::env::var("INDEX").ok())?
            .set_override_option("search.cdn_domain", std::env::var("CLOUDFRONT_DOMAIN").ok())?
            .build()?;

        config.try_deserialize()
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.search.es_host.trim().is_empty() {
            return Err(DomainError::configuration(
                "Search host is required (set ES_HOST or APP__SEARCH__ES_HOST)",
            ));
        }

        if self.search.index.trim().is_empty() {
            return Err(DomainError::configuration("Index name must not be empty"));
        }

        if self.search.page_size == 0 {
            return Err(DomainError::configuration("search.page_size must be >= 1"));
        }

        if self.search.max_result_window < self.search.page_size {
            return Err(DomainError::configuration(
                "search.max_result_window must be >= search.page_size",
            ));
        }

        if self.ingest.bulk_max_attempts == 0 {
            return Err(DomainError::configuration(
                "ingest.bulk_max_attempts must be >= 1",
            ));
        }

        Ok(())
    }
}
