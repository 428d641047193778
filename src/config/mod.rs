//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AwsConfig, IngestConfig, LogFormat, LoggingConfig, MetricsConfig,
    ObservabilityConfig, SearchConfig, ServerConfig,
};
