//! Shared AWS SDK configuration

use crate::config::AwsConfig;

/// Load the SDK config once per process; clients are built from it
pub async fn load_sdk_config(config: &AwsConfig) -> aws_config::SdkConfig {
    let loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

    match &config.region {
        Some(region) => {
            loader
                .region(aws_config::Region::new(region.clone()))
                .load()
                .await
        }
        None => loader.load().await,
    }
}
