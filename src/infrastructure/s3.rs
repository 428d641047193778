//! S3 object listing for bulk reprocessing

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client as S3Client;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Lists object keys in a bucket
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectLister: Send + Sync {
    async fn list_keys(&self, bucket: &str) -> Result<Vec<String>, DomainError>;
}

/// S3-backed lister following continuation tokens
#[derive(Debug, Clone)]
pub struct S3ObjectLister {
    client: S3Client,
}

impl S3ObjectLister {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    pub fn with_config(aws_config: &aws_config::SdkConfig) -> Self {
        Self::new(S3Client::new(aws_config))
    }
}

#[async_trait]
impl ObjectLister for S3ObjectLister {
    async fn list_keys(&self, bucket: &str) -> Result<Vec<String>, DomainError> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| {
                    DomainError::storage(format!(
                        "Failed to list s3://{}: {}",
                        bucket,
                        DisplayErrorContext(&e)
                    ))
                })?;

            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );

            match response.next_continuation_token() {
                Some(token) if response.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        Ok(keys)
    }
}

/// Keys ending in `suffix`, in listing order
pub fn filter_by_suffix(keys: Vec<String>, suffix: &str) -> Vec<String> {
    keys.into_iter().filter(|k| k.ends_with(suffix)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_suffix() {
        let keys = vec![
            "a.pdf".to_string(),
            "notes.txt".to_string(),
            "dir/b.pdf".to_string(),
            "c.PDF".to_string(),
        ];

        assert_eq!(filter_by_suffix(keys, ".pdf"), vec!["a.pdf", "dir/b.pdf"]);
    }
}
