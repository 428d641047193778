//! Trigger notifications - where an uploaded document lives

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Storage location of one uploaded document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentLocation {
    pub bucket: String,
    pub key: String,
}

impl DocumentLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for DocumentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Object-created event as delivered by S3 notifications
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Object {
    /// Form-encoded object key
    pub key: String,
}

impl S3Event {
    /// Build an event carrying the given raw (undecoded) keys
    pub fn for_keys<I, K>(bucket: &str, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            records: keys
                .into_iter()
                .map(|key| S3EventRecord {
                    s3: S3Entity {
                        bucket: S3Bucket {
                            name: bucket.to_string(),
                        },
                        object: S3Object { key: key.into() },
                    },
                })
                .collect(),
        }
    }
}

/// Decode an S3 event key (`+` is a space, `%XX` escapes)
pub fn decode_object_key(raw: &str) -> Result<String, DomainError> {
    let spaced = raw.replace('+', " ");

    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| DomainError::validation(format!("Invalid object key '{}': {}", raw, e)))
}
