//! Extraction job types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of an asynchronous OCR job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status reported by the OCR engine for a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Running,
    Succeeded,
    Failed,
    PartialSuccess,
}

impl JobStatus {
    /// Whether polling should stop
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::PartialSuccess => "PARTIAL_SUCCESS",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of recognition block; only `Line` carries indexable text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    Page,
    Line,
    Word,
    Other(String),
}

/// A unit of recognized output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionBlock {
    pub block_type: BlockType,
    /// 1-based page number; absent on single-page documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl RecognitionBlock {
    pub fn line(page: u32, text: impl Into<String>) -> Self {
        Self {
            block_type: BlockType::Line,
            page: Some(page),
            text: Some(text.into()),
        }
    }

    pub fn word(page: u32, text: impl Into<String>) -> Self {
        Self {
            block_type: BlockType::Word,
            page: Some(page),
            text: Some(text.into()),
        }
    }

    pub fn is_line(&self) -> bool {
        self.block_type == BlockType::Line
    }

    /// Page the block belongs to, defaulting to the first page
    pub fn page_number(&self) -> u32 {
        self.page.unwrap_or(1)
    }
}

/// One response from polling a job: its status plus one page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResultPage {
    pub status: JobStatus,
    #[serde(default)]
    pub blocks: Vec<RecognitionBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl JobResultPage {
    pub fn running() -> Self {
        Self::with_status(JobStatus::Running)
    }

    pub fn with_status(status: JobStatus) -> Self {
        Self {
            status,
            blocks: Vec::new(),
            next_token: None,
        }
    }

    pub fn succeeded(blocks: Vec<RecognitionBlock>) -> Self {
        Self {
            status: JobStatus::Succeeded,
            blocks,
            next_token: None,
        }
    }

    pub fn with_next_token(mut self, token: impl Into<String>) -> Self {
        self.next_token = Some(token.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Succeeded.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::PartialSuccess.is_terminal());
    }

    #[test]
    fn test_block_without_page_defaults_to_first() {
        let block = RecognitionBlock {
            block_type: BlockType::Line,
            page: None,
            text: Some("cover".to_string()),
        };

        assert_eq!(block.page_number(), 1);
        assert!(block.is_line());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&JobStatus::PartialSuccess).unwrap(),
            "\"PARTIAL_SUCCESS\""
        );
    }
}
