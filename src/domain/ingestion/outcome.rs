//! Per-document outcomes and the invocation summary

use serde::{Deserialize, Serialize};

use super::notification::DocumentLocation;
use crate::domain::index::RejectedItem;
use crate::domain::ocr::JobStatus;

/// How the pipeline ended for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DocumentOutcome {
    /// Every page accepted by the index
    Indexed { pages: usize },
    /// Bulk call succeeded but the index rejected some pages
    IndexedWithErrors {
        pages: usize,
        rejected: Vec<RejectedItem>,
    },
    /// Job succeeded with no LINE text
    NoText,
    /// OCR job could not be created
    StartFailed { reason: String },
    /// Engine reported FAILED or PARTIAL_SUCCESS
    JobFailed { status: JobStatus },
    /// Polling or result collection broke off
    ExtractionFailed { reason: String },
    /// Bulk submission exhausted its retries
    IndexFailed { attempts: u32, reason: String },
}

impl DocumentOutcome {
    /// Metric label for this outcome
    pub fn label(&self) -> &'static str {
        match self {
            Self::Indexed { .. } => "indexed",
            Self::IndexedWithErrors { .. } => "indexed_with_errors",
            Self::NoText => "no_text",
            Self::StartFailed { .. } => "start_failed",
            Self::JobFailed { .. } => "job_failed",
            Self::ExtractionFailed { .. } => "extraction_failed",
            Self::IndexFailed { .. } => "index_failed",
        }
    }

    /// Pages written to the index, including partially rejected batches
    pub fn pages_indexed(&self) -> usize {
        match self {
            Self::Indexed { pages } => *pages,
            Self::IndexedWithErrors { pages, rejected } => pages.saturating_sub(rejected.len()),
            _ => 0,
        }
    }

    /// Whether the document ended in a failure (no-text is not a failure)
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::StartFailed { .. }
                | Self::JobFailed { .. }
                | Self::ExtractionFailed { .. }
                | Self::IndexFailed { .. }
        )
    }
}

/// Result recorded for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub location: DocumentLocation,
    #[serde(flatten)]
    pub outcome: DocumentOutcome,
}

/// Completion signal for one invocation of the pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationSummary {
    pub documents: Vec<DocumentReport>,
}

impl InvocationSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, location: DocumentLocation, outcome: DocumentOutcome) {
        self.documents.push(DocumentReport { location, outcome });
    }

    pub fn attempted(&self) -> usize {
        self.documents.len()
    }

    pub fn failed(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.outcome.is_failure())
            .count()
    }

    pub fn succeeded(&self) -> usize {
        self.attempted() - self.failed()
    }

    pub fn pages_indexed(&self) -> usize {
        self.documents
            .iter()
            .map(|d| d.outcome.pages_indexed())
            .sum()
    }

    /// JSON body reported back to the trigger
    pub fn to_response(&self) -> serde_json::Value {
        serde_json::json!({
            "status": "done",
            "attempted": self.attempted(),
            "succeeded": self.succeeded(),
            "failed": self.failed(),
            "pages_indexed": self.pages_indexed(),
            "documents": self.documents,
        })
    }
}
