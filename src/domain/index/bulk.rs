//! Bulk batch construction and the NDJSON wire format

use serde::{Deserialize, Serialize};

use crate::domain::ingestion::PageText;
use crate::domain::DomainError;

/// One page as stored in the search index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    #[serde(skip)]
    pub id: String,
    pub filename: String,
    pub page: u32,
    pub content: String,
}

impl IndexDocument {
    /// Deterministic identity of a page; re-ingesting overwrites it
    pub fn document_id(key: &str, page: u32) -> String {
        format!("{}__{}", key, page)
    }

    pub fn new(key: &str, page: u32, content: impl Into<String>) -> Self {
        Self {
            id: Self::document_id(key, page),
            filename: key.to_string(),
            page,
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct BulkAction<'a> {
    index: BulkTarget<'a>,
}

#[derive(Serialize)]
struct BulkTarget<'a> {
    #[serde(rename = "_index")]
    index: &'a str,
    #[serde(rename = "_id")]
    id: &'a str,
}

/// All pages of one document, written in a single bulk request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkBatch {
    index: String,
    documents: Vec<IndexDocument>,
}

impl BulkBatch {
    pub fn new(index: impl Into<String>, documents: Vec<IndexDocument>) -> Self {
        Self {
            index: index.into(),
            documents,
        }
    }

    /// Build the batch for `key`, numbering pages 1..=N in order
    pub fn from_pages(index: impl Into<String>, key: &str, pages: &[PageText]) -> Self {
        let documents = pages
            .iter()
            .zip(1u32..)
            .map(|(page, number)| IndexDocument::new(key, number, page.text.clone()))
            .collect();

        Self::new(index, documents)
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn documents(&self) -> &[IndexDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Alternating action/document lines, newline-terminated
    pub fn to_ndjson(&self) -> Result<String, DomainError> {
        let mut body = String::new();

        for document in &self.documents {
            let action = BulkAction {
                index: BulkTarget {
                    index: &self.index,
                    id: &document.id,
                },
            };

            body.push_str(&to_line(&action)?);
            body.push('\n');
            body.push_str(&to_line(document)?);
            body.push('\n');
        }

        Ok(body)
    }
}

fn to_line<T: Serialize>(value: &T) -> Result<String, DomainError> {
    serde_json::to_string(value)
        .map_err(|e| DomainError::internal(format!("Failed to serialize bulk line: {}", e)))
}
