//! Per-page text assembled from recognition blocks

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::ocr::RecognitionBlock;

/// Text of one page, lines joined with a single space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// Page number as reported by the OCR engine
    pub number: u32,
    pub text: String,
}

/// Accumulates LINE blocks by page across every result page of a job
#[derive(Debug, Default)]
pub struct PageAccumulator {
    lines: BTreeMap<u32, Vec<String>>,
}

impl PageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one result page worth of blocks, preserving emission order
    pub fn extend<'a, I>(&mut self, blocks: I)
    where
        I: IntoIterator<Item = &'a RecognitionBlock>,
    {
        for block in blocks {
            if !block.is_line() {
                continue;
            }

            if let Some(text) = &block.text {
                self.lines
                    .entry(block.page_number())
                    .or_default()
                    .push(text.clone());
            }
        }
    }

    pub fn page_count(&self) -> usize {
        self.lines.len()
    }

    /// Pages in ascending page-number order
    pub fn into_pages(self) -> Vec<PageText> {
        self.lines
            .into_iter()
            .map(|(number, lines)| PageText {
                number,
                text: lines.join(" "),
            })
            .collect()
    }
}
