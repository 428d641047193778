//! Bulk API response

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Body returned by the `_bulk` endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub errors: bool,
    /// One entry per action, keyed by action name (`index`)
    #[serde(default)]
    pub items: Vec<HashMap<String, BulkItemResult>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BulkItemResult {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// A document the index refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedItem {
    pub id: String,
    pub status: u16,
    pub reason: String,
}

impl BulkResponse {
    /// Items carrying an error or a non-success status
    pub fn rejected(&self) -> Vec<RejectedItem> {
        self.items
            .iter()
            .flat_map(|item| item.values())
            .filter(|result| result.error.is_some() || result.status >= 300)
            .map(|result| RejectedItem {
                id: result.id.clone().unwrap_or_default(),
                status: result.status,
                reason: result
                    .error
                    .as_ref()
                    .map(describe_error)
                    .unwrap_or_else(|| format!("status {}", result.status)),
            })
            .collect()
    }
}

fn describe_error(error: &serde_json::Value) -> String {
    let kind = error.get("type").and_then(|v| v.as_str());
    let reason = error.get("reason").and_then(|v| v.as_str());

    match (kind, reason) {
        (Some(kind), Some(reason)) => format!("{}: {}", kind, reason),
        (Some(kind), None) => kind.to_string(),
        (None, Some(reason)) => reason.to_string(),
        (None, None) => error.to_string(),
    }
}
