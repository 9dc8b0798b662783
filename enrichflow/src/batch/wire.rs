//! Request and response shapes exchanged with the HTTP layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::{BatchStatus, CONFIGURATION_ERROR, ENRICHMENT_ERROR};
use crate::providers::SearchHit;

/// A `(title, url)` reference to a page that informed an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// Page URL.
    #[serde(default)]
    pub url: String,
}

impl SourceRef {
    /// Creates a source reference.
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

impl From<&SearchHit> for SourceRef {
    fn from(hit: &SearchHit) -> Self {
        Self::new(hit.title.clone(), hit.url.clone())
    }
}

/// One batch submission: a column to fill for a list of entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEnrichmentRequest {
    /// The column being filled (e.g. "CEO").
    pub column_name: String,
    /// Target entities, one per row.
    #[serde(default)]
    pub rows: Vec<String>,
    /// Known facts shared by every row.
    #[serde(default)]
    pub context_values: HashMap<String, String>,
}

impl BatchEnrichmentRequest {
    /// Creates a request with no context values.
    #[must_use]
    pub fn new(column_name: impl Into<String>, rows: Vec<String>) -> Self {
        Self {
            column_name: column_name.into(),
            rows,
            context_values: HashMap::new(),
        }
    }

    /// Adds a context value.
    #[must_use]
    pub fn with_context_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_values.insert(key.into(), value.into());
        self
    }
}

/// The result of one batch, positionally aligned with the request rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEnrichmentResponse {
    /// One value per row.
    pub enriched_values: Vec<String>,
    /// `error` only when no row could be attempted.
    pub status: BatchStatus,
    /// Cause of a batch-level failure.
    #[serde(default)]
    pub error: Option<String>,
    /// One list of sources per row.
    #[serde(default)]
    pub sources: Vec<Vec<SourceRef>>,
}

impl BatchEnrichmentResponse {
    /// Response for a batch rejected because providers are not configured.
    #[must_use]
    pub fn configuration_error(rows: usize, cause: impl Into<String>) -> Self {
        Self::rejected(rows, CONFIGURATION_ERROR, cause.into())
    }

    /// Response for a batch aborted by an unexpected internal fault.
    #[must_use]
    pub fn internal_error(rows: usize, cause: impl Into<String>) -> Self {
        Self::rejected(rows, ENRICHMENT_ERROR, cause.into())
    }

    fn rejected(rows: usize, literal: &str, cause: String) -> Self {
        Self {
            enriched_values: vec![literal.to_string(); rows],
            status: BatchStatus::Error,
            error: Some(cause),
            sources: vec![Vec::new(); rows],
        }
    }

    /// Number of rows in the response.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enriched_values.len()
    }

    /// Whether the response has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enriched_values.is_empty()
    }
}
