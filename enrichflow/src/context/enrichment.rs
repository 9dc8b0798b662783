//! Per-row record threaded through one enrichment pipeline run.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::providers::SearchResponse;

/// Known facts about an entity, shared read-only by every row of a batch.
pub type ContextValues = Arc<HashMap<String, String>>;

/// The record one pipeline run reads and advances.
///
/// Created with neither `search_result` nor `answer`; the search stage sets
/// the former and the extract stage the latter. Each context is owned by
/// exactly one run and never shared between rows.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentContext {
    /// The field being resolved (e.g. "CEO").
    pub column_name: String,
    /// The entity this row is about (e.g. "Amazon").
    pub target_value: String,
    /// Auxiliary facts about the entity.
    pub context_values: ContextValues,
    /// Raw search response, once the search stage has run.
    pub search_result: Option<SearchResponse>,
    /// Final answer, once the extract stage has run.
    pub answer: Option<String>,
}

impl EnrichmentContext {
    /// Creates a fresh context for one row.
    #[must_use]
    pub fn new(
        column_name: impl Into<String>,
        target_value: impl Into<String>,
        context_values: ContextValues,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            target_value: target_value.into(),
            context_values,
            search_result: None,
            answer: None,
        }
    }

    /// Records the search stage's output.
    #[must_use]
    pub fn with_search_result(mut self, result: SearchResponse) -> Self {
        self.search_result = Some(result);
        self
    }

    /// Records the extract stage's output.
    #[must_use]
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    /// Whether the search stage has completed.
    #[must_use]
    pub fn has_search_result(&self) -> bool {
        self.search_result.is_some()
    }

    /// Whether the pipeline reached its terminal value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.search_result.is_some() && self.answer.is_some()
    }

    /// Context values sorted by key, for deterministic rendering.
    #[must_use]
    pub fn sorted_context_values(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .context_values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

impl fmt::Display for EnrichmentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EnrichmentContext(column_name={:?}, target_value={:?}, results={}, answer={:?})",
            self.column_name,
            self.target_value,
            self.search_result.as_ref().map_or(0, |r| r.results.len()),
            self.answer,
        )
    }
}
