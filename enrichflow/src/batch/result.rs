//! Per-row outcomes and the assembled batch result.

use serde::{Deserialize, Serialize};

use super::wire::{BatchEnrichmentResponse, SourceRef};
use crate::context::BatchIdentity;
use crate::core::{BatchStatus, RowStatus, ENRICHMENT_ERROR};
use crate::observability::BatchTimings;

/// What one row resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    /// The row has a value and the sources behind it.
    Success {
        /// The enriched value.
        value: String,
        /// Sources from the search stage.
        sources: Vec<SourceRef>,
    },
    /// The row's pipeline failed.
    Error {
        /// Why the row failed.
        reason: String,
    },
}

impl RowOutcome {
    /// Outcome for a blank row.
    #[must_use]
    pub fn blank() -> Self {
        Self::Success {
            value: String::new(),
            sources: Vec::new(),
        }
    }

    /// The value reported for this row.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Success { value, .. } => value,
            Self::Error { .. } => ENRICHMENT_ERROR,
        }
    }

    /// The sources reported for this row.
    #[must_use]
    pub fn sources(&self) -> &[SourceRef] {
        match self {
            Self::Success { sources, .. } => sources,
            Self::Error { .. } => &[],
        }
    }

    /// Whether the row failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// A row outcome together with how it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowReport {
    /// Finer-grained classification than the outcome alone carries.
    pub status: RowStatus,
    /// The outcome.
    pub outcome: RowOutcome,
}

impl RowReport {
    /// Report for a blank row.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            status: RowStatus::Blank,
            outcome: RowOutcome::blank(),
        }
    }

    /// Report for a failed row.
    #[must_use]
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            status: RowStatus::Error,
            outcome: RowOutcome::Error {
                reason: reason.into(),
            },
        }
    }
}

/// Ordered result of one batch; `rows[i]` belongs to input row `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Identity of the batch.
    pub identity: BatchIdentity,
    /// One report per input row, in input order.
    pub rows: Vec<RowReport>,
    /// Timing figures.
    pub timings: BatchTimings,
}

impl BatchResult {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the batch had no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn count(&self, status: RowStatus) -> usize {
        self.rows.iter().filter(|r| r.status == status).count()
    }

    /// Rows with a real answer.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.count(RowStatus::Success)
    }

    /// Rows whose pipeline failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(RowStatus::Error)
    }

    /// Rows whose answer degraded to the fallback.
    #[must_use]
    pub fn degraded(&self) -> usize {
        self.count(RowStatus::Degraded)
    }

    /// Rows that were blank and skipped.
    #[must_use]
    pub fn blank(&self) -> usize {
        self.count(RowStatus::Blank)
    }

    /// Values in row order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.outcome.value()).collect()
    }

    /// Flattens into the wire response.
    ///
    /// Row failures never change the top-level status.
    #[must_use]
    pub fn into_response(self) -> BatchEnrichmentResponse {
        let mut enriched_values = Vec::with_capacity(self.rows.len());
        let mut sources = Vec::with_capacity(self.rows.len());

        for report in self.rows {
            match report.outcome {
                RowOutcome::Success {
                    value,
                    sources: row_sources,
                } => {
                    enriched_values.push(value);
                    sources.push(row_sources);
                }
                RowOutcome::Error { .. } => {
                    enriched_values.push(ENRICHMENT_ERROR.to_string());
                    sources.push(Vec::new());
                }
            }
        }

        BatchEnrichmentResponse {
            enriched_values,
            status: BatchStatus::Success,
            error: None,
            sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn answered(value: &str, degraded: bool) -> RowReport {
        RowReport {
            status: if degraded {
                RowStatus::Degraded
            } else {
                RowStatus::Success
            },
            outcome: RowOutcome::Success {
                value: value.to_string(),
                sources: vec![SourceRef::new("t", "https://u.example")],
            },
        }
    }

    fn sample() -> BatchResult {
        BatchResult {
            identity: BatchIdentity::new(),
            rows: vec![
                answered("Andy Jassy", false),
                RowReport::blank(),
                RowReport::error("tavily search failed: down"),
                answered("Information not found", true),
            ],
            timings: BatchTimings::default(),
        }
    }

    #[test]
    fn test_counts() {
        let result = sample();

        assert_eq!(result.len(), 4);
        assert_eq!(result.succeeded(), 1);
        assert_eq!(result.blank(), 1);
        assert_eq!(result.failed(), 1);
        assert_eq!(result.degraded(), 1);
    }

    #[test]
    fn test_into_response_keeps_positions() {
        let response = sample().into_response();

        assert_eq!(response.status, BatchStatus::Success);
        assert_eq!(response.error, None);
        assert_eq!(
            response.enriched_values,
            vec!["Andy Jassy", "", ENRICHMENT_ERROR, "Information not found"]
        );
        assert_eq!(response.sources[0].len(), 1);
        assert!(response.sources[1].is_empty());
        assert!(response.sources[2].is_empty());
        assert_eq!(response.sources[3].len(), 1);
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let outcome = RowOutcome::Error {
            reason: "down".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json, serde_json::json!({"status": "error", "reason": "down"}));
        assert_eq!(outcome.value(), ENRICHMENT_ERROR);
        assert!(outcome.sources().is_empty());
    }
}
