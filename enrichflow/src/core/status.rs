//! Row and batch status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome status of a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// The row was blank and skipped.
    Blank,
    /// The pipeline produced a real answer.
    Success,
    /// Search succeeded but extraction degraded to the fallback answer.
    Degraded,
    /// The row's pipeline failed.
    Error,
}

impl RowStatus {
    /// Returns true if the row is reported with a value rather than an error.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Blank | Self::Success | Self::Degraded)
    }

    /// Returns true if the row failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => write!(f, "blank"),
            Self::Success => write!(f, "success"),
            Self::Degraded => write!(f, "degraded"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Top-level status of a batch response.
///
/// `Error` is reserved for batches where no row could be attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Rows were attempted; individual rows may still have failed.
    #[default]
    Success,
    /// The batch was rejected as a whole.
    Error,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}
