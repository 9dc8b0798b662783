//! Batch identity for correlating logs and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one batch submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchIdentity {
    /// Unique ID for this batch.
    pub batch_id: Uuid,
    /// When the batch was accepted.
    pub started_at: DateTime<Utc>,
}

impl BatchIdentity {
    /// Creates a new identity with a generated batch ID.
    #[must_use]
    pub fn new() -> Self {
        Self::with_batch_id(Uuid::new_v4())
    }

    /// Creates an identity with a specific batch ID.
    #[must_use]
    pub fn with_batch_id(batch_id: Uuid) -> Self {
        Self {
            batch_id,
            started_at: Utc::now(),
        }
    }

    /// Milliseconds elapsed since the batch was accepted.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}

impl Default for BatchIdentity {
    fn default() -> Self {
        Self::new()
    }
}
