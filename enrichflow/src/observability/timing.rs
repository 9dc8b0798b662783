//! Timing helpers for pipeline and batch telemetry.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Simple span timing helper.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: String,
}

impl SpanTimer {
    /// Starts a new span timer.
    #[must_use]
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Returns the span name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finishes the span and returns the duration.
    #[must_use]
    pub fn finish(self) -> f64 {
        self.elapsed_ms()
    }
}

/// Wall-clock figures for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchTimings {
    /// Time spent waiting on the concurrent pipeline runs.
    pub enrich_ms: f64,
    /// Time spent on the whole batch, including reassembly.
    pub total_ms: f64,
    /// Number of rows that were actually scheduled.
    pub scheduled_rows: usize,
}

impl BatchTimings {
    /// Average enrichment time per scheduled row.
    ///
    /// Rows run concurrently, so this is the batch wait spread over the rows,
    /// not the latency of any one row.
    #[must_use]
    pub fn avg_per_row_ms(&self) -> f64 {
        if self.scheduled_rows == 0 {
            0.0
        } else {
            self.enrich_ms / self.scheduled_rows as f64
        }
    }
}
