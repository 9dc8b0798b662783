//! Lifecycle events for observability.
//!
//! Sinks are passed explicitly to the orchestrator; there is no process-wide
//! sink.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

/// A batch was accepted and its rows are about to be scheduled.
pub const BATCH_STARTED: &str = "batch.started";
/// Every row of a batch has settled.
pub const BATCH_COMPLETED: &str = "batch.completed";
/// A row produced an answer.
pub const ROW_COMPLETED: &str = "row.completed";
/// A row's answer fell back to the degraded value.
pub const ROW_DEGRADED: &str = "row.degraded";
/// A row's pipeline failed.
pub const ROW_FAILED: &str = "row.failed";
