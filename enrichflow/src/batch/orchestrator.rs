//! Concurrent fan-out of pipeline runs over the rows of a batch.

use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument};

use super::assembly::{is_blank, reassemble, RunOutcome};
use super::result::BatchResult;
use crate::context::{BatchIdentity, ContextValues, EnrichmentContext};
use crate::errors::{EnrichflowError, Result};
use crate::events::{
    EventSink, NoOpEventSink, BATCH_COMPLETED, BATCH_STARTED, ROW_COMPLETED, ROW_DEGRADED,
    ROW_FAILED,
};
use crate::observability::{BatchTimings, SpanTimer};
use crate::pipeline::{EnrichmentPipeline, PipelineRun};

/// Runs one pipeline per non-blank row and reassembles the results in input
/// order.
///
/// Every scheduled row runs in its own task. A failing or panicking row is
/// reported at its own position and never cancels its siblings. There are no
/// retries and, unless a row timeout is configured, no deadline.
#[derive(Clone)]
pub struct BatchOrchestrator {
    pipeline: EnrichmentPipeline,
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for BatchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchOrchestrator")
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl BatchOrchestrator {
    /// Creates an orchestrator that discards lifecycle events.
    #[must_use]
    pub fn new(pipeline: EnrichmentPipeline) -> Self {
        Self {
            pipeline,
            events: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Returns the pipeline every row runs through.
    #[must_use]
    pub fn pipeline(&self) -> &EnrichmentPipeline {
        &self.pipeline
    }

    /// Enriches every row of a batch.
    ///
    /// Blank rows resolve to an empty value without touching a provider.
    /// Other rows are trimmed of surrounding whitespace before the query is
    /// built, so `"  Tesla "` searches for `Tesla`.
    /// Row failures are folded into the result; only faults in the batch
    /// machinery itself surface as an `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichflowError::InvalidRequest`] when `column_name` is blank
    /// and there is at least one row to schedule, and
    /// [`EnrichflowError::Internal`] if reassembly loses track of a row.
    pub async fn run_batch<S: AsRef<str>>(
        &self,
        column_name: &str,
        rows: &[S],
        context_values: ContextValues,
    ) -> Result<BatchResult> {
        let identity = BatchIdentity::new();
        let total = SpanTimer::start("batch");

        let scheduled: Vec<(usize, &str)> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| (index, row.as_ref()))
            .filter(|(_, row)| !is_blank(row))
            .collect();

        if !scheduled.is_empty() && column_name.trim().is_empty() {
            return Err(EnrichflowError::InvalidRequest(
                "column_name must not be blank".to_string(),
            ));
        }

        info!(
            batch_id = %identity.batch_id,
            column_name = %column_name,
            rows = rows.len(),
            scheduled = scheduled.len(),
            "Starting batch enrichment"
        );
        self.events.emit(
            BATCH_STARTED,
            json!({
                "batch_id": identity.batch_id.to_string(),
                "column_name": column_name,
                "rows": rows.len(),
                "scheduled": scheduled.len(),
            }),
        );

        let enrich = SpanTimer::start("enrich");
        let handles: Vec<JoinHandle<Result<PipelineRun>>> = scheduled
            .iter()
            .map(|&(index, target)| {
                let ctx = EnrichmentContext::new(
                    column_name,
                    target.trim(),
                    Arc::clone(&context_values),
                );
                let span = info_span!(
                    "enrich_row",
                    batch_id = %identity.batch_id,
                    row = index,
                    target_value = %ctx.target_value
                );
                tokio::spawn(run_row(self.pipeline.clone(), ctx).instrument(span))
            })
            .collect();

        let joined = join_all(handles).await;
        let enrich_ms = enrich.finish();

        let outcomes: Vec<RunOutcome> = scheduled
            .iter()
            .zip(joined)
            .map(|(&(index, _), settled)| {
                let outcome = match settled {
                    Ok(Ok(run)) => RunOutcome::Completed(run),
                    Ok(Err(err)) => RunOutcome::Failed(err),
                    Err(join_error) => RunOutcome::Failed(EnrichflowError::Internal(format!(
                        "Task join error: {join_error}"
                    ))),
                };
                self.report_row(&identity, index, &outcome);
                outcome
            })
            .collect();

        let reports = reassemble(rows, outcomes)?;
        let timings = BatchTimings {
            enrich_ms,
            total_ms: total.finish(),
            scheduled_rows: scheduled.len(),
        };

        let result = BatchResult {
            identity,
            rows: reports,
            timings,
        };

        info!(
            batch_id = %identity.batch_id,
            enrich_ms = timings.enrich_ms,
            total_ms = timings.total_ms,
            avg_per_row_ms = timings.avg_per_row_ms(),
            succeeded = result.succeeded(),
            degraded = result.degraded(),
            failed = result.failed(),
            blank = result.blank(),
            "Batch enrichment finished"
        );
        self.events.emit(
            BATCH_COMPLETED,
            json!({
                "batch_id": identity.batch_id.to_string(),
                "succeeded": result.succeeded(),
                "degraded": result.degraded(),
                "failed": result.failed(),
                "blank": result.blank(),
                "enrich_ms": timings.enrich_ms,
                "total_ms": timings.total_ms,
            }),
        );

        Ok(result)
    }

    fn report_row(&self, identity: &BatchIdentity, index: usize, outcome: &RunOutcome) {
        let batch_id = identity.batch_id.to_string();
        match outcome {
            RunOutcome::Completed(run) if run.degraded => {
                warn!(batch_id = %batch_id, row = index, "Row degraded");
                self.events.emit(
                    ROW_DEGRADED,
                    json!({"batch_id": batch_id, "row": index, "duration_ms": run.duration_ms}),
                );
            }
            RunOutcome::Completed(run) => {
                self.events.emit(
                    ROW_COMPLETED,
                    json!({"batch_id": batch_id, "row": index, "duration_ms": run.duration_ms}),
                );
            }
            RunOutcome::Failed(err) => {
                error!(batch_id = %batch_id, row = index, error = %err, "Row enrichment failed");
                let mut payload = json!({
                    "batch_id": batch_id,
                    "row": index,
                    "kind": err.kind(),
                    "error": err.to_string(),
                });
                if let EnrichflowError::Provider(provider_err) = err {
                    payload["provider"] = json!(provider_err.to_dict());
                }
                self.events.emit(ROW_FAILED, payload);
            }
        }
    }
}

async fn run_row(pipeline: EnrichmentPipeline, ctx: EnrichmentContext) -> Result<PipelineRun> {
    match pipeline.config().row_timeout() {
        Some(limit) => tokio::time::timeout(limit, pipeline.run_traced(ctx))
            .await
            .unwrap_or(Err(EnrichflowError::Timeout {
                seconds: limit.as_secs_f64(),
            })),
        None => pipeline.run_traced(ctx).await,
    }
}
