//! Folding per-row pipeline outcomes back into input order.

use super::result::{RowOutcome, RowReport};
use super::wire::SourceRef;
use crate::core::RowStatus;
use crate::errors::{EnrichflowError, Result};
use crate::pipeline::PipelineRun;

/// How one scheduled row's pipeline settled.
#[derive(Debug)]
pub enum RunOutcome {
    /// The pipeline returned a context.
    Completed(PipelineRun),
    /// The pipeline, its task, or its timeout failed.
    Failed(EnrichflowError),
}

/// Whether a row is skipped without reaching any provider.
#[must_use]
pub fn is_blank(row: &str) -> bool {
    row.trim().is_empty()
}

/// Turns one settled run into a row report.
#[must_use]
pub fn classify(outcome: RunOutcome) -> RowReport {
    match outcome {
        RunOutcome::Completed(run) => {
            let status = if run.degraded {
                RowStatus::Degraded
            } else {
                RowStatus::Success
            };
            let ctx = run.context;
            let sources = ctx
                .search_result
                .as_ref()
                .map(|response| response.results.iter().map(SourceRef::from).collect())
                .unwrap_or_default();
            let value = match &ctx.answer {
                Some(answer) => answer.clone(),
                None => ctx.to_string(),
            };
            RowReport {
                status,
                outcome: RowOutcome::Success { value, sources },
            }
        }
        RunOutcome::Failed(err) => RowReport::error(err.to_string()),
    }
}

/// Rebuilds the ordered report list.
///
/// Blank rows are filled in place; every other row consumes the next
/// outcome, which must be in scheduling order.
///
/// # Errors
///
/// Returns [`EnrichflowError::Internal`] if the number of outcomes does not
/// match the number of non-blank rows.
pub fn reassemble<S: AsRef<str>>(rows: &[S], outcomes: Vec<RunOutcome>) -> Result<Vec<RowReport>> {
    let expected = rows.iter().filter(|r| !is_blank(r.as_ref())).count();
    if outcomes.len() != expected {
        return Err(EnrichflowError::Internal(format!(
            "Collected {} outcomes for {} scheduled rows",
            outcomes.len(),
            expected
        )));
    }

    let mut outcomes = outcomes.into_iter();
    let mut reports = Vec::with_capacity(rows.len());
    for row in rows {
        if is_blank(row.as_ref()) {
            reports.push(RowReport::blank());
            continue;
        }
        let outcome = outcomes.next().ok_or_else(|| {
            EnrichflowError::Internal("Ran out of outcomes during reassembly".to_string())
        })?;
        reports.push(classify(outcome));
    }
    Ok(reports)
}
