//! The per-cell enrichment pipeline: search, then extract.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::prompt::{build_extraction_prompt, build_query, join_evidence};
use super::state::PipelineState;
use crate::config::EnrichmentConfig;
use crate::context::EnrichmentContext;
use crate::core::INFORMATION_NOT_FOUND;
use crate::errors::Result;
use crate::observability::SpanTimer;
use crate::providers::{LanguageModelProvider, SearchProvider};

/// Record of one completed pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRun {
    /// The context with `search_result` and `answer` populated.
    pub context: EnrichmentContext,
    /// Final state; always `Done` for a returned run.
    pub state: PipelineState,
    /// True if extraction fell back to the degraded answer.
    pub degraded: bool,
    /// Wall-clock duration of the run.
    pub duration_ms: f64,
}

/// Two-stage pipeline turning a row's inputs into an answer.
///
/// A search failure fails the run. An extraction failure is absorbed and the
/// answer degrades to [`INFORMATION_NOT_FOUND`], keeping the search results.
#[derive(Clone)]
pub struct EnrichmentPipeline {
    search: Arc<dyn SearchProvider>,
    llm: Arc<dyn LanguageModelProvider>,
    config: Arc<EnrichmentConfig>,
}

impl std::fmt::Debug for EnrichmentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EnrichmentPipeline {
    /// Creates a pipeline with the default configuration.
    #[must_use]
    pub fn new(search: Arc<dyn SearchProvider>, llm: Arc<dyn LanguageModelProvider>) -> Self {
        Self {
            search,
            llm,
            config: Arc::new(EnrichmentConfig::default()),
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EnrichmentConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Runs both stages and returns the populated context.
    ///
    /// # Errors
    ///
    /// Fails only when the search stage fails.
    pub async fn run(&self, ctx: EnrichmentContext) -> Result<EnrichmentContext> {
        self.run_traced(ctx).await.map(|run| run.context)
    }

    /// Runs both stages and reports how the run went.
    ///
    /// # Errors
    ///
    /// Fails only when the search stage fails.
    pub async fn run_traced(&self, ctx: EnrichmentContext) -> Result<PipelineRun> {
        let timer = SpanTimer::start("enrichment_pipeline");
        let mut state = PipelineState::Start;

        state = state.advance();
        debug!(target_value = %ctx.target_value, state = %state, "Pipeline transition");
        let ctx = self.search_stage(ctx).await?;

        state = state.advance();
        debug!(target_value = %ctx.target_value, state = %state, "Pipeline transition");
        let (ctx, degraded) = self.extract_stage(ctx).await;

        state = state.advance();
        let duration_ms = timer.finish();
        debug!(
            target_value = %ctx.target_value,
            state = %state,
            degraded,
            duration_ms,
            "Pipeline finished"
        );

        Ok(PipelineRun {
            context: ctx,
            state,
            degraded,
            duration_ms,
        })
    }

    async fn search_stage(&self, ctx: EnrichmentContext) -> Result<EnrichmentContext> {
        let query = build_query(&ctx.column_name, &ctx.target_value);
        info!(query = %query, depth = %self.config.search_depth, "Searching");

        let response = self
            .search
            .search(&query, self.config.search_depth, self.config.max_results)
            .await
            .map_err(|e| {
                error!(query = %query, error = %e, "Search stage failed");
                e
            })?;

        info!(
            query = %query,
            results = response.results.len(),
            "Search completed"
        );
        Ok(ctx.with_search_result(response))
    }

    async fn extract_stage(&self, ctx: EnrichmentContext) -> (EnrichmentContext, bool) {
        let Some(response) = ctx.search_result.as_ref() else {
            warn!(target_value = %ctx.target_value, "Extraction reached without search result");
            return (ctx.with_answer(INFORMATION_NOT_FOUND), true);
        };

        let evidence = join_evidence(response, &self.config.evidence_separator);
        let prompt =
            build_extraction_prompt(&ctx, &evidence, self.config.include_context_in_prompt);
        debug!(target_value = %ctx.target_value, prompt_len = prompt.len(), "Extracting answer");

        match self.llm.generate(&prompt).await {
            Ok(text) => {
                let answer = text.trim();
                if answer.is_empty() {
                    warn!(target_value = %ctx.target_value, "Language model returned no text");
                    (ctx.with_answer(INFORMATION_NOT_FOUND), true)
                } else {
                    info!(target_value = %ctx.target_value, answer = %answer, "Extracted answer");
                    let answer = answer.to_string();
                    (ctx.with_answer(answer), false)
                }
            }
            Err(e) => {
                warn!(target_value = %ctx.target_value, error = %e, "Extraction failed, degrading answer");
                (ctx.with_answer(INFORMATION_NOT_FOUND), true)
            }
        }
    }
}
