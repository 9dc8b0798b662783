//! The batch boundary consumed by an HTTP layer.

use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, warn};

use crate::batch::{BatchEnrichmentRequest, BatchEnrichmentResponse, BatchOrchestrator};
use crate::config::EnrichmentConfig;
use crate::errors::ConfigurationError;
use crate::pipeline::EnrichmentPipeline;
use crate::providers::{LanguageModelProvider, SearchProvider};

/// Accepts batch submissions and always answers with a well-formed response.
///
/// A service whose providers could not be configured still accepts batches;
/// it answers every one with the configuration error shape.
#[derive(Debug, Clone)]
pub struct EnrichmentService {
    state: Result<BatchOrchestrator, ConfigurationError>,
}

impl EnrichmentService {
    /// Creates a service around a ready orchestrator.
    #[must_use]
    pub fn new(orchestrator: BatchOrchestrator) -> Self {
        Self {
            state: Ok(orchestrator),
        }
    }

    /// Creates a service from explicit providers.
    #[must_use]
    pub fn with_providers(
        search: Arc<dyn SearchProvider>,
        llm: Arc<dyn LanguageModelProvider>,
        config: EnrichmentConfig,
    ) -> Self {
        Self::new(BatchOrchestrator::new(
            EnrichmentPipeline::new(search, llm).with_config(config),
        ))
    }

    /// Creates a service that rejects every batch with `error`.
    #[must_use]
    pub fn unconfigured(error: ConfigurationError) -> Self {
        Self { state: Err(error) }
    }

    /// Builds the HTTP providers from settings.
    ///
    /// Never fails; a configuration problem is kept and reported per batch.
    #[cfg(feature = "http-providers")]
    #[must_use]
    pub fn from_settings(
        settings: &crate::config::ProviderSettings,
        config: EnrichmentConfig,
        events: Arc<dyn crate::events::EventSink>,
    ) -> Self {
        match build_orchestrator(settings, config) {
            Ok(orchestrator) => Self::new(orchestrator.with_event_sink(events)),
            Err(err) => {
                warn!(error = %err, "Enrichment providers are not configured");
                Self::unconfigured(err)
            }
        }
    }

    /// Builds the HTTP providers from the process environment.
    #[cfg(feature = "http-providers")]
    #[must_use]
    pub fn from_env(config: EnrichmentConfig, events: Arc<dyn crate::events::EventSink>) -> Self {
        Self::from_settings(&crate::config::ProviderSettings::from_env(), config, events)
    }

    /// Whether batches will be attempted.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.state.is_ok()
    }

    /// The configuration problem, if any.
    #[must_use]
    pub fn configuration_error(&self) -> Option<&ConfigurationError> {
        self.state.as_ref().err()
    }

    /// Enriches a batch of rows for one column.
    ///
    /// The response always has one value and one source list per row.
    pub async fn submit_batch(
        &self,
        column_name: &str,
        rows: &[String],
        context_values: HashMap<String, String>,
    ) -> BatchEnrichmentResponse {
        let orchestrator = match &self.state {
            Ok(orchestrator) => orchestrator,
            Err(err) => {
                warn!(rows = rows.len(), error = %err, "Rejecting batch: providers not configured");
                return BatchEnrichmentResponse::configuration_error(rows.len(), err.to_string());
            }
        };

        let run = orchestrator.run_batch(column_name, rows, Arc::new(context_values));
        match AssertUnwindSafe(run).catch_unwind().await {
            Ok(Ok(result)) => result.into_response(),
            Ok(Err(err)) => {
                error!(error = %err, kind = err.kind(), "Batch enrichment failed");
                BatchEnrichmentResponse::internal_error(rows.len(), err.to_string())
            }
            Err(panic) => {
                let cause = panic_message(panic.as_ref());
                error!(cause = %cause, "Batch enrichment panicked");
                BatchEnrichmentResponse::internal_error(rows.len(), cause)
            }
        }
    }

    /// Handles a deserialized request.
    pub async fn handle(&self, request: BatchEnrichmentRequest) -> BatchEnrichmentResponse {
        self.submit_batch(&request.column_name, &request.rows, request.context_values)
            .await
    }
}

#[cfg(feature = "http-providers")]
fn build_orchestrator(
    settings: &crate::config::ProviderSettings,
    config: EnrichmentConfig,
) -> Result<BatchOrchestrator, ConfigurationError> {
    use crate::providers::{TavilySearchProvider, WatsonxLanguageModel};

    settings.validate()?;
    let tavily_key = settings.tavily_api_key.clone().ok_or_else(|| {
        ConfigurationError::missing(vec![crate::config::TAVILY_API_KEY_ENV.to_string()])
    })?;

    let search = TavilySearchProvider::new(tavily_key, settings.request_timeout)
        .map_err(|e| ConfigurationError::new(e.to_string()))?;
    let llm = WatsonxLanguageModel::new(settings.watsonx()?, settings.request_timeout)
        .map_err(|e| ConfigurationError::new(e.to_string()))?;

    Ok(BatchOrchestrator::new(
        EnrichmentPipeline::new(Arc::new(search), Arc::new(llm)).with_config(config),
    ))
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unexpected panic during batch enrichment".to_string()
    }
}
