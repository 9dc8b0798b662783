//! # Enrichflow
//!
//! Concurrent enrichment of tabular cells: for each row of a column, search
//! the web for the row's entity and distill the results into a short answer
//! with a language model.
//!
//! Enrichflow provides:
//!
//! - **A two-stage pipeline**: search, then extract, with extraction failures
//!   degrading to a fixed fallback answer instead of failing the row
//! - **Batch orchestration**: one concurrent run per non-blank row, per-row
//!   failure isolation, results reassembled in input order
//! - **Pluggable providers**: search and language-model traits, with Tavily
//!   and watsonx.ai implementations behind the `http-providers` feature
//! - **Event-driven observability**: lifecycle events and `tracing` spans
//!   correlated by batch id
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use enrichflow::prelude::*;
//! use std::sync::Arc;
//!
//! let service = EnrichmentService::from_env(
//!     EnrichmentConfig::default(),
//!     Arc::new(LoggingEventSink::default()),
//! );
//!
//! let rows = vec!["Amazon".to_string(), String::new(), "Tesla".to_string()];
//! let response = service.submit_batch("CEO", &rows, Default::default()).await;
//! assert_eq!(response.enriched_values.len(), 3);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod batch;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod events;
pub mod observability;
pub mod pipeline;
pub mod providers;
pub mod service;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::batch::{
        BatchEnrichmentRequest, BatchEnrichmentResponse, BatchOrchestrator, BatchResult,
        RowOutcome, RowReport, SourceRef,
    };
    pub use crate::config::{EnrichmentConfig, ProviderSettings};
    pub use crate::context::{BatchIdentity, ContextValues, EnrichmentContext};
    pub use crate::core::{
        BatchStatus, RowStatus, CONFIGURATION_ERROR, ENRICHMENT_ERROR, INFORMATION_NOT_FOUND,
    };
    pub use crate::errors::{ConfigurationError, EnrichflowError, ProviderError};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::pipeline::{EnrichmentPipeline, PipelineRun, PipelineState};
    pub use crate::providers::{
        LanguageModelProvider, SearchDepth, SearchHit, SearchProvider, SearchResponse,
    };
    #[cfg(feature = "http-providers")]
    pub use crate::providers::{TavilySearchProvider, WatsonxLanguageModel};
    pub use crate::service::EnrichmentService;
}
