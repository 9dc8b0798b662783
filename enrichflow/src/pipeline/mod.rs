//! The per-cell enrichment pipeline.
//!
//! This module provides:
//! - The search/extract state machine
//! - Deterministic query and prompt construction
//! - The pipeline runner that drives one row from inputs to answer

mod enrichment;
mod prompt;
mod state;

pub use enrichment::{EnrichmentPipeline, PipelineRun};
pub use prompt::{build_extraction_prompt, build_query, join_evidence};
pub use state::PipelineState;
