//! Batch orchestration: fan-out, isolation and ordered reassembly.
//!
//! This module provides:
//! - [`BatchOrchestrator`], running one pipeline per non-blank row
//! - Row outcomes and the assembled [`BatchResult`]
//! - The request/response wire types

mod assembly;
mod integration_tests;
mod orchestrator;
mod result;
mod wire;

pub use assembly::{classify, is_blank, reassemble, RunOutcome};
pub use orchestrator::BatchOrchestrator;
pub use result::{BatchResult, RowOutcome, RowReport};
pub use wire::{BatchEnrichmentRequest, BatchEnrichmentResponse, SourceRef};
