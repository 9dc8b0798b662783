//! Per-row and per-batch context.
//!
//! This module provides:
//! - The enrichment context threaded through one pipeline run
//! - Batch identity for log and event correlation

mod enrichment;
mod identity;

pub use enrichment::{ContextValues, EnrichmentContext};
pub use identity::BatchIdentity;
