//! Core domain types for enrichflow.
//!
//! This module contains:
//! - Row and batch status enums
//! - The fixed literal values reported to consumers

mod literals;
mod status;

pub use literals::{CONFIGURATION_ERROR, ENRICHMENT_ERROR, INFORMATION_NOT_FOUND};
pub use status::{BatchStatus, RowStatus};
