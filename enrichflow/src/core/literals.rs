//! Fixed values a consumer can match on.
//!
//! `ENRICHMENT_ERROR` means "we failed to try"; `INFORMATION_NOT_FOUND` means
//! "we tried and found nothing". The two must stay distinct.

/// Degraded answer used when extraction cannot produce a real one.
pub const INFORMATION_NOT_FOUND: &str = "Information not found";

/// Row value when the row's pipeline failed.
pub const ENRICHMENT_ERROR: &str = "Error during enrichment";

/// Row value for every row when providers are not configured.
pub const CONFIGURATION_ERROR: &str = "Provider configuration error";
