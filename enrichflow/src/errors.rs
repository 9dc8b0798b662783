//! Error types for enrichflow.
//!
//! Failures are resolved at the lowest level that can absorb them: extraction
//! failures inside the pipeline, search failures at the row boundary, and
//! configuration failures at the batch boundary. This module provides the
//! taxonomy those layers hand to each other.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnrichflowError>;

/// The main error type for enrichflow operations.
#[derive(Debug, Error)]
pub enum EnrichflowError {
    /// An upstream provider call failed.
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// The batch request itself cannot be processed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A row did not settle within its configured timeout.
    #[error("Row timed out after {seconds}s")]
    Timeout {
        /// The timeout that expired, in seconds.
        seconds: f64,
    },

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EnrichflowError {
    /// Short machine-readable kind, used in event payloads.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Provider(_) => "provider",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Timeout { .. } => "timeout",
            Self::Internal(_) => "internal",
        }
    }
}

/// Error raised when required provider settings are absent or malformed.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ConfigurationError {
    /// The error message.
    pub message: String,
    /// Environment variables or settings that were missing.
    #[serde(default)]
    pub missing: Vec<String>,
}

impl ConfigurationError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            missing: Vec::new(),
        }
    }

    /// Creates an error naming the settings that were missing.
    #[must_use]
    pub fn missing(names: Vec<String>) -> Self {
        Self {
            message: format!("Missing required provider settings: {}", names.join(", ")),
            missing: names,
        }
    }
}

/// Which provider call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderOperation {
    /// A web search call.
    Search,
    /// A language-model generation call.
    Generate,
    /// Credential exchange ahead of a call.
    Authenticate,
}

impl std::fmt::Display for ProviderOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Search => write!(f, "search"),
            Self::Generate => write!(f, "generate"),
            Self::Authenticate => write!(f, "authenticate"),
        }
    }
}

/// Error raised by a search or language-model provider.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{provider} {operation} failed: {message}")]
pub struct ProviderError {
    /// Provider name (e.g. "tavily").
    pub provider: String,
    /// The operation that failed.
    pub operation: ProviderOperation,
    /// The error message.
    pub message: String,
    /// Upstream HTTP status, when the failure came from a response.
    pub status_code: Option<u16>,
}

impl ProviderError {
    /// Creates a new provider error.
    #[must_use]
    pub fn new(
        provider: impl Into<String>,
        operation: ProviderOperation,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            operation,
            message: message.into(),
            status_code: None,
        }
    }

    /// Creates a search failure.
    #[must_use]
    pub fn search(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(provider, ProviderOperation::Search, message)
    }

    /// Creates a generation failure.
    #[must_use]
    pub fn generate(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(provider, ProviderOperation::Generate, message)
    }

    /// Sets the upstream status code.
    #[must_use]
    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("provider".to_string(), serde_json::json!(self.provider));
        map.insert("operation".to_string(), serde_json::json!(self.operation.to_string()));
        map.insert("message".to_string(), serde_json::json!(self.message));
        if let Some(code) = self.status_code {
            map.insert("status_code".to_string(), serde_json::json!(code));
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_lists_missing() {
        let err = ConfigurationError::missing(vec![
            "TAVILY_API_KEY".to_string(),
            "WATSONX_API_KEY".to_string(),
        ]);

        assert_eq!(err.missing.len(), 2);
        assert!(err.to_string().contains("TAVILY_API_KEY, WATSONX_API_KEY"));
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::search("tavily", "connection reset").with_status(502);

        assert_eq!(err.to_string(), "tavily search failed: connection reset");
        assert_eq!(err.status_code, Some(502));
    }

    #[test]
    fn test_provider_error_to_dict() {
        let err = ProviderError::generate("watsonx", "quota exceeded").with_status(429);
        let dict = err.to_dict();

        assert_eq!(dict.get("operation").unwrap(), "generate");
        assert_eq!(dict.get("status_code").unwrap(), 429);
    }

    #[test]
    fn test_error_kind() {
        let provider: EnrichflowError = ProviderError::search("tavily", "down").into();

        assert_eq!(provider.kind(), "provider");
        assert_eq!(EnrichflowError::Timeout { seconds: 2.5 }.kind(), "timeout");
        assert_eq!(EnrichflowError::InvalidRequest("x".to_string()).kind(), "invalid_request");
    }
}
