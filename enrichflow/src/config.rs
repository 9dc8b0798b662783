//! Configuration types for enrichment runs and provider credentials.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ConfigurationError;
use crate::providers::SearchDepth;

/// Environment variable holding the Tavily API key.
pub const TAVILY_API_KEY_ENV: &str = "TAVILY_API_KEY";
/// Environment variable holding the watsonx.ai API key.
pub const WATSONX_API_KEY_ENV: &str = "WATSONX_API_KEY";
/// Environment variable holding the watsonx.ai project id.
pub const WATSONX_PROJECT_ID_ENV: &str = "WATSONX_PROJECT_ID";
/// Environment variable overriding the watsonx.ai regional endpoint.
pub const WATSONX_URL_ENV: &str = "WATSONX_URL";
/// Environment variable overriding the foundation model id.
pub const FOUNDATION_MODEL_ID_ENV: &str = "FOUNDATION_MODEL_ID";

/// Per-run enrichment behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Search thoroughness.
    #[serde(default)]
    pub search_depth: SearchDepth,
    /// Maximum number of search results per row.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Separator placed between content snippets in the evidence block.
    #[serde(default = "default_evidence_separator")]
    pub evidence_separator: String,
    /// Whether known context values are listed in the extraction prompt.
    #[serde(default)]
    pub include_context_in_prompt: bool,
    /// Optional per-row deadline in seconds. `None` waits indefinitely.
    #[serde(default)]
    pub row_timeout_seconds: Option<f64>,
}

fn default_max_results() -> usize {
    5
}

fn default_evidence_separator() -> String {
    "\n\n---\n\n".to_string()
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            search_depth: SearchDepth::default(),
            max_results: default_max_results(),
            evidence_separator: default_evidence_separator(),
            include_context_in_prompt: false,
            row_timeout_seconds: None,
        }
    }
}

impl EnrichmentConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search depth.
    #[must_use]
    pub fn with_search_depth(mut self, depth: SearchDepth) -> Self {
        self.search_depth = depth;
        self
    }

    /// Sets the maximum number of results.
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Lists context values in the extraction prompt.
    #[must_use]
    pub fn with_context_in_prompt(mut self, include: bool) -> Self {
        self.include_context_in_prompt = include;
        self
    }

    /// Sets a per-row timeout.
    #[must_use]
    pub fn with_row_timeout(mut self, seconds: f64) -> Self {
        self.row_timeout_seconds = Some(seconds);
        self
    }

    /// Gets the row timeout as Duration.
    #[must_use]
    pub fn row_timeout(&self) -> Option<Duration> {
        self.row_timeout_seconds
            .filter(|s| *s > 0.0)
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
    }
}

/// Decoding parameters sent with every generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    /// Decoding strategy.
    #[serde(default = "default_decoding_method")]
    pub decoding_method: String,
    /// Upper bound on generated tokens.
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    /// Lower bound on generated tokens.
    #[serde(default)]
    pub min_new_tokens: u32,
    /// Sampling temperature.
    #[serde(default)]
    pub temperature: f64,
}

fn default_decoding_method() -> String {
    "greedy".to_string()
}

fn default_max_new_tokens() -> u32 {
    100
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            decoding_method: default_decoding_method(),
            max_new_tokens: default_max_new_tokens(),
            min_new_tokens: 0,
            temperature: 0.0,
        }
    }
}

/// Credentials and model selection for watsonx.ai.
#[derive(Clone)]
pub struct WatsonxSettings {
    /// IBM Cloud API key.
    pub api_key: String,
    /// watsonx.ai project id.
    pub project_id: String,
    /// Regional endpoint.
    pub url: String,
    /// Foundation model id.
    pub model_id: String,
    /// Decoding parameters.
    pub parameters: GenerationParameters,
}

impl std::fmt::Debug for WatsonxSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatsonxSettings")
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("url", &self.url)
            .field("model_id", &self.model_id)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Provider settings as read from the environment, before validation.
#[derive(Clone)]
pub struct ProviderSettings {
    /// Tavily API key.
    pub tavily_api_key: Option<String>,
    /// watsonx.ai API key.
    pub watsonx_api_key: Option<String>,
    /// watsonx.ai project id.
    pub watsonx_project_id: Option<String>,
    /// Regional endpoint.
    pub watsonx_url: String,
    /// Foundation model id.
    pub model_id: String,
    /// Timeout applied to every provider HTTP call.
    pub request_timeout: Duration,
}

/// Default regional watsonx.ai endpoint.
pub const DEFAULT_WATSONX_URL: &str = "https://us-south.ml.cloud.ibm.com";
/// Default foundation model.
pub const DEFAULT_FOUNDATION_MODEL_ID: &str = "ibm/granite-3-2-8b-instruct";

impl ProviderSettings {
    /// Reads settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through an arbitrary lookup function.
    ///
    /// Blank values are treated as absent.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            tavily_api_key: read(TAVILY_API_KEY_ENV),
            watsonx_api_key: read(WATSONX_API_KEY_ENV),
            watsonx_project_id: read(WATSONX_PROJECT_ID_ENV),
            watsonx_url: read(WATSONX_URL_ENV).unwrap_or_else(|| DEFAULT_WATSONX_URL.to_string()),
            model_id: read(FOUNDATION_MODEL_ID_ENV)
                .unwrap_or_else(|| DEFAULT_FOUNDATION_MODEL_ID.to_string()),
            request_timeout: Duration::from_secs(60),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Checks that both providers can be built.
    ///
    /// A missing language model is a configuration error, not a silent skip.
    ///
    /// # Errors
    ///
    /// Returns an error naming every missing variable.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let missing: Vec<String> = [
            (TAVILY_API_KEY_ENV, self.tavily_api_key.is_none()),
            (WATSONX_API_KEY_ENV, self.watsonx_api_key.is_none()),
            (WATSONX_PROJECT_ID_ENV, self.watsonx_project_id.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| name.to_string())
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError::missing(missing))
        }
    }

    /// Returns the validated watsonx settings.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing.
    pub fn watsonx(&self) -> Result<WatsonxSettings, ConfigurationError> {
        match (&self.watsonx_api_key, &self.watsonx_project_id) {
            (Some(api_key), Some(project_id)) => Ok(WatsonxSettings {
                api_key: api_key.clone(),
                project_id: project_id.clone(),
                url: self.watsonx_url.clone(),
                model_id: self.model_id.clone(),
                parameters: GenerationParameters::default(),
            }),
            _ => Err(ConfigurationError::missing(vec![
                WATSONX_API_KEY_ENV.to_string(),
                WATSONX_PROJECT_ID_ENV.to_string(),
            ])),
        }
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("tavily_api_key", &self.tavily_api_key.as_ref().map(|_| "<redacted>"))
            .field("watsonx_api_key", &self.watsonx_api_key.as_ref().map(|_| "<redacted>"))
            .field("watsonx_project_id", &self.watsonx_project_id)
            .field("watsonx_url", &self.watsonx_url)
            .field("model_id", &self.model_id)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
