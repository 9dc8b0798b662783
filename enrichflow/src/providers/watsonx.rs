//! IBM watsonx.ai text generation over HTTP.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::protocols::LanguageModelProvider;
use crate::config::WatsonxSettings;
use crate::errors::{ProviderError, ProviderOperation};

/// IAM endpoint exchanging an API key for a bearer token.
pub const IBM_IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";

/// Text generation API version pinned by this client.
pub const GENERATION_API_VERSION: &str = "2023-05-29";

const PROVIDER: &str = "watsonx";

/// Tokens are refreshed this long before they expire.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when the IAM payload omits or garbles `expires_in`.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn expiring_in(value: String, expires_in: u64) -> Self {
        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(expires_in))
            .unwrap_or(now + DEFAULT_TOKEN_LIFETIME);
        Self { value, expires_at }
    }

    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

/// Language model provider backed by a watsonx.ai foundation model.
pub struct WatsonxLanguageModel {
    http: reqwest::Client,
    settings: WatsonxSettings,
    iam_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for WatsonxLanguageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatsonxLanguageModel")
            .field("settings", &self.settings)
            .field("iam_url", &self.iam_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl WatsonxLanguageModel {
    /// Creates a provider from settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(settings: WatsonxSettings, timeout: Duration) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::generate(PROVIDER, format!("http client: {e}")))?;

        Ok(Self {
            http,
            settings,
            iam_url: IBM_IAM_TOKEN_URL.to_string(),
            token: Mutex::new(None),
        })
    }

    /// Overrides the IAM token endpoint.
    #[must_use]
    pub fn with_iam_url(mut self, url: impl Into<String>) -> Self {
        self.iam_url = url.into();
        self
    }

    /// The generation endpoint for the configured region.
    #[must_use]
    pub fn generation_url(&self) -> String {
        format!(
            "{}/ml/v1/text/generation?version={GENERATION_API_VERSION}",
            self.settings.url.trim_end_matches('/')
        )
    }

    /// Builds the JSON request body for a prompt.
    #[must_use]
    pub fn request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "input": prompt,
            "model_id": self.settings.model_id,
            "project_id": self.settings.project_id,
            "parameters": self.settings.parameters,
        })
    }

    /// Extracts the generated text from a generation payload.
    ///
    /// # Errors
    ///
    /// Returns an error if no generated text is present.
    pub fn parse_generation(payload: &serde_json::Value) -> Result<String, ProviderError> {
        payload
            .get("results")
            .and_then(|v| v.as_array())
            .and_then(|results| results.first())
            .and_then(|first| first.get("generated_text"))
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| ProviderError::generate(PROVIDER, "missing results[0].generated_text"))
    }

    fn token_request(&self) -> reqwest::RequestBuilder {
        self.http
            .post(&self.iam_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", "urn:ibm:params:oauth:grant-type:apikey"),
                ("apikey", self.settings.api_key.as_str()),
            ])
    }

    async fn bearer_token(&self) -> Result<String, ProviderError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let auth_err =
            |msg: String| ProviderError::new(PROVIDER, ProviderOperation::Authenticate, msg);

        let response = self
            .token_request()
            .send()
            .await
            .map_err(|e| auth_err(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(auth_err(format!("status {status}")).with_status(status.as_u16()));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| auth_err(format!("invalid payload: {e}")))?;
        let value = payload
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| auth_err("missing access_token".to_string()))?
            .to_string();
        let expires_in = payload
            .get("expires_in")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME.as_secs());

        tracing::debug!(expires_in, "Refreshed watsonx IAM token");
        *guard = Some(CachedToken::expiring_in(value.clone(), expires_in));
        Ok(value)
    }
}

#[async_trait]
impl LanguageModelProvider for WatsonxLanguageModel {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let token = self.bearer_token().await?;

        let response = self
            .http
            .post(self.generation_url())
            .bearer_auth(token)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| ProviderError::generate(PROVIDER, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::generate(PROVIDER, format!("status {status}: {body}"))
                .with_status(status.as_u16()));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::generate(PROVIDER, format!("invalid payload: {e}")))?;

        Self::parse_generation(&payload).map(|text| text.trim().to_string())
    }
}
