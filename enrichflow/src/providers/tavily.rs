//! Tavily web search over HTTP.

use async_trait::async_trait;
use std::time::Duration;

use super::models::{SearchDepth, SearchHit, SearchResponse};
use super::protocols::SearchProvider;
use crate::errors::ProviderError;

/// Default Tavily search endpoint.
pub const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

const PROVIDER: &str = "tavily";

/// Search provider backed by the Tavily API.
#[derive(Debug, Clone)]
pub struct TavilySearchProvider {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl TavilySearchProvider {
    /// Creates a provider with the default endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::search(PROVIDER, format!("http client: {e}")))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            endpoint: TAVILY_SEARCH_URL.to_string(),
        })
    }

    /// Overrides the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Builds the JSON request body for a query.
    #[must_use]
    pub fn request_body(query: &str, depth: SearchDepth, max_results: usize) -> serde_json::Value {
        serde_json::json!({
            "query": query,
            "search_depth": depth.as_str(),
            "max_results": max_results,
            "include_answer": false,
            "include_raw_content": false,
        })
    }

    /// Parses a Tavily response payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload has no `results` array.
    pub fn parse_response(
        query: &str,
        payload: &serde_json::Value,
    ) -> Result<SearchResponse, ProviderError> {
        let results = payload
            .get("results")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ProviderError::search(PROVIDER, "missing results array"))?;

        let hits = results
            .iter()
            .map(|row| SearchHit {
                title: row
                    .get("title")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                url: row
                    .get("url")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                content: row
                    .get("content")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                score: row.get("score").and_then(serde_json::Value::as_f64),
            })
            .collect();

        Ok(SearchResponse {
            query: payload
                .get("query")
                .and_then(|v| v.as_str())
                .unwrap_or(query)
                .to_string(),
            results: hits,
            response_time: payload.get("response_time").and_then(serde_json::Value::as_f64),
        })
    }
}

#[async_trait]
impl SearchProvider for TavilySearchProvider {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: usize,
    ) -> Result<SearchResponse, ProviderError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&Self::request_body(query, depth, max_results))
            .send()
            .await
            .map_err(|e| ProviderError::search(PROVIDER, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::search(PROVIDER, format!("status {status}: {body}"))
                .with_status(status.as_u16()));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::search(PROVIDER, format!("invalid payload: {e}")))?;

        Self::parse_response(query, &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_body() {
        let body = TavilySearchProvider::request_body("CEO of Amazon?", SearchDepth::Advanced, 5);

        assert_eq!(body["query"], "CEO of Amazon?");
        assert_eq!(body["search_depth"], "advanced");
        assert_eq!(body["max_results"], 5);
        assert_eq!(body["include_answer"], false);
    }

    #[test]
    fn test_parse_response() {
        let payload = serde_json::json!({
            "query": "CEO of Amazon?",
            "response_time": 1.42,
            "results": [
                {
                    "title": "Andy Jassy - Wikipedia",
                    "url": " https://en.wikipedia.org/wiki/Andy_Jassy ",
                    "content": "Andy Jassy is the president and CEO of Amazon.",
                    "score": 0.98
                },
                { "title": "Amazon leadership", "url": "https://amazon.example/leaders" }
            ]
        });

        let response = TavilySearchProvider::parse_response("ignored", &payload).unwrap();

        assert_eq!(response.query, "CEO of Amazon?");
        assert_eq!(response.response_time, Some(1.42));
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].url, "https://en.wikipedia.org/wiki/Andy_Jassy");
        assert_eq!(response.results[0].score, Some(0.98));
        assert_eq!(response.results[1].content, "");
    }

    #[test]
    fn test_parse_response_falls_back_to_sent_query() {
        let payload = serde_json::json!({ "results": [] });
        let response = TavilySearchProvider::parse_response("CEO of Tesla?", &payload).unwrap();

        assert_eq!(response.query, "CEO of Tesla?");
        assert!(response.is_empty());
    }

    #[test]
    fn test_parse_response_without_results_fails() {
        let payload = serde_json::json!({ "detail": "Unauthorized" });
        let err = TavilySearchProvider::parse_response("q", &payload).unwrap_err();

        assert_eq!(err.provider, "tavily");
        assert!(err.message.contains("results"));
    }
}
