//! Capability traits for the two external collaborators of a pipeline run.
//!
//! Anything that can search or generate satisfies the respective role;
//! concrete providers are injected as `Arc<dyn …>` and must tolerate
//! concurrent calls from many rows at once.

use async_trait::async_trait;

use super::models::{SearchDepth, SearchResponse};
use crate::errors::ProviderError;

/// Protocol for web search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Runs a search and returns at most `max_results` entries.
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: usize,
    ) -> Result<SearchResponse, ProviderError>;
}

/// Protocol for text generation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageModelProvider: Send + Sync {
    /// Generates a completion for `prompt`.
    ///
    /// Callers trim the returned text; providers may return it raw.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::SearchHit;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_search_provider_is_object_safe() {
        let mut mock = MockSearchProvider::new();
        mock.expect_search()
            .withf(|query, depth, max| {
                query == "CEO of Amazon?" && *depth == SearchDepth::Advanced && *max == 5
            })
            .times(1)
            .returning(|query, _, _| {
                Ok(SearchResponse::new(
                    query,
                    vec![SearchHit::new("Amazon", "https://amazon.example", "Andy Jassy")],
                ))
            });

        let provider: Arc<dyn SearchProvider> = Arc::new(mock);
        let response = provider
            .search("CEO of Amazon?", SearchDepth::Advanced, 5)
            .await
            .unwrap();

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.query, "CEO of Amazon?");
    }

    #[tokio::test]
    async fn test_language_model_error_passthrough() {
        let mut mock = MockLanguageModelProvider::new();
        mock.expect_generate()
            .returning(|_| Err(ProviderError::generate("mock", "inference failed")));

        let provider: Arc<dyn LanguageModelProvider> = Arc::new(mock);
        let err = provider.generate("prompt").await.unwrap_err();

        assert_eq!(err.provider, "mock");
    }
}
