//! Search and language-model providers.
//!
//! This module provides:
//! - Data models for search responses
//! - Protocol traits for pluggable providers
//! - HTTP-backed Tavily and watsonx.ai implementations (feature `http-providers`)

mod models;
mod protocols;
#[cfg(feature = "http-providers")]
mod tavily;
#[cfg(feature = "http-providers")]
mod watsonx;

pub use models::{SearchDepth, SearchHit, SearchResponse};
pub use protocols::{LanguageModelProvider, SearchProvider};
#[cfg(feature = "http-providers")]
pub use tavily::{TavilySearchProvider, TAVILY_SEARCH_URL};
#[cfg(feature = "http-providers")]
pub use watsonx::{WatsonxLanguageModel, GENERATION_API_VERSION, IBM_IAM_TOKEN_URL};

#[cfg(test)]
pub use protocols::{MockLanguageModelProvider, MockSearchProvider};
