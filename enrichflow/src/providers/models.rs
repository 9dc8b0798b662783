//! Data models exchanged with search providers.

use serde::{Deserialize, Serialize};

/// How thorough a web search should be.
///
/// Deeper searches trade latency for better snippets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    /// Fast, shallow search.
    Basic,
    /// Slower search with richer content snippets.
    #[default]
    Advanced,
}

impl SearchDepth {
    /// Wire name understood by search APIs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a search response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// Page URL.
    #[serde(default)]
    pub url: String,
    /// Content snippet used as extraction evidence.
    #[serde(default)]
    pub content: String,
    /// Relevance score, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl SearchHit {
    /// Creates a new hit.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            score: None,
        }
    }

    /// Sets the relevance score.
    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// Structured response of a search call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    /// The query as echoed by the provider.
    #[serde(default)]
    pub query: String,
    /// Ordered result entries.
    #[serde(default)]
    pub results: Vec<SearchHit>,
    /// Upstream processing time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
}

impl SearchResponse {
    /// Creates a response for a query.
    #[must_use]
    pub fn new(query: impl Into<String>, results: Vec<SearchHit>) -> Self {
        Self {
            query: query.into(),
            results,
            response_time: None,
        }
    }

    /// Returns true if the provider found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Content snippets in result order.
    pub fn contents(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|hit| hit.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_depth_wire_names() {
        assert_eq!(SearchDepth::Basic.as_str(), "basic");
        assert_eq!(SearchDepth::Advanced.to_string(), "advanced");
        assert_eq!(SearchDepth::default(), SearchDepth::Advanced);

        let json = serde_json::to_string(&SearchDepth::Advanced).unwrap();
        assert_eq!(json, r#""advanced""#);
    }

    #[test]
    fn test_search_hit_tolerates_missing_fields() {
        let hit: SearchHit = serde_json::from_str(r#"{"url": "https://a.example"}"#).unwrap();

        assert_eq!(hit.url, "https://a.example");
        assert!(hit.title.is_empty());
        assert!(hit.content.is_empty());
        assert!(hit.score.is_none());
    }

    #[test]
    fn test_contents_preserve_order() {
        let response = SearchResponse::new(
            "CEO of Amazon?",
            vec![
                SearchHit::new("One", "https://1.example", "first"),
                SearchHit::new("Two", "https://2.example", "second"),
            ],
        );

        assert_eq!(response.contents().collect::<Vec<_>>(), vec!["first", "second"]);
        assert!(!response.is_empty());
    }
}
