//! Scriptable in-memory providers.
//!
//! Both stubs identify the row a call belongs to by the target value embedded
//! in the query or prompt, so a single instance can script a whole batch.
//! Clones share their call records.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{LanguageModelProvider, SearchDepth, SearchHit, SearchProvider, SearchResponse};

const STUB: &str = "stub";

/// Extracts `target` from a `"{column} of {target}?"` query.
fn query_target(query: &str) -> &str {
    let query = query.strip_suffix('?').unwrap_or(query);
    query.split_once(" of ").map_or(query, |(_, target)| target)
}

/// A search provider returning scripted hits per target.
#[derive(Debug, Clone)]
pub struct StubSearchProvider {
    hits: HashMap<String, Vec<SearchHit>>,
    default_hits: usize,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    fail_all: bool,
    latency: HashMap<String, Duration>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl Default for StubSearchProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl StubSearchProvider {
    /// Creates a stub that answers every query with two generated hits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hits: HashMap::new(),
            default_hits: 2,
            failing: HashSet::new(),
            panicking: HashSet::new(),
            fail_all: false,
            latency: HashMap::new(),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Scripts the hits returned for one target.
    #[must_use]
    pub fn with_hits(mut self, target: impl Into<String>, hits: Vec<SearchHit>) -> Self {
        self.hits.insert(target.into(), hits);
        self
    }

    /// Sets how many hits unscripted targets get.
    #[must_use]
    pub fn with_default_hits(mut self, count: usize) -> Self {
        self.default_hits = count;
        self
    }

    /// Makes searches for one target fail.
    #[must_use]
    pub fn failing_for(mut self, target: impl Into<String>) -> Self {
        self.failing.insert(target.into());
        self
    }

    /// Makes searches for one target panic.
    #[must_use]
    pub fn panicking_for(mut self, target: impl Into<String>) -> Self {
        self.panicking.insert(target.into());
        self
    }

    /// Makes every search fail.
    #[must_use]
    pub fn always_failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Delays searches for one target.
    #[must_use]
    pub fn with_latency(mut self, target: impl Into<String>, delay: Duration) -> Self {
        self.latency.insert(target.into(), delay);
        self
    }

    /// Queries received so far, in arrival order.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }

    /// Number of searches issued.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.queries.lock().len()
    }

    fn generated_hits(&self, target: &str) -> Vec<SearchHit> {
        (0..self.default_hits)
            .map(|i| {
                SearchHit::new(
                    format!("{target} result {i}"),
                    format!("https://stub.example/{}/{i}", target.replace(' ', "-")),
                    format!("Snippet {i} about {target}."),
                )
            })
            .collect()
    }
}

#[async_trait]
impl SearchProvider for StubSearchProvider {
    async fn search(
        &self,
        query: &str,
        _depth: SearchDepth,
        max_results: usize,
    ) -> Result<SearchResponse, ProviderError> {
        self.queries.lock().push(query.to_string());
        let target = query_target(query);

        if let Some(delay) = self.latency.get(target) {
            tokio::time::sleep(*delay).await;
        }
        assert!(!self.panicking.contains(target), "stub search panicked for {target}");
        if self.fail_all || self.failing.contains(target) {
            return Err(ProviderError::search(STUB, format!("search unavailable for {target}")));
        }

        let mut results = self
            .hits
            .get(target)
            .cloned()
            .unwrap_or_else(|| self.generated_hits(target));
        results.truncate(max_results);
        Ok(SearchResponse::new(query, results))
    }
}

/// A language model returning scripted answers per target.
#[derive(Debug, Clone)]
pub struct StubLanguageModel {
    default_answer: String,
    answers: HashMap<String, String>,
    failing: HashSet<String>,
    fail_all: bool,
    latency: Option<Duration>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Default for StubLanguageModel {
    fn default() -> Self {
        Self::new()
    }
}

impl StubLanguageModel {
    /// Creates a stub answering every prompt with "Stub answer".
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_answer: "Stub answer".to_string(),
            answers: HashMap::new(),
            failing: HashSet::new(),
            fail_all: false,
            latency: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sets the answer for unscripted targets.
    #[must_use]
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.default_answer = answer.into();
        self
    }

    /// Scripts the answer for one target.
    #[must_use]
    pub fn with_answer_for(mut self, target: impl Into<String>, answer: impl Into<String>) -> Self {
        self.answers.insert(target.into(), answer.into());
        self
    }

    /// Makes generation for one target fail.
    #[must_use]
    pub fn failing_for(mut self, target: impl Into<String>) -> Self {
        self.failing.insert(target.into());
        self
    }

    /// Makes every generation fail.
    #[must_use]
    pub fn always_failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Delays every generation.
    #[must_use]
    pub fn with_latency(mut self, delay: Duration) -> Self {
        self.latency = Some(delay);
        self
    }

    /// Prompts received so far, in arrival order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Number of generations requested.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

fn prompt_mentions(prompt: &str, target: &str) -> bool {
    prompt.contains(&format!(" of {target} from"))
}

#[async_trait]
impl LanguageModelProvider for StubLanguageModel {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().push(prompt.to_string());

        if let Some(delay) = self.latency {
            tokio::time::sleep(delay).await;
        }
        if self.fail_all || self.failing.iter().any(|t| prompt_mentions(prompt, t)) {
            return Err(ProviderError::generate(STUB, "generation unavailable"));
        }

        let answer = self
            .answers
            .iter()
            .find(|(target, _)| prompt_mentions(prompt, target))
            .map_or(&self.default_answer, |(_, answer)| answer);
        Ok(answer.clone())
    }
}
