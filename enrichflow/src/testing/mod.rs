//! Testing utilities for enrichflow.
//!
//! This module provides in-memory providers with scripted hits, answers,
//! failures and latency, for exercising the pipeline and orchestrator
//! without network access.

mod stubs;

pub use stubs::{StubLanguageModel, StubSearchProvider};
