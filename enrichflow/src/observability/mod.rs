//! Observability utilities.

mod subscriber;
mod timing;

pub use subscriber::{env_filter, init_tracing, LogFormat, DEFAULT_LOG_FILTER};
pub use timing::{BatchTimings, SpanTimer};
