//! The fixed two-stage state machine of a pipeline run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a pipeline run currently is.
///
/// `Start → Searching → Extracting → Done`. A failed search leaves the run in
/// `Searching`; a failed extraction still reaches `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Context created, nothing run yet.
    #[default]
    Start,
    /// Waiting on the search provider.
    Searching,
    /// Waiting on the language model.
    Extracting,
    /// Answer recorded.
    Done,
}

impl PipelineState {
    /// The state that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Start => Some(Self::Searching),
            Self::Searching => Some(Self::Extracting),
            Self::Extracting => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Returns true if the run has its terminal value.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true while a provider call is outstanding.
    #[must_use]
    pub const fn is_waiting(self) -> bool {
        matches!(self, Self::Searching | Self::Extracting)
    }

    /// Advances to `next`, panicking in debug builds on an illegal jump.
    #[must_use]
    pub fn advance(self) -> Self {
        let next = self.next();
        debug_assert!(next.is_some(), "cannot advance past {self}");
        next.unwrap_or(self)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Searching => write!(f, "searching"),
            Self::Extracting => write!(f, "extracting"),
            Self::Done => write!(f, "done"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_progression() {
        let mut state = PipelineState::default();
        let mut seen = vec![state];
        while let Some(next) = state.next() {
            state = next;
            seen.push(state);
        }

        assert_eq!(
            seen,
            vec![
                PipelineState::Start,
                PipelineState::Searching,
                PipelineState::Extracting,
                PipelineState::Done,
            ]
        );
    }

    #[test]
    fn test_terminal_and_waiting() {
        assert!(PipelineState::Done.is_terminal());
        assert!(!PipelineState::Extracting.is_terminal());
        assert!(PipelineState::Searching.is_waiting());
        assert!(PipelineState::Extracting.is_waiting());
        assert!(!PipelineState::Start.is_waiting());
    }

    #[test]
    fn test_advance() {
        assert_eq!(PipelineState::Start.advance(), PipelineState::Searching);
        assert_eq!(PipelineState::Extracting.advance(), PipelineState::Done);
    }

    #[test]
    fn test_state_serialize() {
        let json = serde_json::to_string(&PipelineState::Extracting).unwrap();
        assert_eq!(json, r#""extracting""#);
        assert_eq!(PipelineState::Searching.to_string(), "searching");
    }
}
