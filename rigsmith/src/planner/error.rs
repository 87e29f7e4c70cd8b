use std::time::Duration;

use crate::catalog::SpecError;
use crate::llm::LlmError;

/// Fatal failure of one build run. Marketplace trouble never shows up here; it degrades to
/// missing categories instead.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("budget must be a positive amount")]
    InvalidBudget,
    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),
    #[error("initial component list unusable: {0}")]
    InitialSpec(#[source] SpecError),
    #[error("adjusted component list unusable: {0}")]
    AdjustedSpec(#[source] SpecError),
    #[error("build did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}

impl BuildError {
    /// True for caller mistakes rather than internal failures.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidBudget)
    }
}
