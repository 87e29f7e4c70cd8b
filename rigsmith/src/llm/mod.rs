//! Generative-text provider abstraction.
//!
//! The planner only needs one capability from a provider: take an ordered message list and
//! return the reply text. [`LlmClient`] is that seam; [`ChatOpenAI`] talks to any
//! OpenAI-compatible chat completions endpoint and [`MockLlm`] replays scripted replies
//! in tests.

mod mock;
mod openai;

pub use mock::MockLlm;
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::message::Message;

/// Token usage for one call, when the provider reports it.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl LlmUsage {
    /// Adds `other` into `self`, saturating.
    pub fn accumulate(&mut self, other: &LlmUsage) {
        self.prompt_tokens = self.prompt_tokens.saturating_add(other.prompt_tokens);
        self.completion_tokens = self.completion_tokens.saturating_add(other.completion_tokens);
        self.total_tokens = self.total_tokens.saturating_add(other.total_tokens);
    }
}

/// Reply of one generation call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LlmResponse {
    /// Reply text; may contain code fences or prose around the JSON the planner wants.
    pub content: String,
    pub usage: Option<LlmUsage>,
}

impl LlmResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    /// Request could not be built or the provider call failed.
    #[error("generation request failed: {0}")]
    Request(String),
    /// Provider answered without any choice or text.
    #[error("generation returned no content")]
    EmptyResponse,
}

/// Sends an ordered message list to a text-generation provider.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, LlmError>;
}
