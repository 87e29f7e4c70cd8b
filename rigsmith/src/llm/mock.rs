//! Scripted LLM for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmClient, LlmError, LlmResponse, LlmUsage};
use crate::message::Message;

/// Replays a fixed script of replies, one per call, and records every request.
///
/// Once the script is exhausted each further call fails with [`LlmError::Request`], so a test
/// that expects exactly N calls fails loudly on the N+1st.
pub struct MockLlm {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<Vec<Message>>>,
    usage: Option<LlmUsage>,
}

impl MockLlm {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            usage: None,
        }
    }

    /// Reports `usage` on every successful reply.
    pub fn with_usage(mut self, usage: LlmUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Mock whose calls succeed with the given texts, in order.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Number of `invoke` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Message lists received, one per call.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }
        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());
        match next {
            Some(reply) => reply.map(|content| LlmResponse {
                content,
                usage: self.usage.clone(),
            }),
            None => Err(LlmError::Request("mock script exhausted".to_string())),
        }
    }
}
