//! Marketplace fetch errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Non-success status other than "too many requests"; never retried.
    #[error("unexpected http status {0}")]
    Status(u16),
    /// Still throttled after every allowed retry.
    #[error("max retries exceeded ({0} retries)")]
    MaxRetriesExceeded(usize),
    /// Connection, TLS, timeout or body read failure.
    #[error("transport error: {0}")]
    Transport(String),
}
