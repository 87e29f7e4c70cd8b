//! Outbound marketplace HTTP: the [`HttpClient`] seam, its reqwest implementation, and the
//! process-wide [`RateLimitedFetcher`].

mod error;
mod limited;

pub use error::FetchError;
pub use limited::{RateLimitedFetcher, DEFAULT_FETCH_INTERVAL};

use std::time::Duration;

use async_trait::async_trait;

/// HTTP status the marketplace uses to throttle clients.
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Status, content type and body of one HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    /// `200 application/json` response with the given body.
    pub fn json(body: impl Into<String>) -> Self {
        Self::new(200, Some("application/json; charset=utf-8"), body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_throttled(&self) -> bool {
        self.status == STATUS_TOO_MANY_REQUESTS
    }

    /// True when the content type declares JSON (`application/json`, `application/*+json`).
    pub fn is_json(&self) -> bool {
        self.content_type.as_deref().is_some_and(|ct| {
            let mime = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
    }
}

/// Issues a GET and returns the raw response. Abstraction for testing.
///
/// Implementations report transport failures as [`FetchError::Transport`] and return every
/// HTTP status as a normal response; status policy lives in [`RateLimitedFetcher`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, headers: &[(String, String)]) -> Result<RawResponse, FetchError>;
}

/// Reqwest-based HTTP client. Reuses one connection pool for its lifetime.
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Client whose every request fails with a transport error after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &[(String, String)]) -> Result<RawResponse, FetchError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}
