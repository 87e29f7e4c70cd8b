//! Globally paced fetcher with exponential backoff on throttling.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{FetchError, HttpClient, RawResponse};
use crate::pacing::Pacer;
use crate::retry::BackoffPolicy;

/// Default minimum spacing between marketplace requests.
pub const DEFAULT_FETCH_INTERVAL: Duration = Duration::from_secs(5);

/// Process-wide marketplace fetcher.
///
/// Every attempt, retries included, first waits its turn on the shared [`Pacer`]. A `429`
/// response sleeps `backoff.delay(n)` and retries. The pacer slot is counted from the previous
/// attempt, so a backoff delay shorter than the spacing is absorbed by it; exhausting the policy yields
/// [`FetchError::MaxRetriesExceeded`]. Any other non-success status is returned as
/// [`FetchError::Status`] without retry.
///
/// Construct once and share through `Arc`; the spacing guarantee only holds across callers
/// that use the same instance.
pub struct RateLimitedFetcher {
    client: Arc<dyn HttpClient>,
    pacer: Pacer,
    backoff: BackoffPolicy,
}

impl RateLimitedFetcher {
    pub fn new(client: Arc<dyn HttpClient>, min_interval: Duration, backoff: BackoffPolicy) -> Self {
        Self {
            client,
            pacer: Pacer::new(min_interval),
            backoff,
        }
    }

    pub fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }

    pub fn min_interval(&self) -> Duration {
        self.pacer.min_interval()
    }

    pub async fn fetch(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<RawResponse, FetchError> {
        let mut retry = 0;
        loop {
            self.pacer.wait_turn().await;
            let response = self.client.get(url, headers).await?;

            if response.is_throttled() {
                if !self.backoff.should_retry(retry) {
                    warn!(url = %url, retries = retry, "marketplace still throttling, giving up");
                    return Err(FetchError::MaxRetriesExceeded(retry));
                }
                let delay = self.backoff.delay(retry);
                debug!(
                    url = %url,
                    retry = retry,
                    delay_ms = delay.as_millis() as u64,
                    "marketplace throttled, backing off"
                );
                tokio::time::sleep(delay).await;
                retry += 1;
                continue;
            }

            if !response.is_success() {
                return Err(FetchError::Status(response.status));
            }
            return Ok(response);
        }
    }
}
