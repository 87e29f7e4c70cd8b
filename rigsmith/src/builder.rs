//! Config-driven assembly of a [`Planner`] and its process-wide collaborators.

use std::sync::Arc;

use tracing::info;

use crate::bundle::BundleResolver;
use crate::cache::{InMemoryCache, ProductCache};
use crate::config::RigConfig;
use crate::fetch::{FetchError, HttpClient, RateLimitedFetcher, ReqwestHttpClient};
use crate::llm::LlmClient;
use crate::planner::Planner;
use crate::resolver::ProductResolver;

/// Builds a planner that talks to the real marketplace and provider described by `config`.
pub fn build_planner(config: &RigConfig) -> Result<Planner, FetchError> {
    let http = ReqwestHttpClient::with_timeout(config.marketplace.timeout())?;
    let llm = config.llm.client();
    info!(
        model = %config.llm.model,
        search_url = %config.marketplace.search_url,
        fetch_interval_ms = config.pacing.fetch_interval_ms,
        batch_interval_ms = config.pacing.batch_interval_ms,
        "planner configured"
    );
    Ok(build_planner_with(config, Arc::new(llm), Arc::new(http)))
}

/// Builds a planner from `config` around the given provider and HTTP client.
///
/// The fetcher, its pacer and the product cache are created here once; the returned planner
/// is meant to be shared for the life of the process.
pub fn build_planner_with(
    config: &RigConfig,
    llm: Arc<dyn LlmClient>,
    http: Arc<dyn HttpClient>,
) -> Planner {
    let fetcher = Arc::new(RateLimitedFetcher::new(
        http,
        config.pacing.fetch_interval(),
        config.retry.policy(),
    ));
    let cache: Arc<ProductCache> = Arc::new(InMemoryCache::new(config.cache.ttl()));
    let resolver = ProductResolver::new(fetcher, cache, config.marketplace.clone());
    let bundles = BundleResolver::new(Arc::new(resolver), config.pacing.batch_interval());
    Planner::new(llm, bundles, config.planner.clone())
}
