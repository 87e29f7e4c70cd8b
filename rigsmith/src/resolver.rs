//! Free-text component name → single best marketplace listing.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cache::ProductCache;
use crate::catalog::Listing;
use crate::fetch::RateLimitedFetcher;
use crate::marketplace::MarketplaceConfig;
use crate::matching::best_match;

/// Resolves a search term to one listing, or `None` when nothing purchasable was found.
///
/// Implementations are fail-soft: lookup errors are absorbed and reported as `None`.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn resolve(&self, term: &str) -> Option<Listing>;
}

/// Marketplace-backed [`ProductLookup`] with a shared cache and fetcher.
///
/// On a cache miss the term is searched through the [`RateLimitedFetcher`]; a JSON answer is
/// projected into listings and cached in full before the best match is chosen. Non-JSON
/// answers and fetch errors count as zero results and are not cached.
pub struct ProductResolver {
    fetcher: Arc<RateLimitedFetcher>,
    cache: Arc<ProductCache>,
    marketplace: MarketplaceConfig,
}

impl ProductResolver {
    pub fn new(
        fetcher: Arc<RateLimitedFetcher>,
        cache: Arc<ProductCache>,
        marketplace: MarketplaceConfig,
    ) -> Self {
        Self {
            fetcher,
            cache,
            marketplace,
        }
    }

    /// All listings the marketplace offers for `term`, from cache when fresh.
    pub async fn search(&self, term: &str) -> Vec<Listing> {
        if let Some(listings) = self.cache.get(&term.to_string()).await {
            debug!(term = %term, count = listings.len(), "product cache hit");
            return listings;
        }

        let url = match self.marketplace.search_url_for(term) {
            Ok(url) => url,
            Err(e) => {
                warn!(term = %term, error = %e, "invalid marketplace search url");
                return Vec::new();
            }
        };
        let response = match self.fetcher.fetch(&url, &self.marketplace.headers()).await {
            Ok(response) => response,
            Err(e) => {
                warn!(term = %term, error = %e, "marketplace search failed");
                return Vec::new();
            }
        };
        if !response.is_json() {
            debug!(
                term = %term,
                content_type = ?response.content_type,
                "marketplace returned non-JSON, treating as no results"
            );
            return Vec::new();
        }
        let listings = match self.marketplace.parse_listings(&response.body) {
            Ok(listings) => listings,
            Err(e) => {
                warn!(term = %term, error = %e, "unparseable marketplace JSON");
                return Vec::new();
            }
        };

        debug!(term = %term, count = listings.len(), "caching marketplace results");
        self.cache.set(term.to_string(), listings.clone()).await;
        listings
    }
}

#[async_trait]
impl ProductLookup for ProductResolver {
    async fn resolve(&self, term: &str) -> Option<Listing> {
        let listings = self.search(term).await;
        let picked = best_match(term, &listings);
        match &picked {
            Some(l) => debug!(term = %term, name = %l.name, price = l.price, "resolved listing"),
            None => debug!(term = %term, "no listing found"),
        }
        picked
    }
}
