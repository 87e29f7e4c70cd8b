//! Time-bounded memoization of marketplace search results.
//!
//! The product cache maps a search term to the full listing sequence the marketplace
//! returned for it, so repeated lookups inside the TTL window skip the network.
//! One cache instance is shared by every resolver for the life of the process.

mod in_memory;

pub use in_memory::{InMemoryCache, DEFAULT_SWEEP_THRESHOLD};

use async_trait::async_trait;

use crate::catalog::Listing;

/// Default lifetime of a cached search result.
pub const DEFAULT_PRODUCT_TTL: std::time::Duration = std::time::Duration::from_secs(60 * 60);

/// Key-value cache whose entries expire after a TTL fixed by the implementation.
#[async_trait]
pub trait Cache<K, V>: Send + Sync
where
    K: Send + Sync,
    V: Clone + Send + Sync,
{
    /// Returns the value stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &K) -> Option<V>;

    /// Stores `value` under `key`, replacing any previous entry and restarting its TTL.
    async fn set(&self, key: K, value: V);
}

/// Cache of search term → listings, as used by [`crate::ProductResolver`].
pub type ProductCache = dyn Cache<String, Vec<Listing>>;
