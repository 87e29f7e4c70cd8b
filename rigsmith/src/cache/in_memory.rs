//! In-memory TTL cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use super::Cache;

/// Entry count at which [`Cache::set`] first sweeps expired entries.
pub const DEFAULT_SWEEP_THRESHOLD: usize = 1024;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// In-memory cache with a fixed TTL measured from insertion.
///
/// Expired entries read as absent and are dropped on that read. Once the map reaches the sweep
/// threshold, `set` also drops every expired entry; the threshold then moves to twice the
/// surviving count, so a map of live entries is not rescanned on every insert. Readers share
/// the lock, writers take it exclusively; a racing miss only costs a redundant fetch.
///
/// # Example
///
/// ```rust
/// use rigsmith::cache::{Cache, InMemoryCache};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = InMemoryCache::new(Duration::from_secs(3600));
/// cache.set("term".to_string(), 42u32).await;
/// assert_eq!(cache.get(&"term".to_string()).await, Some(42));
/// # }
/// ```
pub struct InMemoryCache<K, V> {
    ttl: Duration,
    sweep_threshold: usize,
    /// Only read or written while holding the write lock on `data`.
    next_sweep: AtomicUsize,
    data: Arc<RwLock<HashMap<K, CacheEntry<V>>>>,
}

impl<K, V> InMemoryCache<K, V>
where
    K: std::hash::Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        Self::with_sweep_threshold(ttl, DEFAULT_SWEEP_THRESHOLD)
    }

    /// Like [`InMemoryCache::new`], sweeping on `set` from `threshold` entries (at least 1).
    pub fn with_sweep_threshold(ttl: Duration, threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            ttl,
            sweep_threshold: threshold,
            next_sweep: AtomicUsize::new(threshold),
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, expired ones included until they are read or purged.
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    /// Drops every expired entry. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut data = self.data.write().await;
        self.sweep(&mut data, Instant::now())
    }

    fn sweep(&self, data: &mut HashMap<K, CacheEntry<V>>, now: Instant) -> usize {
        let before = data.len();
        data.retain(|_, entry| !entry.is_expired(now));
        let next = (data.len() * 2).max(self.sweep_threshold);
        self.next_sweep.store(next, Ordering::Relaxed);
        before - data.len()
    }
}

#[async_trait::async_trait]
impl<K, V> Cache<K, V> for InMemoryCache<K, V>
where
    K: std::hash::Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        {
            let data = self.data.read().await;
            match data.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }
        let mut data = self.data.write().await;
        // Re-check: a writer may have refreshed the entry between the two locks.
        if data.get(key).is_some_and(|entry| entry.is_expired(now)) {
            data.remove(key);
        }
        None
    }

    async fn set(&self, key: K, value: V) {
        let now = Instant::now();
        let entry = CacheEntry {
            value,
            expires_at: now + self.ttl,
        };
        let mut data = self.data.write().await;
        if data.len() >= self.next_sweep.load(Ordering::Relaxed) {
            let removed = self.sweep(&mut data, now);
            tracing::debug!(removed, remaining = data.len(), "swept expired cache entries");
        }
        data.insert(key, entry);
    }
}
