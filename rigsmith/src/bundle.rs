//! Multi-category resolution and the resulting [`Bundle`].

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::catalog::{Category, ComponentSpec, Listing};
use crate::pacing::PacedQueue;
use crate::resolver::ProductLookup;

/// Default minimum spacing between bundle-level resolution batches.
pub const DEFAULT_BATCH_INTERVAL: Duration = Duration::from_secs(5);

/// Default allowed relative deviation of the total from the target budget.
pub const DEFAULT_BUDGET_TOLERANCE: f64 = 0.10;

/// Category → resolved listing, or `None` when the category could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bundle {
    items: BTreeMap<Category, Option<Listing>>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category, listing: Option<Listing>) {
        self.items.insert(category, listing);
    }

    pub fn get(&self, category: Category) -> Option<&Listing> {
        self.items.get(&category).and_then(Option::as_ref)
    }

    /// Whether the category is tracked at all, resolved or not.
    pub fn contains(&self, category: Category) -> bool {
        self.items.contains_key(&category)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn resolved(&self) -> impl Iterator<Item = (Category, &Listing)> {
        self.items
            .iter()
            .filter_map(|(c, l)| l.as_ref().map(|l| (*c, l)))
    }

    /// Resolved entries only, as returned to callers.
    pub fn products(&self) -> BTreeMap<Category, Listing> {
        self.resolved().map(|(c, l)| (c, l.clone())).collect()
    }

    /// Categories whose resolution yielded no listing.
    pub fn missing(&self) -> Vec<Category> {
        self.items
            .iter()
            .filter(|(_, l)| l.is_none())
            .map(|(c, _)| *c)
            .collect()
    }

    /// Sum of resolved prices.
    pub fn total(&self) -> u64 {
        self.resolved().map(|(_, l)| l.price).sum()
    }

    /// `|total - budget| / budget`; infinite for a zero budget.
    pub fn deviation(&self, budget: u64) -> f64 {
        if budget == 0 {
            return f64::INFINITY;
        }
        (self.total() as f64 - budget as f64).abs() / budget as f64
    }

    /// No missing categories and the total within `tolerance` of `budget`.
    pub fn is_acceptable(&self, budget: u64, tolerance: f64) -> bool {
        self.missing().is_empty() && self.deviation(budget) <= tolerance
    }

    /// Copies every resolved entry of `other` over this bundle. Unresolved entries of `other`
    /// never clear an existing listing. Returns the categories that were written.
    pub fn merge_resolved(&mut self, other: Bundle) -> Vec<Category> {
        let mut written = Vec::new();
        for (category, listing) in other.items {
            if let Some(listing) = listing {
                self.items.insert(category, Some(listing));
                written.push(category);
            }
        }
        written
    }
}

/// Resolves every category of a mapping through a [`ProductLookup`].
///
/// Batches pass one at a time through a [`PacedQueue`] so an adjustment batch never races the
/// initial one. Inside a batch each category runs as its own task; a task that yields `None`
/// or fails leaves its category missing without affecting the others.
pub struct BundleResolver {
    lookup: Arc<dyn ProductLookup>,
    queue: PacedQueue,
}

impl BundleResolver {
    pub fn new(lookup: Arc<dyn ProductLookup>, batch_interval: Duration) -> Self {
        Self {
            lookup,
            queue: PacedQueue::new(batch_interval),
        }
    }

    pub async fn resolve_bundle(&self, spec: &ComponentSpec) -> Bundle {
        self.resolve_entries(spec.entries()).await
    }

    /// Resolves the given entries. An entry without a term is recorded as missing without a
    /// lookup.
    pub async fn resolve_entries(&self, entries: Vec<(Category, Option<String>)>) -> Bundle {
        let _turn = self.queue.enter().await;
        let started = Instant::now();

        let mut bundle = Bundle::new();
        let mut tasks = JoinSet::new();
        for (category, term) in entries {
            bundle.insert(category, None);
            let Some(term) = term else {
                debug!(category = %category, "no search term, leaving category unresolved");
                continue;
            };
            let lookup = Arc::clone(&self.lookup);
            tasks.spawn(async move {
                let listing = lookup.resolve(&term).await;
                (category, listing)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((category, listing)) => {
                    if listing.is_none() {
                        warn!(category = %category, "component not found on marketplace");
                    }
                    bundle.insert(category, listing);
                }
                Err(e) => error!(error = %e, "component resolution task failed"),
            }
        }

        debug!(
            resolved = bundle.resolved().count(),
            missing = bundle.missing().len(),
            total = bundle.total(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "bundle batch complete"
        );
        bundle
    }
}
