//! Minimum-interval spacing for outbound work.
//!
//! One primitive, two uses: the fetcher spaces every marketplace request through a
//! shared [`Pacer`], and the bundle resolver admits one batch at a time through a
//! [`PacedQueue`], which pairs a single-holder gate with its own [`Pacer`]. Both are
//! long-lived and shared via `Arc`; building a new one per call loses the spacing.
//!
//! All timing goes through `tokio::time`, so tests can drive it with a paused clock.

use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;
use tracing::trace;

/// Spaces successive turns at least `min_interval` apart, across all callers.
///
/// A waiter reserves the next free slot under the lock and then sleeps without it,
/// so concurrent callers are queued into consecutive slots.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    /// Zero `min_interval` disables spacing.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until this caller's slot starts.
    pub async fn wait_turn(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(reserved) if reserved > now => reserved,
                _ => now,
            };
            *next = Some(slot + self.min_interval);
            slot
        };
        let wait = slot.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            trace!(wait_ms = wait.as_millis() as u64, "pacer waiting for slot");
            tokio::time::sleep_until(slot).await;
        }
    }
}

/// Admits one holder at a time; consecutive admissions are spaced by a [`Pacer`].
///
/// The guard returned by [`PacedQueue::enter`] keeps the queue closed until dropped.
#[derive(Debug)]
pub struct PacedQueue {
    turn: Mutex<()>,
    pacer: Pacer,
}

impl PacedQueue {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            turn: Mutex::new(()),
            pacer: Pacer::new(min_interval),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.pacer.min_interval()
    }

    /// Waits for the queue to be free and for the spacing interval, then holds it.
    pub async fn enter(&self) -> MutexGuard<'_, ()> {
        let guard = self.turn.lock().await;
        self.pacer.wait_turn().await;
        guard
    }
}
