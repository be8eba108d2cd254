//! Read-through memo of recent datasets.
//!
//! A repeated request with identical parameters inside the TTL window reuses
//! the stored dataset instead of hitting the feed again. Entries are immutable
//! snapshots behind an [`Arc`]; a refresh replaces the whole entry.
//!
//! Methods suffixed `_at` take the current [`Instant`] explicitly so expiry can
//! be tested without sleeping.

use crate::models::{Dataset, FeedRequest};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default time-to-live of a cached dataset.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Default number of distinct requests kept.
pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug)]
struct Entry {
    inserted_at: Instant,
    dataset: Arc<Dataset>,
}

/// Bounded LRU map from request parameters to datasets with TTL eviction.
#[derive(Debug)]
pub struct DatasetCache {
    ttl: Duration,
    /// `None` when the capacity is zero.
    entries: Option<LruCache<FeedRequest, Entry>>,
}

impl DatasetCache {
    /// A cache holding up to `capacity` entries for `ttl` each.
    ///
    /// A capacity of zero disables caching.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            entries: NonZeroUsize::new(capacity).map(LruCache::new),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&mut self, request: &FeedRequest) -> Option<Arc<Dataset>> {
        self.get_at(request, Instant::now())
    }

    /// Look up `request` as of `now`, evicting the entry if it has expired.
    /// A hit marks the entry as most recently used.
    pub fn get_at(&mut self, request: &FeedRequest, now: Instant) -> Option<Arc<Dataset>> {
        let ttl = self.ttl;
        let entries = self.entries.as_mut()?;
        let inserted_at = entries.peek(request)?.inserted_at;
        if now.saturating_duration_since(inserted_at) < ttl {
            debug!(query = %request.query, "Dataset cache hit");
            return entries.get(request).map(|e| Arc::clone(&e.dataset));
        }
        debug!(query = %request.query, "Dataset cache entry expired");
        entries.pop(request);
        None
    }

    pub fn insert(&mut self, request: FeedRequest, dataset: Arc<Dataset>) {
        self.insert_at(request, dataset, Instant::now());
    }

    /// Store `dataset` for `request` as of `now`.
    ///
    /// Expired entries are purged first; if the cache is still full the least
    /// recently used entry is evicted.
    pub fn insert_at(&mut self, request: FeedRequest, dataset: Arc<Dataset>, now: Instant) {
        let ttl = self.ttl;
        let Some(entries) = self.entries.as_mut() else {
            return;
        };

        let expired: Vec<FeedRequest> = entries
            .iter()
            .filter(|(_, e)| now.saturating_duration_since(e.inserted_at) >= ttl)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }

        let entry = Entry {
            inserted_at: now,
            dataset,
        };
        if let Some((evicted, _)) = entries.push(request.clone(), entry) {
            if evicted != request {
                debug!(query = %evicted.query, "Evicting least recently used dataset cache entry");
            }
        }
    }

    pub fn clear(&mut self) {
        if let Some(entries) = self.entries.as_mut() {
            entries.clear();
        }
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}
