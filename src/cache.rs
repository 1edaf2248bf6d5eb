//! Response cache for upstream API reads.
//!
//! Keyed by request signature (URL plus canonical query string), with a fixed
//! time-to-live per entry. Expired entries are treated as absent; every insert
//! also sweeps them out, so the map never outgrows the live working set by
//! more than one TTL window.
//!
//! Only the bulk contributor walk reads through this cache; the interactive
//! endpoints always go straight to the API so they reflect current state.
//!
//! Two callers missing on the same key at the same moment both fetch; the
//! later insert wins. Values are replaced whole, never patched.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Time source for entry expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

pub struct ResponseCache<V = serde_json::Value> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Live value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.lock();
        if let Some(entry) = entries.get(key) {
            if self.is_live(entry, now) {
                return Some(entry.value.clone());
            }
        }
        entries.remove(key);
        None
    }

    /// Store `value` under `key`, dropping every expired entry first.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| self.is_live(entry, now));
        let purged = before - entries.len();
        if purged > 0 {
            tracing::debug!(purged, "dropped expired cache entries");
        }
        entries.insert(
            key.into(),
            CacheEntry {
                value,
                inserted_at: now,
            },
        );
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    ///
    /// Errors from `fetch` are returned unchanged and nothing is stored.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key, "cache hit");
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(key, "cache miss");

        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Get cache statistics for debugging
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.lock();
        CacheStats {
            entries: entries.len(),
            live_entries: entries.values().filter(|e| self.is_live(e, now)).count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            ttl_secs: self.ttl.as_secs(),
        }
    }

    fn is_live(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.duration_since(entry.inserted_at) < self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub live_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub ttl_secs: u64,
}
