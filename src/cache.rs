//! Bounded result cache.
//!
//! Capacity- and time-bounded key→result store with least-recently-used
//! eviction, memoizing pipeline output per (page identity, output format).
//! One abstraction owns the entries and every piece of LRU/TTL bookkeeping;
//! callers only see get/set/delete/clear. The interior sits behind a single
//! mutex: a `get` is also a write (recency bump), so the cache serializes
//! all operations, which is what keeps the LRU and capacity invariants true
//! under concurrent use.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::patterns::PAGE_NAME_WHITESPACE;
use crate::result::{OutputFormat, RenderedOutput};

/// Composite cache key: normalized page identity plus output format. The
/// same page cached as html and as markdown occupies two independent
/// entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    page: String,
    format: OutputFormat,
}

impl CacheKey {
    /// Build a key from a raw page title. Whitespace runs and underscores
    /// are normalized to single underscores so "New  York" and "New_York"
    /// share an entry.
    #[must_use]
    pub fn new(page: &str, format: OutputFormat) -> Self {
        Self {
            page: normalize_page_name(page),
            format,
        }
    }
}

/// Normalize a page title into its stable cache identity.
#[must_use]
pub fn normalize_page_name(page: &str) -> String {
    PAGE_NAME_WHITESPACE
        .replace_all(page.trim(), "_")
        .into_owned()
}

/// Cache observability snapshot, for status endpoints owned elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub current_size: usize,
    pub max_size: usize,
    pub ttl_secs: u64,
}

struct CacheEntry {
    value: RenderedOutput,
    expires_at: Instant,
    last_access: u64,
}

struct CacheInner {
    map: HashMap<CacheKey, CacheEntry>,
    access_counter: u64,
}

/// Bounded LRU+TTL cache for pipeline results.
pub struct TransformCache {
    inner: Mutex<CacheInner>,
    enabled: bool,
    max_entries: usize,
    default_ttl: Duration,
}

impl TransformCache {
    #[must_use]
    pub fn new(enabled: bool, max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                map: HashMap::new(),
                access_counter: 0,
            }),
            enabled,
            max_entries: max_entries.max(1),
            default_ttl,
        }
    }

    /// Look up an entry. A hit bumps the entry to most-recently-used; an
    /// expired entry is removed and reported as absent. A miss is a normal
    /// control-flow value, never an error.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<RenderedOutput> {
        if !self.enabled {
            return None;
        }
        let mut inner = self.lock();
        let now = Instant::now();
        let expired = inner.map.get(key).is_some_and(|e| e.expires_at <= now);
        if expired {
            inner.map.remove(key);
            return None;
        }
        inner.access_counter += 1;
        let counter = inner.access_counter;
        let entry = inner.map.get_mut(key)?;
        entry.last_access = counter;
        Some(entry.value.clone())
    }

    /// Insert with the default TTL.
    pub fn set(&self, key: CacheKey, value: RenderedOutput) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Insert with an explicit TTL. Overwriting an existing key resets both
    /// its expiry and its LRU position. When the insert would exceed
    /// capacity, the least-recently-accessed entry is evicted first.
    pub fn set_with_ttl(&self, key: CacheKey, value: RenderedOutput, ttl: Duration) {
        if !self.enabled {
            return;
        }
        let mut inner = self.lock();
        let now = Instant::now();

        if !inner.map.contains_key(&key) && inner.map.len() >= self.max_entries {
            evict_lru(&mut inner);
        }

        inner.access_counter += 1;
        let counter = inner.access_counter;
        inner.map.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + ttl,
                last_access: counter,
            },
        );
    }

    /// Whether a live (non-expired) entry exists. Does not bump recency.
    #[must_use]
    pub fn has(&self, key: &CacheKey) -> bool {
        if !self.enabled {
            return false;
        }
        let inner = self.lock();
        inner
            .map
            .get(key)
            .is_some_and(|e| e.expires_at > Instant::now())
    }

    /// Remove one entry; reports whether it existed.
    pub fn delete(&self, key: &CacheKey) -> bool {
        let mut inner = self.lock();
        inner.map.remove(key).is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.map.clear();
    }

    /// Opportunistic sweep of expired entries. Not required for
    /// correctness (expiry is lazy on access) but bounds memory between
    /// accesses. Returns the number of entries removed.
    pub fn sweep_expired(&self) -> usize {
        let mut inner = self.lock();
        let now = Instant::now();
        let before = inner.map.len();
        inner.map.retain(|_, entry| entry.expires_at > now);
        before - inner.map.len()
    }

    /// Observability snapshot.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            enabled: self.enabled,
            current_size: inner.map.len(),
            max_size: self.max_entries,
            ttl_secs: self.default_ttl.as_secs(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner> {
        // A poisoned mutex only happens if a holder panicked; the map is
        // still structurally sound, so keep serving.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn evict_lru(inner: &mut CacheInner) {
    let victim = inner
        .map
        .iter()
        .min_by_key(|(_, entry)| entry.last_access)
        .map(|(key, _)| key.clone());
    if let Some(key) = victim {
        inner.map.remove(&key);
    }
}
