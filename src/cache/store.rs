//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, lazy TTL
//! expiration and tag-based invalidation.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Cache Config ==
/// Construction-time settings of a [`CacheStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL applied when `set` is called without one
    pub default_ttl: Duration,
    /// Maximum number of entries; values below 1 are treated as 1
    pub max_size: usize,
    /// When false every read misses and every write is dropped
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(5 * 60),
            max_size: 1000,
            enabled: true,
        }
    }
}

// == Cache Store ==
/// Bounded, expiring, tag-addressable key/value store.
///
/// Invariant: every key in `entries` appears exactly once in `lru` and the
/// tracker holds no other keys.
#[derive(Debug)]
pub struct CacheStore<T> {
    entries: HashMap<String, CacheEntry<T>>,
    lru: LruTracker,
    stats: CacheStats,
    config: CacheConfig,
}

impl<T: Clone> CacheStore<T> {
    // == Constructor ==
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            config: CacheConfig {
                max_size: config.max_size.max(1),
                ..config
            },
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Get ==
    /// Returns a clone of the value if present and fresh.
    ///
    /// A stale entry is removed on the spot. A hit marks the key as most
    /// recently used.
    pub fn get(&mut self, key: &str) -> Option<T> {
        if !self.config.enabled {
            return None;
        }

        if self.remove_if_expired(key) {
            self.stats.record_miss();
            return None;
        }

        match self.entries.get(key) {
            Some(entry) => {
                let value = entry.value.clone();
                self.lru.touch(key);
                self.stats.record_hit();
                debug!(key, "cache hit");
                Some(value)
            }
            None => {
                self.stats.record_miss();
                debug!(key, "cache miss");
                None
            }
        }
    }

    // == Set ==
    /// Stores a value under `key`, replacing any previous entry.
    ///
    /// Inserting a new key into a full cache first evicts the least recently
    /// used key. Overwriting an existing key never evicts.
    pub fn set(&mut self, key: impl Into<String>, value: T, ttl: Option<Duration>, tags: &[&str]) {
        if !self.config.enabled {
            return;
        }

        let key = key.into();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.config.max_size {
            self.evict_least_recent();
        }

        let ttl = ttl.unwrap_or(self.config.default_ttl);
        let tags: HashSet<String> = tags.iter().map(|tag| tag.to_string()).collect();

        self.lru.touch(&key);
        self.entries.insert(key, CacheEntry::new(value, ttl, tags));
    }

    // == Has ==
    /// Existence probe with the same freshness rules as [`get`](Self::get).
    ///
    /// Does not change recency order and does not count as a hit or miss.
    pub fn has(&mut self, key: &str) -> bool {
        if self.remove_if_expired(key) {
            return false;
        }
        self.entries.contains_key(key)
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }

    // == Invalidate By Tags ==
    /// Removes every entry carrying at least one of `tags`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_by_tags<S: AsRef<str>>(&mut self, tags: &[S]) -> usize {
        let wanted: HashSet<&str> = tags.iter().map(AsRef::as_ref).collect();
        if wanted.is_empty() {
            return 0;
        }

        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.has_any_tag(&wanted))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &doomed {
            self.delete(key);
        }

        debug!(removed = doomed.len(), ?wanted, "invalidated by tags");
        doomed.len()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Stats ==
    /// Returns a snapshot of the cache; keys are listed least recent first.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            keys: self.lru.iter().map(str::to_string).collect(),
            ..self.stats.clone()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_if_expired(&mut self, key: &str) -> bool {
        let expired = self.entries.get(key).is_some_and(CacheEntry::is_expired);
        if expired {
            self.delete(key);
            self.stats.record_expiration();
            debug!(key, "cache entry expired");
        }
        expired
    }

    fn evict_least_recent(&mut self) {
        if let Some(evicted) = self.lru.pop_least_recent() {
            self.entries.remove(&evicted);
            self.stats.record_eviction();
            debug!(key = %evicted, "evicted least recently used entry");
        }
    }
}
