//! Cache Statistics Module
//!
//! Observability snapshot of the cache. `size` and `keys` are exact; the
//! counters are best-effort diagnostics and reset only with the process.

use serde::Serialize;

// == Cache Stats ==
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of entries currently held (fresh or not yet reclaimed)
    pub size: usize,
    /// Keys currently held, least recently used first
    pub keys: Vec<String>,
    /// Lookups that returned a value
    pub hits: u64,
    /// Lookups that returned nothing (missing, expired or disabled)
    pub misses: u64,
    /// Entries removed by the LRU policy
    pub evictions: u64,
    /// Entries reclaimed lazily after their TTL elapsed
    pub expirations: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }
}
