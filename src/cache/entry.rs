//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and tag support.

use std::collections::HashSet;
use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with its payload and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value, opaque to the cache
    pub value: T,
    /// Monotonic insertion time
    pub created_at: Instant,
    /// Lifespan measured from `created_at`
    pub ttl: Duration,
    /// Classification labels used for group invalidation
    pub tags: HashSet<String>,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current instant.
    pub fn new(value: T, ttl: Duration, tags: HashSet<String>) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            ttl,
            tags,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has outlived its TTL.
    ///
    /// Boundary condition: the entry is still fresh while the elapsed time
    /// equals the TTL exactly, and stale once it is strictly greater.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }

    // == Time To Live ==
    /// Returns the remaining lifespan, saturating at zero.
    pub fn ttl_remaining(&self) -> Duration {
        self.ttl.saturating_sub(self.created_at.elapsed())
    }

    // == Tag Matching ==
    /// Returns true if any of this entry's tags appears in `tags`.
    pub fn has_any_tag(&self, tags: &HashSet<&str>) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag.as_str()))
    }
}
