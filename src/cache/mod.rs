//! Cache Module
//!
//! In-process response cache with TTL expiration, LRU eviction and
//! tag-based invalidation.

mod entry;
mod key;
mod lru;
mod memo;
pub mod policy;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::{generate_key, hash_code};
pub use lru::LruTracker;
pub use memo::{lookup_or_produce, shared, with_cache, Lookup, Memoized, SharedCache};
pub use policy::CachePolicy;
pub use stats::CacheStats;
pub use store::{CacheConfig, CacheStore};
