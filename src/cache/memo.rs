//! Memoization helpers
//!
//! Read-through wrappers around a shared [`CacheStore`]. The store lock is
//! only held for the lookup and for the final write; the producer runs with
//! the lock released.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::warn;

use crate::cache::{CachePolicy, CacheStore};

/// Cache store shared between request handlers.
pub type SharedCache<T> = Arc<RwLock<CacheStore<T>>>;

/// Wraps a store for sharing across tasks.
pub fn shared<T>(store: CacheStore<T>) -> SharedCache<T> {
    Arc::new(RwLock::new(store))
}

// == Lookup ==
/// A value together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// Served from the cache
    Hit(T),
    /// Produced on this call and stored
    Miss(T),
}

impl<T> Lookup<T> {
    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Lookup::Hit(value) | Lookup::Miss(value) => value,
        }
    }
}

// == With Cache ==
/// Returns the cached value for `key`, or runs `producer` once and caches its
/// successful result.
///
/// Producer errors are returned unchanged and nothing is stored.
pub async fn with_cache<T, E, F, Fut>(
    cache: &RwLock<CacheStore<T>>,
    key: &str,
    ttl: Option<Duration>,
    tags: &[&str],
    producer: F,
) -> Result<T, E>
where
    T: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    lookup_or_produce(cache, key, ttl, tags, producer)
        .await
        .map(Lookup::into_inner)
}

/// Same as [`with_cache`] but reports whether the value was a cache hit.
pub async fn lookup_or_produce<T, E, F, Fut>(
    cache: &RwLock<CacheStore<T>>,
    key: &str,
    ttl: Option<Duration>,
    tags: &[&str],
    producer: F,
) -> Result<Lookup<T>, E>
where
    T: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let cached = cache.write().await.get(key);
    if let Some(value) = cached {
        return Ok(Lookup::Hit(value));
    }

    let value = producer().await?;

    cache
        .write()
        .await
        .set(key, value.clone(), ttl, tags);

    Ok(Lookup::Miss(value))
}

// == Memoized ==
/// A computation wrapped with read-through caching under a [`CachePolicy`].
///
/// The key is derived from the serialized call arguments; when they cannot be
/// serialized the computation runs uncached.
pub struct Memoized<T, F> {
    cache: SharedCache<T>,
    policy: CachePolicy,
    compute: F,
}

impl<T, F> Memoized<T, F> {
    pub fn new(cache: SharedCache<T>, policy: CachePolicy, compute: F) -> Self {
        Self {
            cache,
            policy,
            compute,
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Invokes the wrapped computation through the cache.
    pub async fn call<A, E, Fut>(&self, args: A) -> Result<T, E>
    where
        T: Clone,
        A: Serialize,
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = match self.policy.key_for(&args) {
            Ok(key) => key,
            Err(err) => {
                warn!(prefix = self.policy.prefix, error = %err, "uncacheable arguments, computing directly");
                return (self.compute)(args).await;
            }
        };

        let compute = &self.compute;
        with_cache(
            &self.cache,
            &key,
            Some(self.policy.ttl),
            self.policy.tags,
            move || compute(args),
        )
        .await
    }
}
