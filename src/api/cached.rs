//! Read-through caching for JSON endpoints.
//!
//! Responses report how they were served in `X-Cache`: `HIT` or `MISS`.
//! When no cache key can be derived the value is computed directly and
//! `X-Cache-Fallback: true` is added.

use std::future::Future;

use axum::{
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{lookup_or_produce, CachePolicy, SharedCache};
use crate::error::Result;

pub const X_CACHE: &str = "x-cache";
pub const X_CACHE_FALLBACK: &str = "x-cache-fallback";

/// Serves `producer`'s JSON through the cache under `policy`, keyed by `args`.
///
/// Producer errors are returned as-is and never cached.
pub async fn cached_json<A, F, Fut>(
    cache: &SharedCache<Value>,
    policy: &CachePolicy,
    args: &A,
    producer: F,
) -> Result<Response>
where
    A: Serialize + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let key = match policy.key_for(args) {
        Ok(key) => key,
        Err(err) => {
            warn!(prefix = policy.prefix, error = %err, "cache key unavailable, serving uncached");
            let value = producer().await?;
            return Ok(json_response(value, "MISS", true));
        }
    };

    let lookup = lookup_or_produce(cache, &key, Some(policy.ttl), policy.tags, producer).await?;
    let status = if lookup.is_hit() { "HIT" } else { "MISS" };
    debug!(key = %key, status, "cache lookup");

    Ok(json_response(lookup.into_inner(), status, false))
}

fn json_response(value: Value, status: &'static str, fallback: bool) -> Response {
    let mut response = Json(value).into_response();
    let headers = response.headers_mut();
    headers.insert(X_CACHE, HeaderValue::from_static(status));
    if fallback {
        headers.insert(X_CACHE_FALLBACK, HeaderValue::from_static("true"));
    }
    response
}
