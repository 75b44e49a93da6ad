//! Rate-limit middleware.
//!
//! Counts each request against a [`RateLimit`] tier and decorates the
//! response with the `X-RateLimit-*` headers. Blocked requests never reach
//! the handler.

use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::ratelimit::{client_id, RateLimit};

pub const X_RATELIMIT_LIMIT: &str = "x-ratelimit-limit";
pub const X_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const X_RATELIMIT_RESET: &str = "x-ratelimit-reset";

/// Axum middleware; install with `middleware::from_fn_with_state(tier, rate_limit)`.
pub async fn rate_limit(State(tier): State<RateLimit>, request: Request, next: Next) -> Response {
    let client = client_id(request.headers());

    let (decision, limit) = {
        let mut limiter = tier.limiter.lock().await;
        (limiter.check(&client), limiter.max_requests())
    };

    let retry_after = decision.retry_after(Instant::now());

    let mut response = if decision.blocked {
        let seconds = whole_seconds(retry_after);
        warn!(client = %client, path = %request.uri().path(), retry_after = seconds, "rate limit exceeded");

        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": tier.message,
                "retryAfter": seconds,
            })),
        )
            .into_response();
        response
            .headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from(seconds));
        response
    } else {
        next.run(request).await
    };

    let reset_at = Utc::now()
        + chrono::Duration::from_std(retry_after).unwrap_or_else(|_| chrono::Duration::zero());

    let headers = response.headers_mut();
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(X_RATELIMIT_RESET, HeaderValue::from(reset_at.timestamp()));

    response
}

/// Rounds up so clients never retry before the window resets.
fn whole_seconds(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}
