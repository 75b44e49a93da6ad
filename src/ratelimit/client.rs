//! Client identification for rate limiting.

use axum::http::HeaderMap;

/// Identifier used when no address header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derives the rate-limit key for a request from its forwarding headers.
///
/// Checks `X-Forwarded-For` (first hop), then `X-Real-IP`, then
/// `Remote-Addr`, and falls back to [`UNKNOWN_CLIENT`].
pub fn client_id(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(first) = header("x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return first.to_string();
    }

    header("x-real-ip")
        .or_else(|| header("remote-addr"))
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}
