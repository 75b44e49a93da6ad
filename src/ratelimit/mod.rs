//! Rate Limiting Module
//!
//! Fixed-window request counters keyed by client address, grouped into the
//! tiers applied to the API routes.

mod client;
mod limiter;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

pub use client::{client_id, UNKNOWN_CLIENT};
pub use limiter::{FixedWindowLimiter, RateLimitDecision};

// == Rate Limit ==
/// A limiter shared between requests plus the message sent when it blocks.
#[derive(Debug, Clone)]
pub struct RateLimit {
    pub limiter: Arc<Mutex<FixedWindowLimiter>>,
    pub message: &'static str,
}

impl RateLimit {
    pub fn new(window: Duration, max_requests: u32, message: &'static str) -> Self {
        Self {
            limiter: Arc::new(Mutex::new(FixedWindowLimiter::new(window, max_requests))),
            message,
        }
    }

    /// 5 requests per 10 minutes, for language model calls.
    pub fn strict() -> Self {
        Self::new(
            Duration::from_secs(10 * 60),
            5,
            "Interpretation limit exceeded. Please try again in 10 minutes.",
        )
    }

    /// 20 requests per 5 minutes, for chart calculations.
    pub fn moderate() -> Self {
        Self::new(
            Duration::from_secs(5 * 60),
            20,
            "Calculation limit exceeded. Please try again in 5 minutes.",
        )
    }

    /// 60 requests per minute, for location search.
    pub fn lenient() -> Self {
        Self::new(
            Duration::from_secs(60),
            60,
            "Search limit exceeded. Please try again in a minute.",
        )
    }
}

// == Rate Limiters ==
/// The tiers used by the router.
#[derive(Debug, Clone)]
pub struct RateLimiters {
    pub strict: RateLimit,
    pub moderate: RateLimit,
    pub lenient: RateLimit,
}

impl RateLimiters {
    pub fn all(&self) -> [&RateLimit; 3] {
        [&self.strict, &self.moderate, &self.lenient]
    }
}

impl Default for RateLimiters {
    fn default() -> Self {
        Self {
            strict: RateLimit::strict(),
            moderate: RateLimit::moderate(),
            lenient: RateLimit::lenient(),
        }
    }
}
