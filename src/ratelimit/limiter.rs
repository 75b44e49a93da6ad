//! Fixed-Window Rate Limiter
//!
//! Counts requests per client inside a fixed time window. The first request
//! after a window has reset opens a new one.

use std::collections::HashMap;
use std::time::{Duration, Instant};

// == Window Record ==
#[derive(Debug, Clone, Copy)]
struct WindowRecord {
    count: u32,
    reset_at: Instant,
}

// == Decision ==
/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request must be rejected
    pub blocked: bool,
    /// Requests still allowed in the current window
    pub remaining: u32,
    /// When the current window ends
    pub reset_at: Instant,
}

impl RateLimitDecision {
    /// Time left until the window resets, measured from `now`.
    pub fn retry_after(&self, now: Instant) -> Duration {
        self.reset_at.saturating_duration_since(now)
    }
}

// == Fixed Window Limiter ==
#[derive(Debug)]
pub struct FixedWindowLimiter {
    window: Duration,
    max_requests: u32,
    records: HashMap<String, WindowRecord>,
}

impl FixedWindowLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            records: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    // == Check ==
    /// Counts a request from `client` and decides whether it may proceed.
    pub fn check(&mut self, client: &str) -> RateLimitDecision {
        self.check_at(client, Instant::now())
    }

    pub(crate) fn check_at(&mut self, client: &str, now: Instant) -> RateLimitDecision {
        let window = self.window;
        let max_requests = self.max_requests;

        let record = self
            .records
            .entry(client.to_string())
            .and_modify(|record| {
                if now > record.reset_at {
                    *record = WindowRecord {
                        count: 0,
                        reset_at: now + window,
                    };
                }
            })
            .or_insert(WindowRecord {
                count: 0,
                reset_at: now + window,
            });

        if record.count >= max_requests {
            return RateLimitDecision {
                blocked: true,
                remaining: 0,
                reset_at: record.reset_at,
            };
        }

        record.count += 1;
        RateLimitDecision {
            blocked: false,
            remaining: max_requests - record.count,
            reset_at: record.reset_at,
        }
    }

    /// Requests `client` may still make in its current window.
    pub fn remaining(&self, client: &str) -> u32 {
        self.remaining_at(client, Instant::now())
    }

    fn remaining_at(&self, client: &str, now: Instant) -> u32 {
        match self.records.get(client) {
            Some(record) if now <= record.reset_at => self.max_requests.saturating_sub(record.count),
            _ => self.max_requests,
        }
    }

    // == Sweep ==
    /// Drops windows that have already reset. Returns how many were dropped.
    pub fn sweep(&mut self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub(crate) fn sweep_at(&mut self, now: Instant) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| now <= record.reset_at);
        before - self.records.len()
    }

    /// Number of clients with a tracked window.
    pub fn tracked_clients(&self) -> usize {
        self.records.len()
    }
}
