//! Astro Cache - Astrology API server with an in-process response cache
//!
//! Chart calculation, location search, transit comparison and chart
//! interpretation endpoints, served through a bounded cache with TTL
//! expiration, LRU eviction and tag-based invalidation.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod prompt;
pub mod providers;
pub mod ratelimit;
pub mod tasks;
pub mod transit;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_limiter_sweep_task;
