//! API Module
//!
//! HTTP handlers, middleware and routing for the astrology REST API.
//!
//! # Endpoints
//! - `POST /api/calculate` - Natal chart
//! - `GET /api/geocode?q=` - Location search
//! - `POST /api/transit` - Transit chart with natal comparison
//! - `POST /api/interpret` - Chart interpretation
//! - `GET /api/cache/stats`, `POST /api/cache/invalidate`,
//!   `DELETE /api/cache`, `DELETE /api/cache/:key` - Cache administration
//! - `GET /health` - Health check endpoint

pub mod cached;
pub mod handlers;
pub mod rate_limit;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;

pub use cached::{cached_json, X_CACHE, X_CACHE_FALLBACK};
pub use handlers::*;
pub use rate_limit::{rate_limit, X_RATELIMIT_LIMIT, X_RATELIMIT_REMAINING, X_RATELIMIT_RESET};
pub use routes::create_router;
