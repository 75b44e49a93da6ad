//! API Routes
//!
//! Configures the Axum router with the astrology and cache endpoints.

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    calculate_handler, clear_handler, delete_handler, geocode_handler, health_handler,
    interpret_handler, invalidate_handler, stats_handler, transit_handler, AppState,
};
use super::rate_limit::rate_limit;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /api/calculate` - Natal chart (moderate rate tier)
/// - `GET /api/geocode?q=` - Location search (lenient rate tier)
/// - `POST /api/transit` - Transit chart and comparison (moderate rate tier)
/// - `POST /api/interpret` - Chart interpretation (strict rate tier)
/// - `GET /api/cache/stats` - Cache statistics
/// - `POST /api/cache/invalidate` - Drop entries by tag
/// - `DELETE /api/cache` - Drop every entry
/// - `DELETE /api/cache/:key` - Drop one entry
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let limiters = state.limiters.clone();

    let strict = Router::new()
        .route("/interpret", post(interpret_handler))
        .route_layer(middleware::from_fn_with_state(limiters.strict, rate_limit));

    let moderate = Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/transit", post(transit_handler))
        .route_layer(middleware::from_fn_with_state(limiters.moderate, rate_limit));

    let lenient = Router::new()
        .route("/geocode", get(geocode_handler))
        .route_layer(middleware::from_fn_with_state(limiters.lenient, rate_limit));

    let admin = Router::new()
        .route("/cache", delete(clear_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache/invalidate", post(invalidate_handler))
        .route("/cache/:key", delete(delete_handler));

    let api = Router::new()
        .merge(strict)
        .merge(moderate)
        .merge(lenient)
        .merge(admin);

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
