//! API Handlers
//!
//! HTTP request handlers for the astrology endpoints and the cache
//! administration endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::cached::cached_json;
use crate::cache::{policy, shared, CacheStore, SharedCache};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    CalculateRequest, ClearResponse, DeleteResponse, GeocodeQuery, HealthResponse,
    InterpretRequest, InterpretResponse, InvalidateRequest, InvalidateResponse, StatsResponse,
    TransitRequest, TransitResponse,
};
use crate::prompt::build_prompt;
use crate::providers::{
    ChartEngine, Geocoder, HttpChartEngine, Interpreter, OpenCageGeocoder, OpenRouterInterpreter,
};
use crate::ratelimit::RateLimiters;
use crate::transit;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Response cache shared by every cached endpoint
    pub cache: SharedCache<Value>,
    pub chart_engine: Arc<dyn ChartEngine>,
    pub geocoder: Arc<dyn Geocoder>,
    pub interpreter: Arc<dyn Interpreter>,
    /// Rate-limit tiers applied by the router
    pub limiters: RateLimiters,
}

impl AppState {
    /// Creates a new AppState with default rate-limit tiers.
    pub fn new(
        cache: CacheStore<Value>,
        chart_engine: Arc<dyn ChartEngine>,
        geocoder: Arc<dyn Geocoder>,
        interpreter: Arc<dyn Interpreter>,
    ) -> Self {
        Self {
            cache: shared(cache),
            chart_engine,
            geocoder,
            interpreter,
            limiters: RateLimiters::default(),
        }
    }

    /// Replaces the rate-limit tiers.
    pub fn with_limiters(mut self, limiters: RateLimiters) -> Self {
        self.limiters = limiters;
        self
    }

    /// Creates a new AppState from configuration, wiring the HTTP providers.
    pub fn from_config(config: &Config) -> std::result::Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let chart_engine = HttpChartEngine::new(client.clone(), config.chart_engine_url.clone());
        let geocoder = OpenCageGeocoder::new(client.clone(), config.opencage_api_key.clone());
        let interpreter = OpenRouterInterpreter::new(
            client,
            config.openrouter_api_key.clone(),
            config.openrouter_model.clone(),
            config.app_url.clone(),
            config.app_name.clone(),
            Duration::from_secs(config.llm_timeout),
        );

        Ok(Self::new(
            CacheStore::new(config.cache_config()),
            Arc::new(chart_engine),
            Arc::new(geocoder),
            Arc::new(interpreter),
        ))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|err| ApiError::Internal(err.to_string()))
}

/// Handler for POST /api/calculate
///
/// Computes a natal chart, cached under the chart policy.
pub async fn calculate_handler(
    State(state): State<AppState>,
    Json(req): Json<CalculateRequest>,
) -> Result<Response> {
    let input = req.validate()?;

    cached_json(&state.cache, &policy::CHART, &input, || {
        state.chart_engine.compute(&input)
    })
    .await
}

/// Handler for GET /api/geocode?q=
///
/// Looks up candidate locations, cached under the location policy.
pub async fn geocode_handler(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Response> {
    let q = query.validate()?;

    cached_json(&state.cache, &policy::LOCATION, &q, || state.geocoder.search(&q)).await
}

/// Handler for POST /api/transit
///
/// Computes the chart for the transit moment and, when a natal chart is
/// supplied, compares the two. Cached under the transit policy.
pub async fn transit_handler(
    State(state): State<AppState>,
    Json(req): Json<TransitRequest>,
) -> Result<Response> {
    let input = req.validate()?;
    let transit_date = req.transit_date.clone().unwrap_or_default();
    let args = (&input, &req.natal_chart);

    cached_json(&state.cache, &policy::TRANSIT, &args, || async {
        let chart = state.chart_engine.compute(&input).await?;
        let comparison = req
            .natal_chart
            .as_ref()
            .map(|natal| transit::compare(natal, &chart));

        to_json(&TransitResponse::new(transit_date, chart, comparison))
    })
    .await
}

/// Handler for POST /api/interpret
///
/// Asks the language model for a reading of the chart, cached under the
/// API response policy keyed by the rendered prompt.
pub async fn interpret_handler(
    State(state): State<AppState>,
    Json(req): Json<InterpretRequest>,
) -> Result<Response> {
    let chart = req.validate()?;
    let prompt = build_prompt(chart, req.transit_data.as_ref());

    cached_json(&state.cache, &policy::API, &("interpret", &prompt), || async {
        let interpretation = state.interpreter.interpret(&prompt).await?;
        to_json(&InterpretResponse { interpretation })
    })
    .await
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.read().await.stats();
    Json(StatsResponse::from(stats))
}

/// Handler for POST /api/cache/invalidate
///
/// Removes every entry carrying at least one of the given tags.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    let tags = req.validate()?;
    let invalidated = state.cache.write().await.invalidate_by_tags(tags);
    info!(?tags, invalidated, "cache invalidated by tags");

    Ok(Json(InvalidateResponse {
        tags: tags.to_vec(),
        invalidated,
    }))
}

/// Handler for DELETE /api/cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let cleared = {
        let mut cache = state.cache.write().await;
        let size = cache.len();
        cache.clear();
        size
    };
    info!(cleared, "cache cleared");

    Json(ClearResponse::new(cleared))
}

/// Handler for DELETE /api/cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !state.cache.write().await.delete(&key) {
        return Err(ApiError::NotFound(format!("Key '{}' is not cached", key)));
    }

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let entries = state.cache.read().await.len();
    Json(HealthResponse::healthy(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{test_state, FakeChartEngine};
    use crate::cache::CacheConfig;
    use axum::body::to_bytes;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn calculate_request() -> CalculateRequest {
        serde_json::from_value(json!({
            "date": "1990-05-15",
            "time": "14:30",
            "location": {"geometry": {"lat": 41.0082, "lng": 28.9784}}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_calculate_handler_caches_chart() {
        let (state, fakes) = test_state();

        let first = calculate_handler(State(state.clone()), Json(calculate_request()))
            .await
            .unwrap();
        assert_eq!(first.headers()["x-cache"], "MISS");
        assert!(body_json(first).await["planets"]["sun"].is_object());

        let second = calculate_handler(State(state.clone()), Json(calculate_request()))
            .await
            .unwrap();
        assert_eq!(second.headers()["x-cache"], "HIT");

        assert_eq!(fakes.chart.calls(), 1);
        let stats = state.cache.read().await.stats();
        assert!(stats.keys[0].starts_with("chart:"));
    }

    #[tokio::test]
    async fn test_calculate_handler_rejects_invalid_input() {
        let (state, fakes) = test_state();

        let result = calculate_handler(State(state), Json(CalculateRequest::default())).await;

        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
        assert_eq!(fakes.chart.calls(), 0);
    }

    #[tokio::test]
    async fn test_geocode_handler() {
        let (state, fakes) = test_state();
        let query = || GeocodeQuery {
            q: Some("Ankara".into()),
        };

        let response = geocode_handler(State(state.clone()), Query(query())).await.unwrap();
        assert_eq!(body_json(response).await[0]["formatted"], "Ankara");

        geocode_handler(State(state), Query(query())).await.unwrap();
        assert_eq!(fakes.geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn test_transit_handler_with_comparison() {
        let (state, _) = test_state();
        let req: TransitRequest = serde_json::from_value(json!({
            "transitDate": "2025-10-31T09:00",
            "natalChart": FakeChartEngine::chart()
        }))
        .unwrap();

        let response = transit_handler(State(state), Json(req)).await.unwrap();
        let json = body_json(response).await;

        assert_eq!(json["transitDate"], "2025-10-31T09:00");
        // Same positions on both sides: each planet is conjunct itself
        assert!(json["comparison"]["totalAspects"].as_u64().unwrap() >= 2);
        assert_eq!(json["comparison"]["aspects"][0]["aspect"], "conjunction");
    }

    #[tokio::test]
    async fn test_transit_handler_without_natal_chart() {
        let (state, _) = test_state();
        let req = TransitRequest {
            transit_date: Some("2025-10-31".into()),
            ..Default::default()
        };

        let json = body_json(transit_handler(State(state), Json(req)).await.unwrap()).await;
        assert!(json["comparison"].is_null());
    }

    #[tokio::test]
    async fn test_interpret_handler_caches_by_prompt() {
        let (state, fakes) = test_state();
        let req = || InterpretRequest {
            chart_data: Some(FakeChartEngine::chart()),
            transit_data: None,
        };

        let response = interpret_handler(State(state.clone()), Json(req())).await.unwrap();
        assert!(body_json(response).await["interpretation"].is_string());

        let again = interpret_handler(State(state.clone()), Json(req())).await.unwrap();
        assert_eq!(again.headers()["x-cache"], "HIT");
        assert_eq!(fakes.interpreter.calls(), 1);

        let stats = state.cache.read().await.stats();
        assert!(stats.keys.iter().all(|k| k.starts_with("api:")));
    }

    #[tokio::test]
    async fn test_upstream_error_is_not_cached() {
        let (state, fakes) = test_state();
        fakes.geocoder.fail_next();

        let query = GeocodeQuery {
            q: Some("Rize".into()),
        };
        let result = geocode_handler(State(state.clone()), Query(query)).await;
        assert!(matches!(result, Err(ApiError::Upstream(_))));
        assert!(state.cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_handler() {
        let (state, _) = test_state();
        calculate_handler(State(state.clone()), Json(calculate_request())).await.unwrap();
        geocode_handler(State(state.clone()), Query(GeocodeQuery { q: Some("Van".into()) }))
            .await
            .unwrap();

        let response = invalidate_handler(
            State(state.clone()),
            Json(InvalidateRequest {
                tags: vec!["calculation".into()],
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.invalidated, 1);
        let stats = state.cache.read().await.stats();
        assert_eq!(stats.size, 1);
        assert!(stats.keys[0].starts_with("location:"));
    }

    #[tokio::test]
    async fn test_clear_handler() {
        let (state, _) = test_state();
        calculate_handler(State(state.clone()), Json(calculate_request())).await.unwrap();

        let response = clear_handler(State(state.clone())).await;
        assert_eq!(response.cleared, 1);
        assert!(state.cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let (state, _) = test_state();
        state
            .cache
            .write()
            .await
            .set("chart:abc", json!({}), None, &["chart"]);

        let response = delete_handler(State(state.clone()), Path("chart:abc".to_string()))
            .await
            .unwrap();
        assert_eq!(response.key, "chart:abc");

        let result = delete_handler(State(state), Path("chart:abc".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stats_and_health_handlers() {
        let (state, _) = test_state();
        calculate_handler(State(state.clone()), Json(calculate_request())).await.unwrap();
        calculate_handler(State(state.clone()), Json(calculate_request())).await.unwrap();

        let stats = stats_handler(State(state.clone())).await;
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 0.5).abs() < 0.001);

        let health = health_handler(State(state)).await;
        assert_eq!(health.status, "healthy");
        assert_eq!(health.cache_entries, 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_misses() {
        let (state, fakes) = test_state();
        let state = AppState {
            cache: shared(CacheStore::new(CacheConfig {
                enabled: false,
                ..CacheConfig::default()
            })),
            ..state
        };

        for _ in 0..2 {
            let response = calculate_handler(State(state.clone()), Json(calculate_request()))
                .await
                .unwrap();
            assert_eq!(response.headers()["x-cache"], "MISS");
        }
        assert_eq!(fakes.chart.calls(), 2);
    }
}
