//! Response DTOs for the astrology API
//!
//! Chart and geocode answers are passed through as opaque JSON; only the
//! shapes this server owns are typed here.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::transit::Comparison;

/// Response body for POST /api/transit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitResponse {
    /// The transit date as requested
    pub transit_date: String,
    pub transit_chart: Value,
    /// Present when a natal chart was supplied
    pub comparison: Option<Comparison>,
    /// RFC 3339 time of calculation
    pub calculated_at: String,
}

impl TransitResponse {
    pub fn new(transit_date: impl Into<String>, transit_chart: Value, comparison: Option<Comparison>) -> Self {
        Self {
            transit_date: transit_date.into(),
            transit_chart,
            comparison,
            calculated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for POST /api/interpret
#[derive(Debug, Clone, Serialize)]
pub struct InterpretResponse {
    pub interpretation: String,
}

/// Response body for GET /api/cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Current number of entries
    pub size: usize,
    /// Live keys, least recently used first
    pub keys: Vec<String>,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            size: stats.size,
            keys: stats.keys,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
        }
    }
}

/// Response body for POST /api/cache/invalidate
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub tags: Vec<String>,
    /// Entries removed
    pub invalidated: usize,
}

/// Response body for DELETE /api/cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Entries removed
    pub cleared: usize,
}

impl ClearResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            message: "Cache cleared".to_string(),
            cleared,
        }
    }
}

/// Response body for DELETE /api/cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted", key),
            key,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Entries currently cached
    pub cache_entries: usize,
}

impl HealthResponse {
    pub fn healthy(cache_entries: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            cache_entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stats_response_from_cache_stats() {
        let stats = CacheStats {
            size: 2,
            keys: vec!["chart:1".into(), "location:2".into()],
            hits: 8,
            misses: 2,
            evictions: 1,
            expirations: 0,
        };

        let resp = StatsResponse::from(stats);
        assert_eq!(resp.size, 2);
        assert_eq!(resp.keys[0], "chart:1");
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = StatsResponse::from(CacheStats::default());
        assert_eq!(resp.hit_rate, 0.0);
        assert!(resp.keys.is_empty());
    }

    #[test]
    fn test_transit_response_serialize() {
        let resp = TransitResponse::new("2025-10-31", json!({"planets": {}}), None);
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["transitDate"], "2025-10-31");
        assert!(json["comparison"].is_null());
        assert!(json["calculatedAt"].is_string());
        assert!(json["transitChart"]["planets"].is_object());
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy(3);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
        assert!(json.contains("\"cache_entries\":3"));
    }

    #[test]
    fn test_delete_response_serialize() {
        let json = serde_json::to_string(&DeleteResponse::new("chart:2p")).unwrap();
        assert!(json.contains("chart:2p"));
        assert!(json.contains("deleted"));
    }

    #[test]
    fn test_clear_response_serialize() {
        let json = serde_json::to_value(ClearResponse::new(4)).unwrap();
        assert_eq!(json["cleared"], 4);
        assert_eq!(json["message"], "Cache cleared");
    }
}
