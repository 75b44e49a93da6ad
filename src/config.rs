//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the response cache can hold
    pub cache_max_entries: usize,
    /// Default TTL in seconds for cache entries without explicit TTL
    pub cache_default_ttl: u64,
    /// Whether the response cache stores anything at all
    pub cache_enabled: bool,
    /// HTTP server port
    pub server_port: u16,
    /// Endpoint of the external chart calculation engine
    pub chart_engine_url: String,
    /// OpenCage geocoding API key
    pub opencage_api_key: Option<String>,
    /// OpenRouter API key for chart interpretation
    pub openrouter_api_key: Option<String>,
    /// Model requested from OpenRouter
    pub openrouter_model: String,
    /// Public URL sent as `HTTP-Referer` to OpenRouter
    pub app_url: String,
    /// Application name sent as `X-Title` to OpenRouter
    pub app_name: String,
    /// Wall-clock timeout in seconds for language model calls
    pub llm_timeout: u64,
    /// Interval in seconds between sweeps of stale rate-limit windows
    pub rate_limit_sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `CACHE_ENABLED` - `true`/`false` (default: true)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CHART_ENGINE_URL` - Chart engine endpoint (default: http://127.0.0.1:8088/chart)
    /// - `OPENCAGE_API_KEY` - Geocoder key (default: unset)
    /// - `OPENROUTER_API_KEY` - Language model key (default: unset)
    /// - `OPENROUTER_MODEL` - Model name (default: moonshotai/kimi-k2:free)
    /// - `APP_URL`, `APP_NAME` - Identification sent upstream
    /// - `LLM_TIMEOUT` - Seconds before an interpretation call is aborted (default: 30)
    /// - `RATE_LIMIT_SWEEP_INTERVAL` - Seconds between limiter sweeps (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_max_entries: parse_var("CACHE_MAX_ENTRIES").unwrap_or(defaults.cache_max_entries),
            cache_default_ttl: parse_var("CACHE_DEFAULT_TTL").unwrap_or(defaults.cache_default_ttl),
            cache_enabled: parse_var("CACHE_ENABLED").unwrap_or(defaults.cache_enabled),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            chart_engine_url: string_var("CHART_ENGINE_URL").unwrap_or(defaults.chart_engine_url),
            opencage_api_key: string_var("OPENCAGE_API_KEY"),
            openrouter_api_key: string_var("OPENROUTER_API_KEY"),
            openrouter_model: string_var("OPENROUTER_MODEL").unwrap_or(defaults.openrouter_model),
            app_url: string_var("APP_URL").unwrap_or(defaults.app_url),
            app_name: string_var("APP_NAME").unwrap_or(defaults.app_name),
            llm_timeout: parse_var("LLM_TIMEOUT").unwrap_or(defaults.llm_timeout),
            rate_limit_sweep_interval: parse_var("RATE_LIMIT_SWEEP_INTERVAL")
                .unwrap_or(defaults.rate_limit_sweep_interval),
        }
    }

    /// Settings for the response cache.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            default_ttl: Duration::from_secs(self.cache_default_ttl),
            max_size: self.cache_max_entries,
            enabled: self.cache_enabled,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_entries: 1000,
            cache_default_ttl: 300,
            cache_enabled: true,
            server_port: 3000,
            chart_engine_url: "http://127.0.0.1:8088/chart".to_string(),
            opencage_api_key: None,
            openrouter_api_key: None,
            openrouter_model: "moonshotai/kimi-k2:free".to_string(),
            app_url: "http://localhost:3000".to_string(),
            app_name: "AstroApp".to_string(),
            llm_timeout: 30,
            rate_limit_sweep_interval: 60,
        }
    }
}

fn string_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_max_entries, 1000);
        assert_eq!(config.cache_default_ttl, 300);
        assert!(config.cache_enabled);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.llm_timeout, 30);
        assert!(config.opencage_api_key.is_none());
        assert!(config.openrouter_api_key.is_none());
    }

    #[test]
    fn test_cache_config_conversion() {
        let config = Config {
            cache_max_entries: 50,
            cache_default_ttl: 120,
            cache_enabled: false,
            ..Config::default()
        };

        let cache = config.cache_config();
        assert_eq!(cache.max_size, 50);
        assert_eq!(cache.default_ttl, Duration::from_secs(120));
        assert!(!cache.enabled);
    }

    #[test]
    fn test_config_from_env() {
        // Only this test touches these variables
        env::set_var("CACHE_MAX_ENTRIES", "25");
        env::set_var("CACHE_ENABLED", "false");
        env::set_var("OPENROUTER_MODEL", "  ");
        env::set_var("LLM_TIMEOUT", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.cache_max_entries, 25);
        assert!(!config.cache_enabled);
        assert_eq!(config.openrouter_model, "moonshotai/kimi-k2:free");
        assert_eq!(config.llm_timeout, 30);

        env::remove_var("CACHE_MAX_ENTRIES");
        env::remove_var("CACHE_ENABLED");
        env::remove_var("OPENROUTER_MODEL");
        env::remove_var("LLM_TIMEOUT");
    }
}
