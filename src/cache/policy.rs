//! Cache Policies
//!
//! Named key namespaces with their TTL and invalidation tags, one per kind of
//! cached upstream work.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::cache::generate_key;

/// Key prefix, lifespan and tags applied to one family of cached values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub prefix: &'static str,
    pub ttl: Duration,
    pub tags: &'static [&'static str],
}

/// Natal chart calculations; expensive, so kept longest.
pub const CHART: CachePolicy = CachePolicy {
    prefix: "chart",
    ttl: Duration::from_secs(10 * 60),
    tags: &["chart", "calculation"],
};

/// Geocoder search results.
pub const LOCATION: CachePolicy = CachePolicy {
    prefix: "location",
    ttl: Duration::from_secs(2 * 60),
    tags: &["location", "search"],
};

/// Transit chart calculations.
pub const TRANSIT: CachePolicy = CachePolicy {
    prefix: "transit",
    ttl: Duration::from_secs(5 * 60),
    tags: &["transit", "calculation"],
};

/// Generic upstream API responses.
pub const API: CachePolicy = CachePolicy {
    prefix: "api",
    ttl: Duration::from_secs(3 * 60),
    tags: &["api", "response"],
};

impl CachePolicy {
    /// Derives the key for already-rendered arguments.
    pub fn key(&self, args: &[Value]) -> String {
        generate_key(self.prefix, args)
    }

    /// Derives the key for any serializable argument value.
    ///
    /// A JSON array (including a serialized tuple) is spread into separate
    /// arguments; anything else counts as a single argument.
    pub fn key_for<A: Serialize + ?Sized>(&self, args: &A) -> Result<String, serde_json::Error> {
        let args = match serde_json::to_value(args)? {
            Value::Array(items) => items,
            single => vec![single],
        };
        Ok(self.key(&args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_policy_constants() {
        assert_eq!(CHART.ttl, Duration::from_secs(600));
        assert_eq!(LOCATION.ttl, Duration::from_secs(120));
        assert_eq!(TRANSIT.ttl, Duration::from_secs(300));
        assert_eq!(API.ttl, Duration::from_secs(180));
        assert_eq!(CHART.tags, &["chart", "calculation"]);
        assert_eq!(LOCATION.tags, &["location", "search"]);
        assert_eq!(TRANSIT.tags, &["transit", "calculation"]);
        assert_eq!(API.tags, &["api", "response"]);
    }

    #[test]
    fn test_key_for_spreads_tuples() {
        let from_tuple = CHART.key_for(&("1990-05-15", "14:30")).unwrap();
        let from_values = CHART.key(&[json!("1990-05-15"), json!("14:30")]);
        assert_eq!(from_tuple, from_values);
        assert!(from_tuple.starts_with("chart:"));
    }

    #[test]
    fn test_key_for_single_value() {
        assert_eq!(
            LOCATION.key_for("istanbul").unwrap(),
            LOCATION.key(&[json!("istanbul")])
        );
    }

    #[test]
    fn test_key_for_rejects_unserializable_keys() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys are not valid JSON object keys");

        assert!(API.key_for(&map).is_err());
    }
}
