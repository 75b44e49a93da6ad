//! Request DTOs for the astrology API
//!
//! Fields are optional at the serde level so that missing data is reported
//! through [`ApiError::InvalidRequest`] with a readable message.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::providers::ChartInput;

/// Minimum characters in a location search.
pub const MIN_QUERY_CHARS: usize = 2;

/// Transit time used when only a date is given.
const DEFAULT_TRANSIT_TIME: &str = "12:00";

// == Calculate ==
/// Request body for POST /api/calculate
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculateRequest {
    /// Birth date, `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
    /// Birth time, `HH:MM`
    #[serde(default)]
    pub time: Option<String>,
    /// A location as returned by the geocode endpoint
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub annotations: Option<Annotations>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Geometry {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub timezone: Option<Timezone>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Timezone {
    pub name: Option<String>,
}

impl CalculateRequest {
    /// Checks the request and normalizes it into chart engine input.
    pub fn validate(&self) -> Result<ChartInput> {
        let date = required(self.date.as_deref(), "date is required (YYYY-MM-DD)")?;
        let time = required(self.time.as_deref(), "time is required (HH:MM)")?;
        let location = self
            .location
            .as_ref()
            .ok_or_else(|| invalid("location is required"))?;

        let geometry = location.geometry.unwrap_or_default();
        let (latitude, longitude) = match (geometry.lat, geometry.lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return Err(invalid("location coordinates are missing")),
        };
        check_coordinates(latitude, longitude)?;

        let timezone = location
            .annotations
            .as_ref()
            .and_then(|a| a.timezone.as_ref())
            .and_then(|tz| tz.name.clone())
            .filter(|name| !name.trim().is_empty());

        Ok(ChartInput {
            date: parse_date(date)?,
            time: parse_time(time)?,
            latitude,
            longitude,
            timezone,
        })
    }
}

// == Geocode ==
/// Query string for GET /api/geocode
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeQuery {
    #[serde(default)]
    pub q: Option<String>,
}

impl GeocodeQuery {
    /// Returns the trimmed search text.
    pub fn validate(&self) -> Result<String> {
        let q = required(self.q.as_deref(), "search query q is required")?;
        if q.chars().count() < MIN_QUERY_CHARS {
            return Err(invalid(format!(
                "search query must be at least {} characters",
                MIN_QUERY_CHARS
            )));
        }
        Ok(q.to_string())
    }
}

// == Transit ==
/// Request body for POST /api/transit
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitRequest {
    /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM[:SS]`
    #[serde(default)]
    pub transit_date: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Natal chart to compare against
    #[serde(default)]
    pub natal_chart: Option<Value>,
}

impl TransitRequest {
    /// Builds chart engine input for the transit moment.
    ///
    /// Coordinates fall back to the natal chart's birth place, then to 0.
    pub fn validate(&self) -> Result<ChartInput> {
        let transit_date = required(self.transit_date.as_deref(), "transitDate is required")?;

        let (date, time) = match transit_date.split_once('T') {
            Some((date, time)) => (date, parse_transit_time(time)?),
            None => (transit_date, DEFAULT_TRANSIT_TIME.to_string()),
        };

        let birth = |field: &str| {
            self.natal_chart
                .as_ref()
                .and_then(|chart| chart.pointer(&format!("/birthInfo/{}", field)))
                .and_then(Value::as_f64)
        };
        let latitude = self.latitude.or_else(|| birth("latitude")).unwrap_or(0.0);
        let longitude = self.longitude.or_else(|| birth("longitude")).unwrap_or(0.0);
        check_coordinates(latitude, longitude)?;

        Ok(ChartInput {
            date: parse_date(date)?,
            time,
            latitude,
            longitude,
            timezone: None,
        })
    }
}

// == Interpret ==
/// Request body for POST /api/interpret
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretRequest {
    #[serde(default)]
    pub chart_data: Option<Value>,
    /// A transit response, used when it carries a `comparison`
    #[serde(default)]
    pub transit_data: Option<Value>,
}

impl InterpretRequest {
    /// Returns the chart, which must carry a `planets` object.
    pub fn validate(&self) -> Result<&Value> {
        self.chart_data
            .as_ref()
            .filter(|chart| chart.get("planets").is_some_and(Value::is_object))
            .ok_or_else(|| invalid("chartData with planets is required; calculate the birth chart first"))
    }
}

// == Cache Invalidation ==
/// Request body for POST /api/cache/invalidate
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvalidateRequest {
    #[serde(default)]
    pub tags: Vec<String>,
}

impl InvalidateRequest {
    pub fn validate(&self) -> Result<&[String]> {
        if self.tags.iter().all(|t| t.trim().is_empty()) {
            return Err(invalid("at least one tag is required"));
        }
        Ok(&self.tags)
    }
}

// == Helpers ==
fn invalid(message: impl Into<String>) -> ApiError {
    ApiError::InvalidRequest(message.into())
}

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| invalid(message))
}

fn parse_date(date: &str) -> Result<String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| invalid(format!("invalid date '{}', expected YYYY-MM-DD", date)))
}

fn parse_time(time: &str) -> Result<String> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| invalid(format!("invalid time '{}', expected HH:MM", time)))
}

fn parse_transit_time(time: &str) -> Result<String> {
    NaiveTime::parse_from_str(time, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| invalid(format!("invalid transit time '{}', expected HH:MM[:SS]", time)))
}

fn check_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(invalid(format!(
            "coordinates out of range: {}, {}",
            latitude, longitude
        )));
    }
    Ok(())
}
