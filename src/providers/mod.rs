//! Upstream Providers
//!
//! Interfaces to the external services the API depends on, plus their HTTP
//! implementations. Handlers only see the traits, so tests can substitute
//! in-memory fakes.
//!
//! - [`ChartEngine`]: turns birth data into planetary positions, houses and aspects
//! - [`Geocoder`]: resolves a free-text place name to candidate locations
//! - [`Interpreter`]: produces narrative text for a prompt

mod chart;
mod geocode;
mod llm;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

pub use chart::HttpChartEngine;
pub use geocode::OpenCageGeocoder;
pub use llm::OpenRouterInterpreter;

// == Chart Input ==
/// Normalized birth (or transit) moment and place handed to the chart engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartInput {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Local wall-clock time, `HH:MM`
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone name when known; the engine resolves it from coordinates otherwise
    pub timezone: Option<String>,
}

#[async_trait]
pub trait ChartEngine: Send + Sync {
    /// Computes a tropical chart. The result is opaque JSON with at least a
    /// `planets` object keyed by planet name.
    async fn compute(&self, input: &ChartInput) -> Result<Value>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Returns the candidate locations for `query`; never an empty list.
    async fn search(&self, query: &str) -> Result<Value>;
}

#[async_trait]
pub trait Interpreter: Send + Sync {
    /// Returns the generated interpretation for `prompt`.
    async fn interpret(&self, prompt: &str) -> Result<String>;
}
