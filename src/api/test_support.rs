//! In-memory providers for handler and router tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::AppState;
use crate::cache::{CacheConfig, CacheStore};
use crate::error::{ApiError, Result};
use crate::providers::{ChartEngine, ChartInput, Geocoder, Interpreter};

#[derive(Debug, Default)]
struct CallCounter {
    calls: AtomicUsize,
    fail_next: AtomicBool,
}

impl CallCounter {
    fn record(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ApiError::Upstream("fake provider failure".to_string()));
        }
        Ok(())
    }
}

macro_rules! counted {
    ($name:ident) => {
        impl $name {
            pub fn calls(&self) -> usize {
                self.counter.calls.load(Ordering::SeqCst)
            }

            /// Makes the next call fail with an upstream error.
            pub fn fail_next(&self) {
                self.counter.fail_next.store(true, Ordering::SeqCst);
            }
        }
    };
}

#[derive(Debug, Default)]
pub struct FakeChartEngine {
    counter: CallCounter,
}

counted!(FakeChartEngine);

impl FakeChartEngine {
    /// The chart every fake computation returns.
    pub fn chart() -> Value {
        json!({
            "planets": {
                "sun": {"name": "Sun", "signName": "Taurus", "position": {"longitude": 54.2}, "retrograde": false},
                "moon": {"name": "Moon", "signName": "Cancer", "position": {"longitude": 101.9}, "retrograde": false}
            },
            "axes": {"asc": {"sign": 5}},
            "houses": []
        })
    }
}

#[async_trait]
impl ChartEngine for FakeChartEngine {
    async fn compute(&self, _input: &ChartInput) -> Result<Value> {
        self.counter.record()?;
        Ok(Self::chart())
    }
}

#[derive(Debug, Default)]
pub struct FakeGeocoder {
    counter: CallCounter,
}

counted!(FakeGeocoder);

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn search(&self, query: &str) -> Result<Value> {
        self.counter.record()?;
        Ok(json!([{
            "formatted": query,
            "geometry": {"lat": 39.93, "lng": 32.85},
            "annotations": {"timezone": {"name": "Europe/Istanbul"}}
        }]))
    }
}

#[derive(Debug, Default)]
pub struct FakeInterpreter {
    counter: CallCounter,
}

counted!(FakeInterpreter);

#[async_trait]
impl Interpreter for FakeInterpreter {
    async fn interpret(&self, prompt: &str) -> Result<String> {
        self.counter.record()?;
        Ok(format!("reading for a {} character prompt", prompt.chars().count()))
    }
}

/// Handles on the fakes behind a test [`AppState`].
#[derive(Clone, Default)]
pub struct Fakes {
    pub chart: Arc<FakeChartEngine>,
    pub geocoder: Arc<FakeGeocoder>,
    pub interpreter: Arc<FakeInterpreter>,
}

pub fn test_state() -> (AppState, Fakes) {
    let fakes = Fakes::default();
    let state = AppState::new(
        CacheStore::new(CacheConfig::default()),
        fakes.chart.clone(),
        fakes.geocoder.clone(),
        fakes.interpreter.clone(),
    );
    (state, fakes)
}
