//! HTTP client for the external chart calculation engine.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use super::{ChartEngine, ChartInput};
use crate::error::{ApiError, Result};

/// Posts [`ChartInput`] as JSON to a chart engine endpoint and returns its
/// JSON answer unchanged.
#[derive(Debug, Clone)]
pub struct HttpChartEngine {
    client: Client,
    url: String,
}

impl HttpChartEngine {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ChartEngine for HttpChartEngine {
    async fn compute(&self, input: &ChartInput) -> Result<Value> {
        debug!(date = %input.date, time = %input.time, "requesting chart from engine");

        let response = self.client.post(&self.url).json(input).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "chart engine error");
            return Err(ApiError::Upstream(format!(
                "chart engine responded with status {}",
                status
            )));
        }

        let chart: Value = response.json().await?;
        validate_chart(chart)
    }
}

/// Rejects engine answers without a `planets` object.
pub(crate) fn validate_chart(chart: Value) -> Result<Value> {
    if chart.get("planets").is_some_and(Value::is_object) {
        Ok(chart)
    } else {
        Err(ApiError::Upstream(
            "chart engine returned no planet positions".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_chart_accepts_planets() {
        let chart = json!({"planets": {"sun": {"position": {"longitude": 54.2}}}});
        assert_eq!(validate_chart(chart.clone()).unwrap(), chart);
    }

    #[test]
    fn test_validate_chart_rejects_missing_planets() {
        assert!(matches!(validate_chart(json!({})), Err(ApiError::Upstream(_))));
        assert!(matches!(
            validate_chart(json!({"planets": []})),
            Err(ApiError::Upstream(_))
        ));
    }

    #[test]
    fn test_chart_input_wire_format() {
        let input = ChartInput {
            date: "1990-05-15".to_string(),
            time: "14:30".to_string(),
            latitude: 41.0082,
            longitude: 28.9784,
            timezone: Some("Europe/Istanbul".to_string()),
        };

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["date"], "1990-05-15");
        assert_eq!(json["latitude"], 41.0082);
        assert_eq!(json["timezone"], "Europe/Istanbul");
    }
}
