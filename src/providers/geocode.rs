//! OpenCage geocoding client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::error;

use super::Geocoder;
use crate::error::{ApiError, Result};

const OPENCAGE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

/// Results returned per query.
const RESULT_LIMIT: &str = "5";

#[derive(Debug, Clone)]
pub struct OpenCageGeocoder {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenCageGeocoder {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, OPENCAGE_URL)
    }

    pub fn with_base_url(client: Client, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Geocoder for OpenCageGeocoder {
    async fn search(&self, query: &str) -> Result<Value> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ApiError::NotConfigured("location search requires OPENCAGE_API_KEY".to_string())
        })?;

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("key", api_key),
                ("language", "tr"),
                ("limit", RESULT_LIMIT),
                ("annotations", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "OpenCage API error");
            return Err(ApiError::Upstream(format!(
                "OpenCage API responded with status {}",
                status
            )));
        }

        extract_results(query, response.json().await?)
    }
}

/// Pulls the non-empty `results` array out of an OpenCage response.
pub(crate) fn extract_results(query: &str, body: Value) -> Result<Value> {
    match body.get("results") {
        Some(Value::Array(results)) if !results.is_empty() => Ok(Value::Array(results.clone())),
        _ => Err(ApiError::NotFound(format!(
            "no location matched \"{}\"",
            query
        ))),
    }
}
