//! Error types for the API server
//!
//! Provides unified error handling using thiserror. The cache itself never
//! produces these; they come from request validation and upstream providers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Api Error Enum ==
/// Unified error type for request handling.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The upstream found nothing for the request
    #[error("Not found: {0}")]
    NotFound(String),

    /// A provider is missing credentials or configuration
    #[error("Service not configured: {0}")]
    NotConfigured(String),

    /// An upstream provider answered with an error
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// An upstream provider could not be reached in time
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string()
        }));

        (self.status_code(), body).into_response()
    }
}

// == Upstream Transport Errors ==
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Unavailable(format!("request timed out: {}", err))
        } else if err.is_connect() {
            ApiError::Unavailable(format!("connection failed: {}", err))
        } else if err.is_decode() {
            ApiError::Upstream(format!("malformed response: {}", err))
        } else {
            ApiError::Upstream(err.to_string())
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the API server.
pub type Result<T> = std::result::Result<T, ApiError>;
