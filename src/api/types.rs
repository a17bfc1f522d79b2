//! API request/response types

use crate::domain::model::empty_as_none;
use crate::utils::error::RecommenderError;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Envelope shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&RecommenderError> for ApiError {
    fn from(err: &RecommenderError) -> Self {
        let details = match err {
            RecommenderError::InvalidInput { field, .. } => Some(format!("field: {}", field)),
            _ => None,
        };
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            details,
        }
    }
}

impl IntoResponse for RecommenderError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!("❌ Request failed: {} (category: {:?})", self, self.category());
        } else {
            tracing::warn!("Request rejected: {}", self);
        }
        (status, Json(ApiResponse::error(ApiError::from(&self)))).into_response()
    }
}

// Extractor rejections are reported through the same envelope as
// handler errors.
impl From<PathRejection> for RecommenderError {
    fn from(rejection: PathRejection) -> Self {
        RecommenderError::invalid_input("path", rejection.body_text(), "malformed path parameter")
    }
}

impl From<QueryRejection> for RecommenderError {
    fn from(rejection: QueryRejection) -> Self {
        RecommenderError::invalid_input("query", rejection.body_text(), "malformed query string")
    }
}

impl From<JsonRejection> for RecommenderError {
    fn from(rejection: JsonRejection) -> Self {
        RecommenderError::invalid_input("body", rejection.body_text(), "malformed JSON payload")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusData {
    pub message: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RecommendQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_distance_km: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub top_n: Option<usize>,
}
