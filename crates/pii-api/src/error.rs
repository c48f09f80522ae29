//! API error handling
//!
//! Every failure is reported in the response body as `{"error": "..."}`
//! with HTTP 200; callers inspect the body, not the status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message returned when the request body has no `paragraph` field
pub const MISSING_PARAGRAPH: &str = "Missing 'paragraph' field in the request JSON.";

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message
    #[schema(example = "Missing 'paragraph' field in the request JSON.")]
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotInitialized,
    Internal(String),
}

impl AppError {
    pub fn message(&self) -> String {
        match self {
            AppError::BadRequest(msg) | AppError::Internal(msg) => msg.clone(),
            AppError::NotInitialized => "PII analyzer is not initialized".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::BadRequest(msg) => tracing::debug!(error = %msg, "Rejected request"),
            AppError::NotInitialized => tracing::warn!("Request before analyzer initialization"),
            AppError::Internal(msg) => tracing::error!(error = %msg, "Analysis failed"),
        }

        let body = ErrorResponse {
            error: self.message(),
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

impl From<pii_core::PiiError> for AppError {
    fn from(err: pii_core::PiiError) -> Self {
        use pii_core::PiiError;

        match err {
            PiiError::ValidationError(msg) => AppError::BadRequest(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}
