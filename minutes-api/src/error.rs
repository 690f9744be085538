//! Error types for minutes-api
//!
//! Validation failures echo their detail to the caller. Everything else is
//! logged here with full detail and answered with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::validation::{InvalidIdentifier, ValidationErrors};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed validation (400)
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Path identifier is not a positive integer (400)
    #[error("{0}")]
    InvalidId(#[from] InvalidIdentifier),

    /// Referenced row does not exist (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Any other failure (500); `message` is what the client sees
    #[error("{message}: {detail}")]
    Internal {
        message: &'static str,
        detail: String,
    },
}

impl ApiError {
    /// Wrap a failure behind a generic client message
    pub fn internal(message: &'static str, detail: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            message,
            detail: detail.to_string(),
        }
    }

    /// Map a storage error, keeping `NotFound` distinct
    pub fn storage(message: &'static str, err: minutes_common::Error) -> Self {
        match err {
            minutes_common::Error::NotFound(what) => ApiError::NotFound(what),
            other => ApiError::internal(message, other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Validation failed",
                    "details": errors.issues,
                }),
            ),
            ApiError::InvalidId(err) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Invalid ID.",
                    "details": [{ "field": "id", "message": err.reason }],
                }),
            ),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{} not found", what) }),
            ),
            ApiError::Internal { message, detail } => {
                error!(detail = %detail, "{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
