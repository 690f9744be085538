//! HTTP API handlers for minutes-api
//!
//! All routes are mounted under [`API_PREFIX`].

pub mod action_items;
pub mod health;
pub mod transcripts;

pub use action_items::{delete_action_item, update_action_item};
pub use health::{check_health, health_check, ComponentState, HealthReport};
pub use transcripts::{delete_transcript, get_history, get_transcript_items, process_transcript};

use axum::extract::rejection::JsonRejection;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::Value;

use crate::error::ApiError;
use crate::validation::ValidationErrors;
use crate::AppState;

/// Common path prefix
pub const API_PREFIX: &str = "/api";

/// Build the `/api` routes
pub fn api_routes() -> Router<AppState> {
    let routes = Router::new()
        .route("/processTranscript", post(process_transcript))
        .route("/history", get(get_history))
        .route(
            "/transcript/:id",
            get(get_transcript_items).delete(delete_transcript),
        )
        .route(
            "/action-items/:id",
            patch(update_action_item).delete(delete_action_item),
        )
        .route("/health", get(health_check));

    Router::new().nest(API_PREFIX, routes)
}

/// Unwrap a JSON body, turning extractor rejections into validation failures
pub(crate) fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ValidationErrors::single("body", rejection.body_text()).into())
}
