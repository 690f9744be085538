//! minutes-api library
//!
//! Extracts action items from meeting transcripts with a language model,
//! stores them, and serves CRUD endpoints for reviewing them.

pub mod api;
pub mod cli;
pub mod db;
pub mod error;
pub mod extraction;
pub mod llm;
pub mod validation;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use minutes_common::config::{LlmSettings, DEFAULT_EXTRACTION_MODEL, DEFAULT_HEALTH_MODEL};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::llm::LanguageModel;

/// Model identifiers used by the handlers
#[derive(Debug, Clone)]
pub struct ModelSelection {
    /// Model for transcript extraction
    pub extraction: String,
    /// Cheap model for the health ping
    pub health: String,
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self {
            extraction: DEFAULT_EXTRACTION_MODEL.to_string(),
            health: DEFAULT_HEALTH_MODEL.to_string(),
        }
    }
}

impl From<&LlmSettings> for ModelSelection {
    fn from(settings: &LlmSettings) -> Self {
        Self {
            extraction: settings.extraction_model.clone(),
            health: settings.health_model.clone(),
        }
    }
}

/// Application state shared across HTTP handlers
///
/// Built once at startup; read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Language model backend
    pub llm: Arc<dyn LanguageModel>,
    pub models: ModelSelection,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, llm: Arc<dyn LanguageModel>, models: ModelSelection) -> Self {
        Self { db, llm, models }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/", get(banner))
        .merge(api::api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /
async fn banner() -> String {
    build_identity()
}

/// Service name, version and the commit it was built from
pub fn build_identity() -> String {
    format!(
        "minutes-api v{} [{}]",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_identity_names_version_and_commit() {
        let identity = build_identity();
        assert!(identity.starts_with(&format!("minutes-api v{} [", env!("CARGO_PKG_VERSION"))));
        assert!(identity.ends_with(&format!("[{}]", env!("GIT_HASH"))));
    }
}
