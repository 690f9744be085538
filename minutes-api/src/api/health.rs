//! Health check endpoint
//!
//! Probes the database and the language model independently. Both probes run
//! concurrently and neither short-circuits the other.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::llm::{GenerateRequest, LanguageModel};
use crate::AppState;

/// Up/down state of one component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    Up,
    Down,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Always `up`: answering at all proves the HTTP surface is alive
    pub backend: ComponentState,
    pub database: ComponentState,
    pub llm: ComponentState,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    /// True when every dependency is up
    pub fn is_healthy(&self) -> bool {
        self.database == ComponentState::Up && self.llm == ComponentState::Up
    }
}

/// Run both dependency probes
pub async fn check_health(db: &SqlitePool, llm: &dyn LanguageModel, health_model: &str) -> HealthReport {
    let (database, llm) = tokio::join!(probe_database(db), probe_llm(llm, health_model));

    HealthReport {
        backend: ComponentState::Up,
        database,
        llm,
        timestamp: Utc::now(),
    }
}

async fn probe_database(db: &SqlitePool) -> ComponentState {
    match sqlx::query("SELECT 1").execute(db).await {
        Ok(_) => ComponentState::Up,
        Err(e) => {
            warn!(error = %e, "Database health probe failed");
            ComponentState::Down
        }
    }
}

/// One-token generation against the health model
async fn probe_llm(llm: &dyn LanguageModel, health_model: &str) -> ComponentState {
    let request = GenerateRequest::new(health_model, "ping").with_max_output_tokens(1);
    match llm.generate(&request).await {
        Ok(_) => ComponentState::Up,
        Err(e) => {
            warn!(error = %e, backend = llm.name(), "Language model health probe failed");
            ComponentState::Down
        }
    }
}

/// GET /api/health
///
/// 200 when fully healthy, 503 otherwise; the body always carries the
/// per-component detail.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = check_health(&state.db, state.llm.as_ref(), &state.models.health).await;

    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report))
}
