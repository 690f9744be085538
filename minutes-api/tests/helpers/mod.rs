//! Shared test helpers: scripted language model and router setup

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use minutes_api::llm::{GenerateRequest, LanguageModel, LlmError};
use minutes_api::{build_router, AppState, ModelSelection};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::{Arc, Mutex};

/// Language model stub answering every call with the same reply
pub struct ScriptedModel {
    reply: Option<String>,
    calls: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedModel {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Every call fails as if the backend were unreachable
    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<GenerateRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(request.clone());
        self.reply
            .clone()
            .ok_or_else(|| LlmError::RequestFailed("connection refused".to_string()))
    }
}

/// Fresh in-memory database with schema
pub async fn test_db() -> SqlitePool {
    minutes_common::db::init_database("sqlite::memory:")
        .await
        .expect("in-memory database")
}

/// Router over the given pool and model
pub fn test_app(db: SqlitePool, model: Arc<ScriptedModel>) -> axum::Router {
    let state = AppState::new(db, model, ModelSelection::default());
    build_router(state)
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Extract JSON body from response
pub async fn extract_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

pub async fn count_rows(db: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(db)
        .await
        .unwrap()
}
