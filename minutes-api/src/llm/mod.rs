//! Language model backend
//!
//! [`LanguageModel`] is the seam between request handlers and the text
//! generation service. The production implementation is [`GeminiClient`];
//! tests substitute scripted implementations.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when calling the language model backend
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key was configured
    #[error("language model not configured: {0}")]
    NotConfigured(String),

    /// The backend answered with a non-success status
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The backend rejected the credentials (HTTP 401/403)
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The backend answered but the body could not be understood
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Transport-level error from reqwest
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A single prompt-in, text-out generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// Cap on generated tokens; `None` uses the backend default
    pub max_output_tokens: Option<u32>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            max_output_tokens: None,
        }
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }
}

/// Text generation backend
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &str;

    /// Run the prompt and return the generated text
    async fn generate(&self, request: &GenerateRequest) -> Result<String, LlmError>;
}
