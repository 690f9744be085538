//! Transcript-to-action-items extraction
//!
//! Algorithm:
//! 1. Build the fixed prompt around the transcript
//! 2. Call the language model (single attempt, no retry)
//! 3. Strip code fences and whitespace from the reply
//! 4. Parse and validate the reply as an array of three-key objects
//!
//! Any failure is fatal for the request; nothing is persisted by this module.

mod parse;
mod prompt;

pub use parse::{parse_items, sanitize_response};
pub use prompt::build_prompt;

use minutes_common::db::ExtractedItem;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm::{GenerateRequest, LanguageModel, LlmError};

/// Extraction failures
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The language model call itself failed
    #[error("language model call failed: {0}")]
    Backend(#[from] LlmError),

    #[error("model response is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("model response is not a JSON array")]
    NotAnArray,

    #[error("model response item {index} is invalid: {reason}")]
    InvalidItem { index: usize, reason: String },
}

/// Extraction pipeline bound to a model backend and model identifier
pub struct ExtractionPipeline<'a> {
    llm: &'a dyn LanguageModel,
    model: &'a str,
}

impl<'a> ExtractionPipeline<'a> {
    pub fn new(llm: &'a dyn LanguageModel, model: &'a str) -> Self {
        Self { llm, model }
    }

    /// Extract action items from transcript text
    pub async fn extract(&self, transcript: &str) -> Result<Vec<ExtractedItem>, ExtractionError> {
        let request = GenerateRequest::new(self.model, build_prompt(transcript));

        debug!(
            backend = self.llm.name(),
            model = self.model,
            transcript_chars = transcript.chars().count(),
            "Requesting action item extraction"
        );

        let raw = self.llm.generate(&request).await?;
        let sanitized = sanitize_response(&raw);

        match parse_items(&sanitized) {
            Ok(items) => {
                debug!(item_count = items.len(), "Extraction succeeded");
                Ok(items)
            }
            Err(e) => {
                warn!(error = %e, response_chars = raw.len(), "Model response rejected");
                Err(e)
            }
        }
    }
}
