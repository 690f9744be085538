//! Generative Language API client
//!
//! Endpoint: `POST {base_url}/models/{model}:generateContent`
//! Auth: `x-goog-api-key` header

use async_trait::async_trait;
use minutes_common::config::LlmSettings;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GenerateRequest, LanguageModel, LlmError};

/// Client for Gemini models
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Build a client from resolved settings
    ///
    /// A missing API key is accepted here; every call then fails with
    /// [`LlmError::NotConfigured`].
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        let http = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    /// Whether an API key is available
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn generate_url(&self, model: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/models/{model}:generateContent")
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<OutgoingPart<'a>>,
}

#[derive(Debug, Serialize)]
struct OutgoingPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<IncomingPart>,
}

#[derive(Debug, Deserialize)]
struct IncomingPart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Result<String, LlmError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response has no candidates".to_string()))?;

        Ok(candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::NotConfigured("set GEMINI_API_KEY".to_string()))?;
        let url = self.generate_url(&request.model);

        let body = GenerateContentBody {
            contents: vec![Content {
                role: "user",
                parts: vec![OutgoingPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: request
                .max_output_tokens
                .map(|max_output_tokens| GenerationConfig { max_output_tokens }),
        };

        debug!(
            model = %request.model,
            prompt_chars = request.prompt.len(),
            "sending generateContent request"
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(LlmError::AuthFailed(body));
            }
            return Err(LlmError::RequestFailed(format!("HTTP {status}: {body}")));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {e}")))?;

        let text = parsed.into_text()?;
        debug!(model = %request.model, text_chars = text.len(), "generateContent response received");

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings(base_url: &str, api_key: Option<&str>) -> LlmSettings {
        LlmSettings {
            api_key: api_key.map(String::from),
            base_url: base_url.to_string(),
            extraction_model: "x".to_string(),
            health_model: "y".to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_generate_url_trims_trailing_slash() {
        let client = GeminiClient::new(&settings("https://example.test/v1beta/", Some("k"))).unwrap();
        assert_eq!(
            client.generate_url("gemini-2.5-flash-lite"),
            "https://example.test/v1beta/models/gemini-2.5-flash-lite:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentBody {
            contents: vec![Content {
                role: "user",
                parts: vec![OutgoingPart { text: "hi" }],
            }],
            generation_config: Some(GenerationConfig { max_output_tokens: 1 }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1);
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let parsed: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"[{\"a\""},{"text":":1}]"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.into_text().unwrap(), r#"[{"a":1}]"#);
    }

    #[test]
    fn test_response_without_parts_is_empty_text() {
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#).unwrap();
        assert_eq!(parsed.into_text().unwrap(), "");
    }

    #[test]
    fn test_response_without_candidates_is_invalid() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(parsed.into_text(), Err(LlmError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = GeminiClient::new(&settings("http://127.0.0.1:9", None)).unwrap();
        assert!(!client.is_configured());

        let result = client.generate(&GenerateRequest::new("m", "p")).await;
        assert!(matches!(result, Err(LlmError::NotConfigured(_))));
    }
}
