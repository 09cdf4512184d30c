//! Gemini client — the single point of entry for all generative-language
//! API calls in CVLens.
//!
//! ARCHITECTURAL RULE: no other module may talk to the Gemini API directly.
//! Handlers depend on the `GenerativeModel` trait, not on this transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::ModelConfig;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("no API key configured")]
    MissingCredential,

    #[error("API key rejected: {0}")]
    InvalidCredential(String),

    #[error("quota exhausted: {0}")]
    Quota(String),

    #[error("call exceeded deadline")]
    Timeout,

    #[error("network failure: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("response contained no text content")]
    EmptyContent,
}

/// A document (résumé page or PDF) plus the instruction describing what the
/// model should produce. The instruction is responsible for demanding JSON.
#[derive(Debug, Clone)]
pub struct DocumentRequest {
    pub instruction: String,
    pub base64_data: String,
    pub mime_type: String,
}

/// The capability seam. `AppState` carries `Arc<dyn GenerativeModel>` so the
/// analysis pipeline can be exercised against a scripted stub in tests.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Submits the document and instruction exactly once and returns the raw
    /// text reply. No retries, no streaming.
    async fn generate(&self, request: &DocumentRequest) -> Result<String, GeminiError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (generateContent REST shape)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(rename = "inline_data", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    #[serde(rename = "mime_type")]
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "topP")]
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate's first text part.
    fn text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .find_map(|part| part.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    error: GeminiApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiApiErrorBody {
    message: String,
    #[serde(default)]
    status: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Concrete Gemini transport. Explicitly constructed in `main.rs` from
/// configuration — never an ambient singleton.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: ModelConfig,
}

impl GeminiClient {
    /// Fails with `MissingCredential` rather than deferring to the first call.
    pub fn new(
        api_key: String,
        model: ModelConfig,
        timeout: Duration,
    ) -> Result<Self, GeminiError> {
        if api_key.trim().is_empty() {
            return Err(GeminiError::MissingCredential);
        }
        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            model,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model.model_name
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &DocumentRequest) -> Result<String, GeminiError> {
        let url = format!(
            "{GEMINI_API_BASE}/{}:generateContent",
            self.model.model_name
        );
        let body = request_body(request, &self.model);

        let response = self
            .client
            .post(&url)
            // Key travels in a header, never in the URL or the logs.
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status().as_u16();
        let raw = response.text().await.map_err(classify_transport_error)?;

        if !(200..300).contains(&status) {
            return Err(classify_api_error(status, &raw));
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&raw).map_err(|e| GeminiError::Api {
                status,
                message: format!("unparseable response body: {e}"),
            })?;

        let text = parsed.text().ok_or(GeminiError::EmptyContent)?;
        debug!("Gemini call succeeded: {} chars of text", text.len());
        Ok(text.to_string())
    }
}

fn request_body<'a>(
    request: &'a DocumentRequest,
    model: &ModelConfig,
) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part {
                    text: Some(&request.instruction),
                    inline_data: None,
                },
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: &request.mime_type,
                        data: &request.base64_data,
                    }),
                },
            ],
        }],
        generation_config: GenerationConfig {
            temperature: model.temperature,
            max_output_tokens: model.max_output_tokens,
            top_p: model.top_p,
        },
    }
}

/// Maps reqwest failures to the error taxonomy. Timeout is distinct from
/// connectivity so the user guidance differs.
fn classify_transport_error(err: reqwest::Error) -> GeminiError {
    if err.is_timeout() {
        GeminiError::Timeout
    } else {
        GeminiError::Network(err.to_string())
    }
}

/// Maps a non-2xx status plus body to the error taxonomy. Pure so the
/// classification rules stay unit-testable without a network.
fn classify_api_error(status: u16, raw_body: &str) -> GeminiError {
    let (message, api_status) = match serde_json::from_str::<GeminiApiError>(raw_body) {
        Ok(parsed) => (parsed.error.message, parsed.error.status),
        Err(_) => (raw_body.to_string(), String::new()),
    };

    if status == 429 || api_status == "RESOURCE_EXHAUSTED" || message.contains("quota") {
        return GeminiError::Quota(message);
    }
    if message.contains("API key not valid") || message.contains("API_KEY_INVALID") {
        return GeminiError::InvalidCredential(message);
    }
    GeminiError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> DocumentRequest {
        DocumentRequest {
            instruction: "Describe this document.".to_string(),
            base64_data: "QUJD".to_string(),
            mime_type: "image/jpeg".to_string(),
        }
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let result = GeminiClient::new(
            String::new(),
            ModelConfig::default(),
            Duration::from_secs(25),
        );
        assert!(matches!(result, Err(GeminiError::MissingCredential)));
    }

    #[test]
    fn test_request_body_wire_shape() {
        let request = sample_request();
        let model = ModelConfig::default();
        let value = serde_json::to_value(request_body(&request, &model)).unwrap();

        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "Describe this document.");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(parts[1]["inline_data"]["data"], "QUJD");
        // text part must not carry an inline_data key and vice versa
        assert!(parts[0].get("inline_data").is_none());
        assert!(parts[1].get("text").is_none());

        let config = &value["generationConfig"];
        assert_eq!(config["maxOutputTokens"], 8192);
        assert!((config["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!((config["topP"].as_f64().unwrap() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_response_text_extraction() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"ok\": true}"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text(), Some("{\"ok\": true}"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.text(), None);
    }

    #[test]
    fn test_classify_429_as_quota() {
        let err = classify_api_error(429, r#"{"error": {"message": "Rate limited", "status": "RESOURCE_EXHAUSTED"}}"#);
        assert!(matches!(err, GeminiError::Quota(_)));
    }

    #[test]
    fn test_classify_resource_exhausted_status_as_quota() {
        let err = classify_api_error(
            403,
            r#"{"error": {"message": "Daily limit reached", "status": "RESOURCE_EXHAUSTED"}}"#,
        );
        assert!(matches!(err, GeminiError::Quota(_)));
    }

    #[test]
    fn test_classify_invalid_key() {
        let err = classify_api_error(
            400,
            r#"{"error": {"message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#,
        );
        assert!(matches!(err, GeminiError::InvalidCredential(_)));
    }

    #[test]
    fn test_classify_unparseable_body_keeps_raw_message() {
        let err = classify_api_error(500, "upstream exploded");
        match err {
            GeminiError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
