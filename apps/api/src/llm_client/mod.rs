/// LLM client: the single point of entry for all Gemini API calls in SoulSync.
///
/// ARCHITECTURAL RULE: No other module may call the generation API directly.
/// Everything goes through a `GenerationBackend`, which this module implements
/// over the Gemini `generateContent` REST endpoint.
///
/// Models are hardcoded per use case to prevent drift.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod cleaning;
pub mod prompts;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Fast model for question batches and loading facts.
pub const QUESTION_MODEL: &str = "gemini-2.5-flash";
/// Stronger model for the full psychological analysis.
pub const ANALYSIS_MODEL: &str = "gemini-3-pro-preview";
pub const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Generation API key is missing")]
    MissingCredential,
}

/// A text-generation request. `schema` constrains output where the API supports it.
#[derive(Debug, Clone)]
pub struct TextRequest<'a> {
    pub model: &'a str,
    pub system: &'a str,
    pub prompt: &'a str,
    pub schema: Option<Value>,
}

/// An inline binary payload returned by the image model.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    /// Already base64-encoded by the API.
    pub data: String,
}

impl InlineImage {
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// The seam between the generation policy and the remote service.
/// Carried in `AppState` as `Arc<dyn GenerationBackend>`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Returns the raw (uncleaned) text of the first candidate.
    async fn generate_text(&self, request: TextRequest<'_>) -> Result<String, LlmError>;

    /// Returns the first inline image of the first candidate, if any.
    async fn generate_image(&self, prompt: &str) -> Result<Option<InlineImage>, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter())
            .into_iter()
            .flatten()
    }

    /// Concatenated text of the first candidate. `None` when there is no text.
    pub fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline image of the first candidate.
    pub fn first_inline_image(&self) -> Option<InlineImage> {
        self.parts()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| !d.data.is_empty())
            .map(|d| InlineImage {
                mime_type: d.mime_type.clone(),
                data: d.data.clone(),
            })
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The production backend. Constructed once at startup and shared via `AppState`.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
    max_attempts: u32,
}

impl GeminiClient {
    /// Fails immediately when the credential is blank so a misconfigured
    /// deployment never reaches its first quiz.
    pub fn new(
        api_key: String,
        api_base: String,
        timeout: Duration,
        max_attempts: u32,
    ) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingCredential);
        }

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            max_attempts: max_attempts.max(1),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }

    /// Makes a raw call to `generateContent`, returning the full response object.
    /// Retries on 429 and 5xx with exponential backoff when `max_attempts > 1`.
    async fn call(
        &self,
        model: &str,
        body: &GenerateContentRequest<'_>,
    ) -> Result<GenerateContentResponse, LlmError> {
        let url = self.endpoint(model);
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1).min(5)));
                warn!(
                    "Gemini call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Gemini API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: GenerateContentResponse = response.json().await?;

            if let Some(usage) = &parsed.usage_metadata {
                debug!(
                    "Gemini call succeeded: model={}, prompt_tokens={}, output_tokens={}",
                    model, usage.prompt_token_count, usage.candidates_token_count
                );
            }

            return Ok(parsed);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: self.max_attempts,
        }))
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate_text(&self, request: TextRequest<'_>) -> Result<String, LlmError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![TextPart {
                    text: request.prompt,
                }],
            }],
            system_instruction: Some(SystemInstruction {
                parts: vec![TextPart {
                    text: request.system,
                }],
            }),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: request.schema,
            }),
        };

        let response = self.call(request.model, &body).await?;
        response.text().ok_or(LlmError::EmptyContent)
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<InlineImage>, LlmError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![TextPart { text: prompt }],
            }],
            system_instruction: None,
            generation_config: None,
        };

        let response = self.call(IMAGE_MODEL, &body).await?;
        Ok(response.first_inline_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_key_is_rejected_at_construction() {
        let result = GeminiClient::new(
            "   ".to_string(),
            DEFAULT_API_BASE.to_string(),
            Duration::from_secs(5),
            1,
        );
        assert!(matches!(result, Err(LlmError::MissingCredential)));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = GeminiClient::new(
            "key".to_string(),
            "https://example.test/v1beta/".to_string(),
            Duration::from_secs(5),
            0,
        )
        .unwrap();
        assert_eq!(
            client.endpoint(QUESTION_MODEL),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(client.max_attempts, 1);
    }

    #[test]
    fn test_request_serializes_gemini_shape() {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![TextPart { text: "hello" }],
            }],
            system_instruction: Some(SystemInstruction {
                parts: vec![TextPart { text: "be terse" }],
            }),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: None,
            }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be terse");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(json["generationConfig"].get("responseSchema").is_none());
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let json = r#"{
            "candidates": [{"content": {"parts": [{"text": "[{\"id\":"}, {"text": "1}]"}]}}],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 4}
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().as_deref(), Some("[{\"id\":1}]"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());
        assert!(response.first_inline_image().is_none());
    }

    #[test]
    fn test_first_inline_image_skips_text_parts() {
        let json = r#"{
            "candidates": [{"content": {"parts": [
                {"text": "Here is your image"},
                {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}},
                {"inlineData": {"mimeType": "image/jpeg", "data": "/9j/4AAQ"}}
            ]}}]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let image = response.first_inline_image().unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.to_data_uri(), "data:image/png;base64,iVBORw0KGgo=");
    }
}
