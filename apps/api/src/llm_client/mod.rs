//! LLM Client: the single point of entry for all generative-text calls in the mentor API.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! Call sites build a prompt, hand a `GenerationRequest` to a `Pipeline`
//! (retry + degraded replies), and optionally run the text through `recover`.
//!
//! Model: gemini-2.5-flash (hardcoded, not configurable)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod extract;
pub mod prompts;
pub mod recover;
pub mod retry;
pub mod turns;

use extract::{extract_candidate_text, first_candidate, truncation_reason, TruncationReason};

/// The model used for all generation calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.5-flash";

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response envelope contained no candidates")]
    NoCandidates,

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Client errors other than timeout / rate limiting will fail the same way
    /// on every attempt, so the retry loop gives up on them immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Api { status, .. } => matches!(status, 408 | 429) || *status >= 500,
            _ => true,
        }
    }
}

/// Sampling parameters sent as `generationConfig`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: Some(40),
            top_p: Some(0.95),
            max_output_tokens: 1024,
        }
    }
}

/// One prompt plus its sampling parameters. Built per user action and dropped
/// once the reply is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub config: GenerationConfig,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            config: GenerationConfig::default(),
        }
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.config.max_output_tokens = tokens;
        self
    }

    /// Clamped to [0, 1].
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature.clamp(0.0, 1.0);
        self
    }

    pub fn top_k(mut self, top_k: Option<u32>) -> Self {
        self.config.top_k = top_k;
        self
    }

    pub fn top_p(mut self, top_p: Option<f32>) -> Self {
        self.config.top_p = top_p;
        self
    }
}

/// What a single successful call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResponse {
    Text(String),
    /// The provider stopped early and no text could be extracted.
    Truncated(TruncationReason),
}

/// Anything that turns a prompt into text. `GeminiClient` in production,
/// scripted fakes in tests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, LlmError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Wraps the Gemini `generateContent` endpoint. Makes exactly one HTTP call per
/// `generate`; retrying is the `Pipeline`'s job.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, MODEL)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, LlmError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: &request.config,
        };

        // The key travels in the query string; strip the URL from transport
        // errors so it never reaches the logs.
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.without_url()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Http(e.without_url()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            warn!("Gemini API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Value = serde_json::from_str(&text)?;
        interpret_envelope(&envelope)
    }
}

/// Reduces a 2xx envelope to text, a truncation, or a hard failure.
pub fn interpret_envelope(envelope: &Value) -> Result<GenerationResponse, LlmError> {
    if let Some(message) = envelope
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return Err(LlmError::Api {
            status: 200,
            message: message.to_string(),
        });
    }

    let candidate = first_candidate(envelope).ok_or(LlmError::NoCandidates)?;

    if let Some(text) = extract_candidate_text(candidate) {
        debug!("Generation succeeded: {} chars", text.len());
        return Ok(GenerationResponse::Text(text));
    }

    match truncation_reason(candidate) {
        Some(reason) => {
            warn!("Generation stopped early ({:?}) with no usable text", reason);
            Ok(GenerationResponse::Truncated(reason))
        }
        None => Err(LlmError::EmptyContent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(
            "test-key".to_string(),
            server.uri(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn generate_path() -> String {
        format!("/{MODEL}:generateContent")
    }

    #[test]
    fn test_request_body_matches_provider_contract() {
        let request = GenerationRequest::new("Explain gravity").max_output_tokens(300);
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: &request.config,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "Explain gravity");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 300);
        assert_eq!(value["generationConfig"]["topK"], 40);
        assert!(value["generationConfig"].get("temperature").is_some());
    }

    #[test]
    fn test_unset_sampling_fields_are_omitted() {
        let request = GenerationRequest::new("hi").top_k(None).top_p(None);
        let value = serde_json::to_value(&request.config).unwrap();
        assert!(value.get("topK").is_none());
        assert!(value.get("topP").is_none());
    }

    #[test]
    fn test_temperature_is_clamped() {
        assert_eq!(GenerationRequest::new("x").temperature(1.7).config.temperature, 1.0);
        assert_eq!(GenerationRequest::new("x").temperature(-0.2).config.temperature, 0.0);
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        let bad_request = LlmError::Api {
            status: 400,
            message: "bad".into(),
        };
        let rate_limited = LlmError::Api {
            status: 429,
            message: "slow down".into(),
        };
        let server = LlmError::Api {
            status: 503,
            message: "busy".into(),
        };
        assert!(!bad_request.is_retryable());
        assert!(rate_limited.is_retryable());
        assert!(server.is_retryable());
        assert!(LlmError::EmptyContent.is_retryable());
    }

    #[test]
    fn test_interpret_envelope_error_body_is_hard_failure() {
        let envelope = json!({"error": {"message": "API key not valid"}});
        assert!(matches!(
            interpret_envelope(&envelope),
            Err(LlmError::Api { .. })
        ));
    }

    #[test]
    fn test_interpret_envelope_without_candidates() {
        let envelope = json!({"candidates": []});
        assert!(matches!(
            interpret_envelope(&envelope),
            Err(LlmError::NoCandidates)
        ));
    }

    #[test]
    fn test_interpret_envelope_truncated_without_text() {
        let envelope = json!({"candidates": [{"content": {"parts": []}, "finishReason": "MAX_TOKENS"}]});
        assert_eq!(
            interpret_envelope(&envelope).unwrap(),
            GenerationResponse::Truncated(TruncationReason::Length)
        );
    }

    #[test]
    fn test_interpret_envelope_text_wins_over_finish_reason() {
        let envelope = json!({"candidates": [{
            "content": {"parts": [{"text": "partial answer"}]},
            "finishReason": "MAX_TOKENS"
        }]});
        assert_eq!(
            interpret_envelope(&envelope).unwrap(),
            GenerationResponse::Text("partial answer".into())
        );
    }

    #[test]
    fn test_interpret_envelope_no_text_no_reason_is_empty_content() {
        let envelope = json!({"candidates": [{"content": {"parts": [{"text": "   "}]}}]});
        assert!(matches!(
            interpret_envelope(&envelope),
            Err(LlmError::EmptyContent)
        ));
    }

    #[tokio::test]
    async fn test_generate_returns_primary_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(generate_path()))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "Hello"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .generate(&GenerationRequest::new("Say hello"))
            .await
            .unwrap();
        assert_eq!(response, GenerationResponse::Text("Hello".into()));
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_and_config() {
        let server = MockServer::start().await;
        let request = GenerationRequest::new("Tell me about rockets")
            .max_output_tokens(2048)
            .top_p(Some(0.5));
        let expected = json!({
            "contents": [{"parts": [{"text": "Tell me about rockets"}]}],
            "generationConfig": {
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.5,
                "maxOutputTokens": 2048
            }
        });
        Mock::given(method("POST"))
            .and(body_json(expected))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "Rockets fly"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).generate(&request).await.unwrap();
        assert_eq!(response, GenerationResponse::Text("Rockets fly".into()));
    }

    #[tokio::test]
    async fn test_generate_non_success_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"error": {"message": "internal"}})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate(&GenerationRequest::new("x"))
            .await
            .unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "internal");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate(&GenerationRequest::new("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[tokio::test]
    async fn test_distinct_prompts_produce_distinct_request_bodies() {
        use crate::llm_client::prompts::{build_prompt, PromptOptions};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let options = PromptOptions::default();
        let first = build_prompt("Explain simply: {input}", "What is a loan?", &options);
        let second = build_prompt("Explain simply: {input}", "What is a salary?", &options);
        assert_ne!(first, second);

        client.generate(&GenerationRequest::new(first)).await.unwrap();
        client.generate(&GenerationRequest::new(second)).await.unwrap();

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 2);
        assert_ne!(received[0].body, received[1].body);
        let body: Value = serde_json::from_slice(&received[1].body).unwrap();
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Explain simply: What is a salary?"
        );
    }
}
