//! Google Gemini provider implementation.
//!
//! Talks to the `generateContent` REST endpoint. System messages become the
//! request's `systemInstruction`; user and assistant messages become
//! `contents` with roles `user` and `model`.
//!
//! ## Security
//!
//! The API key is held in an [`ApiCredential`] and sent only as the
//! `x-goog-api-key` header, never as a query parameter, so it cannot leak
//! through URLs in error messages.

use super::{
    factory::ProviderFactory,
    secrets::{ApiCredential, CredentialSource},
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable name for the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Public Gemini API root.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini provider.
pub struct GeminiProvider {
    credential: ApiCredential,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn build_client() -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("failed to build HTTP client: {e}")))
}

impl GeminiProvider {
    /// Create a provider from an API key.
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            credential: ApiCredential::new(
                api_key,
                CredentialSource::Programmatic,
                "Gemini API key",
            ),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            client: build_client()?,
        })
    }

    /// Create from JSON configuration with environment fallback.
    ///
    /// Recognised keys: `api_key`, `api_key_env` (defaults to
    /// `GEMINI_API_KEY`), `base_url`.
    pub fn from_config(config: &JsonValue) -> Result<Self, ProviderError> {
        let env_var = config["api_key_env"].as_str().unwrap_or(GEMINI_API_KEY_ENV);
        let credential =
            ApiCredential::from_config_or_env(config, "api_key", env_var, "Gemini API key")?;

        let base_url = config["base_url"]
            .as_str()
            .unwrap_or(DEFAULT_GEMINI_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        tracing::debug!(source = %credential.source(), base_url = %base_url, "Gemini credential loaded");

        Ok(Self {
            credential,
            base_url,
            client: build_client()?,
        })
    }

    /// Set custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

/// Gemini API request format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Gemini API response format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    cached_content_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

fn text_content(role: Option<&str>, text: String) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part { text: Some(text) }],
    }
}

fn build_request(messages: Vec<ChatMessage>, config: &CompletionConfig) -> GenerateContentRequest {
    let mut system_parts = Vec::new();
    let mut contents = Vec::new();

    for msg in messages {
        match msg.role.as_str() {
            "system" => system_parts.push(msg.content),
            "assistant" => contents.push(text_content(Some("model"), msg.content)),
            _ => contents.push(text_content(Some("user"), msg.content)),
        }
    }

    let system_instruction = if system_parts.is_empty() {
        None
    } else {
        Some(text_content(None, system_parts.join("\n\n")))
    };

    GenerateContentRequest {
        contents,
        system_instruction,
        generation_config: GenerationConfig {
            max_output_tokens: config.max_tokens,
            temperature: config.temperature,
        },
    }
}

fn parse_response(
    body: GenerateContentResponse,
    requested_model: &str,
) -> Result<CompletionResponse, ProviderError> {
    let usage = body
        .usage_metadata
        .map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            cached_tokens: u.cached_content_token_count,
        })
        .unwrap_or_default();

    let Some(candidate) = body.candidates.into_iter().next() else {
        let reason = body
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked ({r})"))
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(ProviderError::EmptyResponse(reason));
    };

    let content = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if content.trim().is_empty() {
        let reason = candidate
            .finish_reason
            .unwrap_or_else(|| "empty candidate".to_string());
        return Err(ProviderError::EmptyResponse(reason));
    }

    Ok(CompletionResponse {
        content,
        usage,
        model: body
            .model_version
            .unwrap_or_else(|| requested_model.to_string()),
        stop_reason: candidate.finish_reason,
    })
}

fn error_from_status(status: u16, body: &str) -> ProviderError {
    let message = serde_json::from_str::<GeminiError>(body)
        .map(|e| match e.error.status {
            Some(code) => format!("{} ({})", e.error.message, code),
            None => e.error.message,
        })
        .unwrap_or_else(|_| body.trim().chars().take(200).collect());

    match status {
        401 | 403 => ProviderError::AuthError(message),
        _ => ProviderError::ApiError { status, message },
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = build_request(messages, config);

        // SECURITY: Only expose the credential here, at the point of use
        let response = self
            .client
            .post(self.endpoint(&config.model))
            .header("x-goog-api-key", self.credential.expose())
            .header("content-type", "application/json")
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(config.timeout)
                } else {
                    ProviderError::HttpError(e.without_url().to_string())
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ProviderError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_status(status.as_u16(), &body));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.without_url().to_string()))?;

        parse_response(body, &config.model)
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Factory for creating Gemini providers from configuration.
///
/// ## Configuration Format
/// ```json
/// {
///   "api_key": "AIza...",           // Optional, falls back to the env var
///   "api_key_env": "GEMINI_API_KEY", // Optional, env var to read
///   "base_url": "https://..."        // Optional, custom API root
/// }
/// ```
pub struct GeminiProviderFactory;

impl ProviderFactory for GeminiProviderFactory {
    fn provider_type(&self) -> &'static str {
        "gemini"
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        self.validate_config(config)?;
        Ok(Arc::new(GeminiProvider::from_config(config)?))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        let env_var = config["api_key_env"].as_str().unwrap_or(GEMINI_API_KEY_ENV);
        if !ApiCredential::is_available(config, "api_key", env_var) {
            return Err(ProviderError::NotConfigured(format!(
                "Gemini API key required: set 'api_key' in config or {} env",
                env_var
            )));
        }

        if let Some(url) = config["base_url"].as_str() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ProviderError::NotConfigured(
                    "base_url must start with http:// or https://".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(
            provider.endpoint("gemini-2.0-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_build_request_splits_system() {
        let request = build_request(
            vec![
                ChatMessage::system("Persona"),
                ChatMessage::user("User question: hi"),
                ChatMessage {
                    role: "assistant".to_string(),
                    content: "Hello".to_string(),
                },
            ],
            &CompletionConfig::default(),
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Persona");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "User question: hi");
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1024);
        assert!(json["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn test_build_request_without_system() {
        let request = build_request(vec![ChatMessage::user("Simplify")], &CompletionConfig::default());
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let body: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hel" }, { "text": "lo" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 3 },
            "modelVersion": "gemini-2.0-flash-001"
        }))
        .unwrap();

        let response = parse_response(body, "gemini-2.0-flash").unwrap();
        assert_eq!(response.content, "Hello");
        assert_eq!(response.usage.total(), 15);
        assert_eq!(response.model, "gemini-2.0-flash-001");
        assert_eq!(response.stop_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_parse_response_blocked_prompt() {
        let body: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();

        match parse_response(body, "gemini-2.0-flash") {
            Err(ProviderError::EmptyResponse(reason)) => assert!(reason.contains("SAFETY")),
            other => panic!("Expected EmptyResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_response_empty_text() {
        let body: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [] }, "finishReason": "MAX_TOKENS" }]
        }))
        .unwrap();

        assert!(matches!(
            parse_response(body, "m"),
            Err(ProviderError::EmptyResponse(reason)) if reason == "MAX_TOKENS"
        ));
    }

    #[test]
    fn test_error_from_status() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        match error_from_status(400, body) {
            ProviderError::ApiError { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid. (INVALID_ARGUMENT)");
            }
            other => panic!("Expected ApiError, got {other:?}"),
        }

        assert!(matches!(error_from_status(403, "denied"), ProviderError::AuthError(m) if m == "denied"));

        let quota = r#"{"error":{"message":"Resource has been exhausted (e.g. check quota).","status":"RESOURCE_EXHAUSTED"}}"#;
        assert!(error_from_status(503, quota).is_rate_limited());
    }

    #[test]
    fn test_factory_create_with_api_key() {
        let provider = GeminiProviderFactory
            .create(&serde_json::json!({ "api_key": "test-api-key" }))
            .unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_factory_rejects_missing_key() {
        let config = serde_json::json!({ "api_key_env": "LEGALEASE_TEST_UNSET_GEMINI_KEY" });
        assert!(matches!(
            GeminiProviderFactory.create(&config),
            Err(ProviderError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_factory_validate_invalid_base_url() {
        let config = serde_json::json!({
            "api_key": "test-key",
            "base_url": "invalid-url"
        });
        assert!(GeminiProviderFactory.validate_config(&config).is_err());
    }

    #[test]
    fn test_from_config_trims_base_url() {
        let provider = GeminiProvider::from_config(&serde_json::json!({
            "api_key": "config-api-key",
            "base_url": "http://127.0.0.1:8080/v1beta/"
        }))
        .unwrap();
        assert_eq!(provider.base_url, "http://127.0.0.1:8080/v1beta");
        assert_eq!(provider.credential.source(), CredentialSource::Config);
    }

    #[test]
    fn test_api_key_not_in_debug_output() {
        let secret_key = "AIza-super-secret-key-12345";
        let provider = GeminiProvider::new(secret_key).unwrap();

        let debug_output = format!("{:?}", provider);
        assert!(!debug_output.contains(secret_key), "API key was exposed in Debug output!");
        assert!(debug_output.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_health_check_requires_key() {
        assert!(GeminiProvider::new("key").unwrap().health_check().await);
        assert!(!GeminiProvider::new("").unwrap().health_check().await);
    }
}
