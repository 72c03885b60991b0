//! LLM provider abstractions for legalease-runtime.
//!
//! This module defines the trait the gateway calls and the Gemini
//! implementation used in production.
//!
//! ## Security
//!
//! All providers use the [`secrets`] module for credential handling.
//! See [`ApiCredential`] for the recommended patterns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use legalease_core::FailureKind;

use crate::resilience::RemoteFailure;

mod factory;
pub mod secrets;

#[cfg(feature = "gemini")]
mod gemini;

pub use factory::{ProviderFactory, ProviderRegistry};
pub use secrets::{ApiCredential, CredentialSource};

#[cfg(feature = "gemini")]
pub use gemini::{GeminiProvider, GeminiProviderFactory, DEFAULT_GEMINI_BASE_URL, GEMINI_API_KEY_ENV};

/// Model used when the configuration does not name one.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Errors from LLM providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded (429), retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider returned no text: {0}")]
    EmptyResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

impl ProviderError {
    /// Whether this error means the provider is throttling us.
    ///
    /// Typed 429s are recognised directly; everything else is matched on its
    /// description, since some APIs report quota exhaustion with other codes.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            ProviderError::RateLimited { .. } => true,
            ProviderError::Timeout(_) | ProviderError::NotConfigured(_) => false,
            other => legalease_core::is_rate_limit_signature(&other.to_string()),
        }
    }

    /// Map onto the gateway's failure taxonomy.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ProviderError::NotConfigured(_) => FailureKind::CredentialMissing,
            _ if self.is_rate_limited() => FailureKind::RateLimited,
            _ => FailureKind::TransportFailure,
        }
    }
}

impl RemoteFailure for ProviderError {
    fn timed_out(after: Duration) -> Self {
        ProviderError::Timeout(after)
    }

    fn failure_kind(&self) -> FailureKind {
        ProviderError::failure_kind(self)
    }
}

/// Configuration for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Model to use
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature; provider default when `None`
    pub temperature: Option<f32>,

    /// Request timeout
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            temperature: None,
            timeout: Duration::from_secs(20),
        }
    }
}

/// A chat message for LLM completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system" or "user"; "assistant" for prior model turns
    pub role: String,

    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Normalized response from an LLM completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text
    pub content: String,

    /// Token usage
    pub usage: TokenUsage,

    /// Model that answered
    pub model: String,

    /// Finish reason reported by the provider
    pub stop_reason: Option<String>,
}

/// Token usage from a completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,

    /// Tokens in the completion
    pub completion_tokens: u32,

    /// Prompt tokens served from the provider's context cache
    pub cached_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used.
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Provider abstraction allows swapping LLM backends.
///
/// The gateway is the only caller; it owns timeouts and fallback, so
/// implementations simply report failures as [`ProviderError`].
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Execute a completion.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Check if provider is usable (credential present, client built).
    async fn health_check(&self) -> bool;

    /// Get provider name for logs.
    fn name(&self) -> &str;
}
