//! # legalease-runtime
//!
//! The async half of LegalEase: the AI provider, the resilient gateway in
//! front of it, and the authentication backend client.
//!
//! ## Guarantees
//!
//! [`ResilientRequestGateway::chat`] and [`ResilientRequestGateway::simplify`]
//! always resolve to non-empty text within the request timeout (plus the
//! configured simulated latency). Missing credentials, network errors, rate
//! limits and timeouts are absorbed into fixed or canned text from
//! `legalease-core`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use legalease_runtime::{ProviderRegistry, ResilientRequestGateway, RuntimeConfig};
//!
//! # async fn run() -> Result<(), legalease_runtime::ConfigError> {
//! let config = RuntimeConfig::default();
//! let gateway = ResilientRequestGateway::from_config(&config, &ProviderRegistry::with_defaults())?;
//!
//! let reply = gateway.chat("What are my consumer rights?").await;
//! assert!(!reply.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod gateway;
pub mod prompts;
pub mod providers;
pub mod resilience;

pub use backend::{BackendClient, BackendError, Session, User};
pub use config::{BackendConfig, ConfigError, RuntimeConfig};
pub use gateway::{GatewayBuilder, ResilientRequestGateway};
pub use providers::{
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError,
    ProviderRegistry, TokenUsage,
};
pub use resilience::{RemoteFailure, Resolved, WithFallback};

pub use legalease_core::{FailureKind, Operation, Outcome, SubstitutionReason};
