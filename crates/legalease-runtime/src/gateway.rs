//! The resilient request gateway.
//!
//! The gateway answers `chat` and `simplify` requests. It never returns an
//! error: every failure mode is absorbed into fixed or canned text.
//!
//! # Availability
//! Whether a provider exists is decided once, at construction. A gateway
//! built without one serves canned answers for its whole lifetime, after a
//! simulated latency, and never touches the network.
//!
//! # Failure handling
//! With a provider, each request is a single attempt bounded by the request
//! timeout. Failures map to:
//! - chat: the rate-limit notice when the error looks like throttling,
//!   otherwise the generic failure notice
//! - simplify: a failure text embedding the error description

use std::sync::Arc;
use std::time::Duration;

use legalease_core::notices::{
    simplify_failure, CHAT_FAILURE_NOTICE, CREDENTIAL_REQUIRED_NOTICE, EMPTY_DOCUMENT_NOTICE,
    RATE_LIMIT_NOTICE,
};
use legalease_core::{CannedResponseTable, FailureKind, Operation, Outcome, SubstitutionReason};

use crate::config::{ConfigError, RuntimeConfig};
use crate::prompts;
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider, ProviderError, ProviderRegistry};
use crate::resilience::WithFallback;

/// Gateway between callers and the AI provider.
///
/// `Send + Sync`; share it behind an `Arc`.
pub struct ResilientRequestGateway {
    /// `None` means unavailable, permanently
    provider: Option<Arc<dyn LlmProvider>>,

    table: Arc<CannedResponseTable>,

    completion: CompletionConfig,

    chat_fallback_delay: Duration,

    simplify_fallback_delay: Duration,
}

impl std::fmt::Debug for ResilientRequestGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientRequestGateway")
            .field("provider", &self.provider_name())
            .field("model", &self.completion.model)
            .field("canned_entries", &self.table.entries().len())
            .finish()
    }
}

impl ResilientRequestGateway {
    /// Start building a gateway.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }

    /// Build a gateway from configuration.
    ///
    /// A provider that cannot be created (missing credential, unknown type)
    /// is logged and leaves the gateway unavailable. Only an unreadable
    /// canned table is an error.
    pub fn from_config(
        config: &RuntimeConfig,
        registry: &ProviderRegistry,
    ) -> Result<Self, ConfigError> {
        let table = config.canned_table()?;

        let provider = match registry.create(&config.provider, &config.provider_settings()) {
            Ok(provider) => {
                tracing::info!(
                    provider = provider.name(),
                    model = %config.model,
                    "AI provider initialized"
                );
                Some(provider)
            }
            Err(e) => {
                tracing::warn!(
                    provider = %config.provider,
                    error = %e,
                    "AI provider unavailable, serving canned responses"
                );
                None
            }
        };

        let mut builder = GatewayBuilder::new().config(config).table(table);
        builder.provider = provider;
        Ok(builder.build())
    }

    /// Whether requests reach a live provider.
    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Name of the live provider, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// Whether the provider reports itself usable. Always false when unavailable.
    pub async fn health_check(&self) -> bool {
        match self.provider.as_deref() {
            Some(provider) => provider.health_check().await,
            None => false,
        }
    }

    /// The canned table used while unavailable.
    pub fn table(&self) -> &CannedResponseTable {
        &self.table
    }

    /// Answer a legal question. Never fails.
    pub async fn chat(&self, message: &str) -> String {
        self.invoke(Operation::chat(message)).await.into_text()
    }

    /// Rewrite a document in plain language. Never fails.
    pub async fn simplify(&self, document: &str) -> String {
        self.invoke(Operation::simplify(document)).await.into_text()
    }

    /// Handle an operation and report whether the text was substituted.
    pub async fn invoke(&self, operation: Operation) -> Outcome {
        let name = operation.name();
        let outcome = match operation {
            Operation::Chat { message } => self.handle_chat(&message).await,
            Operation::Simplify { document } => self.handle_simplify(&document).await,
        };

        match outcome.reason() {
            None => tracing::debug!(operation = name, "Returning live provider text"),
            Some(reason) => tracing::debug!(operation = name, %reason, "Returning substituted text"),
        }
        outcome
    }

    async fn handle_chat(&self, message: &str) -> Outcome {
        let Some(provider) = self.provider.as_deref() else {
            tokio::time::sleep(self.chat_fallback_delay).await;
            return Outcome::substituted(
                self.table.respond(message),
                SubstitutionReason::Failure(FailureKind::CredentialMissing),
            );
        };

        self.fallback("chat")
            .run(
                self.complete(provider, prompts::chat_messages(message)),
                |err: &ProviderError| {
                    if err.is_rate_limited() {
                        RATE_LIMIT_NOTICE.to_string()
                    } else {
                        CHAT_FAILURE_NOTICE.to_string()
                    }
                },
            )
            .await
            .into_outcome()
    }

    async fn handle_simplify(&self, document: &str) -> Outcome {
        let Some(provider) = self.provider.as_deref() else {
            tokio::time::sleep(self.simplify_fallback_delay).await;
            return Outcome::substituted(
                CREDENTIAL_REQUIRED_NOTICE,
                SubstitutionReason::Failure(FailureKind::CredentialMissing),
            );
        };

        if document.trim().is_empty() {
            return Outcome::substituted(EMPTY_DOCUMENT_NOTICE, SubstitutionReason::EmptyDocument);
        }

        self.fallback("simplify")
            .run(
                self.complete(provider, prompts::simplify_messages(document)),
                |err: &ProviderError| simplify_failure(&err.to_string()),
            )
            .await
            .into_outcome()
    }

    fn fallback(&self, label: &'static str) -> WithFallback {
        WithFallback::new(label).timeout(self.completion.timeout)
    }

    async fn complete(
        &self,
        provider: &dyn LlmProvider,
        messages: Vec<ChatMessage>,
    ) -> Result<String, ProviderError> {
        let response = provider.complete(messages, &self.completion).await?;

        if response.content.trim().is_empty() {
            return Err(ProviderError::EmptyResponse(
                response.stop_reason.unwrap_or_else(|| "blank completion".to_string()),
            ));
        }

        tracing::debug!(
            provider = provider.name(),
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            total_tokens = response.usage.total(),
            "Completion received"
        );
        Ok(response.content)
    }
}

/// Builder for [`ResilientRequestGateway`].
///
/// Without [`GatewayBuilder::provider`] the gateway is unavailable.
pub struct GatewayBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    table: Option<CannedResponseTable>,
    completion: CompletionConfig,
    chat_fallback_delay: Duration,
    simplify_fallback_delay: Duration,
}

impl GatewayBuilder {
    /// Create a builder with default settings and no provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the LLM provider.
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Take model, timeout and delays from configuration.
    pub fn config(mut self, config: &RuntimeConfig) -> Self {
        self.completion = config.completion_config();
        self.chat_fallback_delay = config.chat_fallback_delay;
        self.simplify_fallback_delay = config.simplify_fallback_delay;
        self
    }

    /// Replace the built-in canned table.
    pub fn table(mut self, table: CannedResponseTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Build the gateway.
    pub fn build(self) -> ResilientRequestGateway {
        ResilientRequestGateway {
            provider: self.provider,
            table: Arc::new(self.table.unwrap_or_default()),
            completion: self.completion,
            chat_fallback_delay: self.chat_fallback_delay,
            simplify_fallback_delay: self.simplify_fallback_delay,
        }
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        let config = RuntimeConfig::default();
        Self {
            provider: None,
            table: None,
            completion: config.completion_config(),
            chat_fallback_delay: config.chat_fallback_delay,
            simplify_fallback_delay: config.simplify_fallback_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{CompletionResponse, TokenUsage};
    use async_trait::async_trait;
    use legalease_core::notices::DISCLAIMER;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Replies with a fixed result and records the prompts it received.
    struct ScriptedProvider {
        reply: fn() -> Result<String, ProviderError>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedProvider {
        fn new(reply: fn() -> Result<String, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(
            &self,
            messages: Vec<ChatMessage>,
            config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            self.seen.lock().unwrap().push(messages);
            (self.reply)().map(|content| CompletionResponse {
                content,
                usage: TokenUsage::default(),
                model: config.model.clone(),
                stop_reason: Some("STOP".to_string()),
            })
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn unavailable() -> ResilientRequestGateway {
        ResilientRequestGateway::builder().build()
    }

    fn with_provider(provider: Arc<ScriptedProvider>) -> ResilientRequestGateway {
        ResilientRequestGateway::builder().provider(provider).build()
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_chat_waits_then_uses_canned_text() {
        let gateway = unavailable();
        assert!(!gateway.is_available());

        let start = Instant::now();
        let outcome = gateway.invoke(Operation::chat("What about cyber hacking laws?")).await;

        assert!(start.elapsed() >= Duration::from_millis(600));
        assert!(outcome.text().contains("IT Act"));
        assert!(outcome.text().ends_with(DISCLAIMER));
        assert_eq!(
            outcome.reason(),
            Some(SubstitutionReason::Failure(FailureKind::CredentialMissing))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_simplify_waits_one_second() {
        let start = Instant::now();
        let text = unavailable().simplify("The party of the first part...").await;

        assert!(start.elapsed() >= Duration::from_secs(1));
        assert_eq!(text, CREDENTIAL_REQUIRED_NOTICE);
    }

    #[tokio::test]
    async fn test_success_is_verbatim() {
        let provider = ScriptedProvider::new(|| Ok("  Hello\n".to_string()));
        let gateway = with_provider(provider.clone());

        let outcome = gateway.invoke(Operation::chat("hi")).await;
        assert_eq!(outcome, Outcome::success("  Hello\n"));

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0][0].content, prompts::LEGAL_SYSTEM_PROMPT);
        assert_eq!(seen[0][1].content, "User question: hi");
    }

    #[tokio::test]
    async fn test_chat_rate_limit_notice() {
        let typed = with_provider(ScriptedProvider::new(|| {
            Err(ProviderError::RateLimited { retry_after: None })
        }));
        assert_eq!(typed.chat("consumer").await, RATE_LIMIT_NOTICE);

        let textual = with_provider(ScriptedProvider::new(|| {
            Err(ProviderError::HttpError("Quota exceeded for this project".to_string()))
        }));
        let outcome = textual.invoke(Operation::chat("hi")).await;
        assert_eq!(outcome.text(), RATE_LIMIT_NOTICE);
        assert_eq!(
            outcome.reason(),
            Some(SubstitutionReason::Failure(FailureKind::RateLimited))
        );
    }

    #[tokio::test]
    async fn test_chat_generic_failure_notice() {
        let gateway = with_provider(ScriptedProvider::new(|| {
            Err(ProviderError::ApiError {
                status: 500,
                message: "internal".to_string(),
            })
        }));
        let outcome = gateway.invoke(Operation::chat("hi")).await;
        assert_eq!(outcome.text(), CHAT_FAILURE_NOTICE);
        assert_eq!(
            outcome.reason(),
            Some(SubstitutionReason::Failure(FailureKind::TransportFailure))
        );
    }

    #[tokio::test]
    async fn test_blank_completion_is_failure() {
        let gateway = with_provider(ScriptedProvider::new(|| Ok("   ".to_string())));
        assert_eq!(gateway.chat("hi").await, CHAT_FAILURE_NOTICE);
    }

    #[tokio::test]
    async fn test_simplify_failure_embeds_error() {
        let gateway = with_provider(ScriptedProvider::new(|| {
            Err(ProviderError::HttpError("connection reset".to_string()))
        }));
        let text = gateway.simplify("Clause 1. The tenant shall pay rent.").await;
        assert!(text.starts_with("Failed to simplify this document."));
        assert!(text.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_simplify_success_sends_wrapped_document() {
        let provider = ScriptedProvider::new(|| Ok("Plain version".to_string()));
        let gateway = with_provider(provider.clone());

        assert_eq!(gateway.simplify("Whereas the lessee...").await, "Plain version");
        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0].len(), 1);
        assert!(seen[0][0].content.contains("--- LEGAL DOCUMENT ---\nWhereas the lessee...\n"));
    }

    #[tokio::test]
    async fn test_empty_document_skips_provider() {
        let provider = ScriptedProvider::new(|| Ok("unused".to_string()));
        let gateway = with_provider(provider.clone());

        let outcome = gateway.invoke(Operation::simplify(" \n\t")).await;
        assert_eq!(outcome.text(), EMPTY_DOCUMENT_NOTICE);
        assert_eq!(outcome.reason(), Some(SubstitutionReason::EmptyDocument));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        struct Stalled;

        #[async_trait]
        impl LlmProvider for Stalled {
            async fn complete(
                &self,
                _messages: Vec<ChatMessage>,
                _config: &CompletionConfig,
            ) -> Result<CompletionResponse, ProviderError> {
                std::future::pending().await
            }

            async fn health_check(&self) -> bool {
                true
            }

            fn name(&self) -> &str {
                "stalled"
            }
        }

        let gateway = ResilientRequestGateway::builder()
            .provider(Arc::new(Stalled))
            .build();

        let start = Instant::now();
        assert_eq!(gateway.chat("hi").await, CHAT_FAILURE_NOTICE);
        assert!(start.elapsed() >= Duration::from_secs(20));

        let text = gateway.simplify("Some clause").await;
        assert!(text.contains("Timeout after 20s"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_table_and_delays() {
        let table = CannedResponseTable::from_yaml(
            "default: \"Ask me anything.\"\nentries:\n  - topic: tenancy\n    keywords: [tenant]\n    body: \"Tenancy answer.\"\n",
        )
        .unwrap();
        let config = RuntimeConfig::from_yaml("chat_fallback_delay: 50ms").unwrap();
        let gateway = ResilientRequestGateway::builder()
            .config(&config)
            .table(table)
            .build();

        let start = Instant::now();
        assert_eq!(gateway.chat("my Tenant left").await, "Tenancy answer.");
        assert!(start.elapsed() < Duration::from_millis(600));
        assert_eq!(gateway.chat("consumer").await, "Ask me anything.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_builder_default_matches_new() {
        let from_default = GatewayBuilder::default();
        let from_new = GatewayBuilder::new();
        assert_eq!(from_default.chat_fallback_delay, Duration::from_millis(600));
        assert_eq!(from_default.simplify_fallback_delay, Duration::from_secs(1));
        assert_eq!(from_default.chat_fallback_delay, from_new.chat_fallback_delay);
        assert_eq!(from_default.simplify_fallback_delay, from_new.simplify_fallback_delay);
        assert_eq!(from_default.completion.timeout, from_new.completion.timeout);

        let start = Instant::now();
        GatewayBuilder::default().build().chat("consumer").await;
        assert!(start.elapsed() >= Duration::from_millis(600));
    }

    #[tokio::test]
    async fn test_unnormalized_table_still_matches_case_insensitively() {
        let entry = legalease_core::CannedEntry {
            topic: "tenancy".to_string(),
            keywords: vec!["Tenant".to_string()],
            body: "Tenancy".to_string(),
        };
        let table = CannedResponseTable::new("default", vec![entry]).unwrap();
        let config = RuntimeConfig::from_yaml("chat_fallback_delay: 0s").unwrap();
        let gateway = GatewayBuilder::new().config(&config).table(table).build();

        assert_eq!(gateway.chat("Tenant eviction").await, "Tenancy");
        assert!(CannedResponseTable::new("", vec![]).is_err());
    }

    #[tokio::test]
    async fn test_health_check() {
        assert!(!unavailable().health_check().await);
        let gateway = with_provider(ScriptedProvider::new(|| Ok("ok".to_string())));
        assert!(gateway.health_check().await);
    }

    #[test]
    fn test_from_config_without_credential_is_unavailable() {
        let config =
            RuntimeConfig::from_yaml("api_key_env: LEGALEASE_TEST_GATEWAY_UNSET_KEY").unwrap();
        let gateway =
            ResilientRequestGateway::from_config(&config, &ProviderRegistry::with_defaults())
                .unwrap();
        assert!(!gateway.is_available());
        assert_eq!(gateway.provider_name(), None);
    }

    #[test]
    fn test_from_config_unknown_provider_is_unavailable() {
        let config = RuntimeConfig::from_yaml("provider: nonexistent").unwrap();
        let gateway =
            ResilientRequestGateway::from_config(&config, &ProviderRegistry::new()).unwrap();
        assert!(!gateway.is_available());
    }

    #[cfg(feature = "gemini")]
    #[test]
    fn test_from_config_with_key_is_available() {
        let config = RuntimeConfig::from_yaml("api_key: test-key").unwrap();
        let gateway =
            ResilientRequestGateway::from_config(&config, &ProviderRegistry::with_defaults())
                .unwrap();
        assert!(gateway.is_available());
        assert_eq!(gateway.provider_name(), Some("gemini"));
        assert!(!format!("{gateway:?}").contains("test-key"));
    }

    #[test]
    fn test_gateway_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResilientRequestGateway>();
    }
}
