//! Provider lookup by configured name.
//!
//! The gateway never names a concrete provider type. It asks the registry
//! for the configured provider and receives a trait object, or an error that
//! it turns into the permanent "unavailable" state.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::{LlmProvider, ProviderError};

/// Builds one kind of provider from JSON settings.
pub trait ProviderFactory: Send + Sync {
    /// Name used in configuration (e.g., "gemini").
    fn provider_type(&self) -> &'static str;

    /// Build a provider; a missing credential is `NotConfigured`.
    fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError>;

    /// Reject settings that cannot produce a working provider.
    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError>;
}

/// Provider factories keyed by provider type.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<&'static str, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any with the same type.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        self.factories.insert(factory.provider_type(), factory);
    }

    /// Build the provider registered as `provider_type`.
    pub fn create(
        &self,
        provider_type: &str,
        config: &JsonValue,
    ) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        let factory = self.factories.get(provider_type).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "Unknown provider type: '{}'. Available: {:?}",
                provider_type,
                self.available_types()
            ))
        })?;
        factory.create(config)
    }

    /// Registered provider types, sorted.
    pub fn available_types(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    /// Registry with every provider compiled into this build.
    #[cfg(feature = "gemini")]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(super::GeminiProviderFactory));
        registry
    }

    /// Registry with every provider compiled into this build.
    #[cfg(not(feature = "gemini"))]
    pub fn with_defaults() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.available_types())
            .finish()
    }
}
