//! Secure credential handling for LLM providers.
//!
//! Provider API keys are wrapped in [`ApiCredential`] as soon as they are
//! read, so they cannot appear in `Debug`/`Display` output or log lines.
//!
//! A blank value (empty or whitespace) is treated exactly like an unset one:
//! an `.env` file with `GEMINI_API_KEY=` must degrade to canned responses, not
//! produce a provider that fails every call with an auth error.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::providers::secrets::ApiCredential;
//!
//! // Load from config with env fallback
//! let cred = ApiCredential::from_config_or_env(&config, "api_key", "GEMINI_API_KEY", "Gemini API key")?;
//!
//! // Use in HTTP header (explicit exposure)
//! request.header("x-goog-api-key", cred.expose());
//! ```

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;
use std::fmt;

use super::ProviderError;

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from configuration
    Config,
    /// Loaded from environment variable
    Environment,
    /// Provided programmatically
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Config => write!(f, "config"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
///
/// - `Debug` and `Display` show `[REDACTED]`
/// - memory is zeroed on drop via `secrecy`
/// - the value is only reachable through [`ApiCredential::expose`]
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn env_value(env_var: &str) -> Option<String> {
    std::env::var(env_var)
        .ok()
        .and_then(|v| non_blank(&v).map(str::to_string))
}

impl ApiCredential {
    /// Create a new credential from a string value.
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Load credential from JSON config, falling back to environment variable.
    ///
    /// 1. `config[config_key]`, if it is a non-blank string
    /// 2. otherwise `env_var`, if it is set and non-blank
    /// 3. otherwise `NotConfigured`
    pub fn from_config_or_env(
        config: &JsonValue,
        config_key: &str,
        env_var: &str,
        name: &'static str,
    ) -> Result<Self, ProviderError> {
        if let Some(value) = config[config_key].as_str().and_then(non_blank) {
            return Ok(Self::new(value, CredentialSource::Config, name));
        }

        if let Some(value) = env_value(env_var) {
            return Ok(Self::new(value, CredentialSource::Environment, name));
        }

        Err(ProviderError::NotConfigured(format!(
            "{} required: set '{}' in config or {} environment variable",
            name, config_key, env_var
        )))
    }

    /// Check if a credential is available (without loading it).
    pub fn is_available(config: &JsonValue, config_key: &str, env_var: &str) -> bool {
        config[config_key].as_str().and_then(non_blank).is_some() || env_value(env_var).is_some()
    }

    /// Expose the credential value for use in API calls.
    ///
    /// Only call this where the value is sent (e.g., an HTTP header).
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    /// Check if the credential is empty.
    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().trim().is_empty()
    }

    /// Get the source of this credential.
    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} [REDACTED]", self.name, self.source)
    }
}
