//! Runtime configuration.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Durations are written human-style:
//!
//! ```yaml
//! provider: gemini
//! model: gemini-2.0-flash
//! request_timeout: 20s
//! chat_fallback_delay: 600ms
//! simplify_fallback_delay: 1s
//! canned_responses: ./canned.yaml
//! backend:
//!   base_url: https://example.org/api
//!   offline_auth: true
//! ```

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use legalease_core::{CannedResponseTable, TableError};

use crate::providers::{CompletionConfig, DEFAULT_MODEL};

/// Default backend API root.
pub const DEFAULT_BACKEND_URL: &str = "https://legalease-mvp-1.preview.emergentagent.com/api";

/// Errors from loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to load canned responses: {0}")]
    Table(#[from] TableError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Gateway and provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Registered provider type
    pub provider: String,

    /// Model name passed to the provider
    pub model: String,

    /// Custom provider API root
    pub base_url: Option<String>,

    /// Provider API key; the environment is used when absent
    #[serde(deserialize_with = "optional_secret")]
    pub api_key: Option<SecretString>,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Upper bound on one provider call
    #[serde(deserialize_with = "human_duration")]
    pub request_timeout: Duration,

    /// Simulated latency before a canned chat answer
    #[serde(deserialize_with = "human_duration")]
    pub chat_fallback_delay: Duration,

    /// Simulated latency before the credential-required notice
    #[serde(deserialize_with = "human_duration")]
    pub simplify_fallback_delay: Duration,

    pub max_output_tokens: u32,

    pub temperature: Option<f32>,

    /// YAML canned table replacing the built-in one
    pub canned_responses: Option<PathBuf>,

    pub backend: BackendConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            api_key: None,
            api_key_env: "GEMINI_API_KEY".to_string(),
            request_timeout: Duration::from_secs(20),
            chat_fallback_delay: Duration::from_millis(600),
            simplify_fallback_delay: Duration::from_secs(1),
            max_output_tokens: 1024,
            temperature: None,
            canned_responses: None,
            backend: BackendConfig::default(),
        }
    }
}

/// Authentication backend settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// API root, without trailing slash
    pub base_url: String,

    /// Return mock sessions when the backend cannot be reached
    pub offline_auth: bool,

    /// Delay before a mock session is returned
    #[serde(deserialize_with = "human_duration")]
    pub fallback_delay: Duration,

    #[serde(deserialize_with = "human_duration")]
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            offline_auth: false,
            fallback_delay: Duration::from_millis(800),
            request_timeout: Duration::from_secs(10),
        }
    }
}

fn human_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    humantime::parse_duration(&text).map_err(serde::de::Error::custom)
}

fn optional_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl RuntimeConfig {
    /// Parse and validate configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    ///
    /// A relative `canned_responses` path is resolved against the file's
    /// directory.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_yaml(&fs::read_to_string(path)?)?;

        if let (Some(table), Some(dir)) = (config.canned_responses.as_mut(), path.parent()) {
            if table.is_relative() {
                *table = dir.join(&*table);
            }
        }

        tracing::debug!(path = %path.display(), provider = %config.provider, "Loaded runtime config");
        Ok(config)
    }

    /// Check values that deserialize but cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.trim().is_empty() {
            return Err(ConfigError::Invalid("provider must not be empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".to_string()));
        }
        if self.request_timeout.is_zero() || self.backend.request_timeout.is_zero() {
            return Err(ConfigError::Invalid("request timeouts must be positive".to_string()));
        }
        if self.max_output_tokens == 0 {
            return Err(ConfigError::Invalid("max_output_tokens must be positive".to_string()));
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::Invalid(format!(
                    "temperature {t} outside 0.0..=2.0"
                )));
            }
        }
        if let Some(url) = &self.base_url {
            if !is_http_url(url) {
                return Err(ConfigError::Invalid(format!("base_url '{url}' is not an http(s) URL")));
            }
        }
        if !is_http_url(&self.backend.base_url) {
            return Err(ConfigError::Invalid(format!(
                "backend.base_url '{}' is not an http(s) URL",
                self.backend.base_url
            )));
        }
        Ok(())
    }

    /// Per-call provider settings.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.model.clone(),
            max_tokens: self.max_output_tokens,
            temperature: self.temperature,
            timeout: self.request_timeout,
        }
    }

    /// JSON handed to the provider factory.
    pub fn provider_settings(&self) -> JsonValue {
        let mut settings = serde_json::json!({
            "model": self.model,
            "api_key_env": self.api_key_env,
        });
        if let Some(url) = &self.base_url {
            settings["base_url"] = JsonValue::from(url.as_str());
        }
        if let Some(key) = &self.api_key {
            settings["api_key"] = JsonValue::from(key.expose_secret());
        }
        settings
    }

    /// The canned table: loaded from `canned_responses`, else the built-in one.
    pub fn canned_table(&self) -> Result<CannedResponseTable, ConfigError> {
        match &self.canned_responses {
            Some(path) => Ok(CannedResponseTable::from_yaml_file(path)?),
            None => Ok(CannedResponseTable::builtin()),
        }
    }
}
