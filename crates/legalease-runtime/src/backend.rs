//! Client for the LegalEase authentication backend.
//!
//! `POST {base}/auth/login` and `POST {base}/auth/register` both answer
//! `{ token, user }`. The wire shape is normalized into a [`Session`] here
//! and nowhere else.
//!
//! With `offline_auth` enabled, an unreachable or failing backend yields a
//! mock session flagged `offline`, after a fixed delay. Otherwise the
//! failure is returned.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use legalease_core::FailureKind;

use crate::config::BackendConfig;
use crate::resilience::{RemoteFailure, WithFallback};

/// Token issued to offline login sessions.
pub const MOCK_LOGIN_TOKEN: &str = "mock-jwt-token-12345";

/// Token issued to offline registration sessions.
pub const MOCK_REGISTER_TOKEN: &str = "mock-jwt-token-67890";

/// Errors from the authentication backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid backend response: {0}")]
    Parse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

impl RemoteFailure for BackendError {
    fn timed_out(after: Duration) -> Self {
        BackendError::Timeout(after)
    }

    fn failure_kind(&self) -> FailureKind {
        match self {
            BackendError::Status { status: 429, .. } => FailureKind::RateLimited,
            BackendError::Timeout(_) => FailureKind::TransportFailure,
            other => FailureKind::from_description(&other.to_string()),
        }
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Backend identifier, as text whatever its wire type
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A login or registration result.
pub struct Session {
    token: SecretString,

    /// The signed-in user
    pub user: User,

    /// True when the backend was unreachable and this is a mock session
    pub offline: bool,

    pub established_at: DateTime<Utc>,
}

impl Session {
    fn new(token: impl Into<String>, user: User, offline: bool) -> Self {
        Self {
            token: SecretString::from(token.into()),
            user,
            offline,
            established_at: Utc::now(),
        }
    }

    /// Bearer token for later requests.
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .field("offline", &self.offline)
            .field("established_at", &self.established_at)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: JsonValue,
    #[serde(default)]
    name: String,
    email: String,
}

impl AuthResponse {
    fn into_session(self) -> Result<Session, BackendError> {
        if self.token.trim().is_empty() {
            return Err(BackendError::Parse("empty token".to_string()));
        }
        let id = match self.user.id {
            JsonValue::Number(n) => n.to_string(),
            JsonValue::String(s) if !s.is_empty() => s,
            other => return Err(BackendError::Parse(format!("unusable user id: {other}"))),
        };
        let user = User {
            id,
            name: self.user.name,
            email: self.user.email,
        };
        Ok(Session::new(self.token, user, false))
    }
}

/// Authentication backend client.
pub struct BackendClient {
    base_url: String,
    offline_auth: bool,
    fallback_delay: Duration,
    request_timeout: Duration,
    client: reqwest::Client,
}

impl fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .field("offline_auth", &self.offline_auth)
            .finish()
    }
}

impl BackendClient {
    /// Create a client from configuration.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| BackendError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(config, client))
    }

    /// Create a client with a preconfigured HTTP client.
    pub fn with_client(config: &BackendConfig, client: reqwest::Client) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            offline_auth: config.offline_auth,
            fallback_delay: config.fallback_delay,
            request_timeout: config.request_timeout,
            client,
        }
    }

    /// Sign in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.authenticate("login", &body, || {
            let user = User {
                id: "1".to_string(),
                name: "John Doe".to_string(),
                email: email.to_string(),
            };
            Session::new(MOCK_LOGIN_TOKEN, user, true)
        })
        .await
    }

    /// Create an account.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let body = serde_json::json!({ "name": name, "email": email, "password": password });
        self.authenticate("register", &body, || {
            let user = User {
                id: "2".to_string(),
                name: name.to_string(),
                email: email.to_string(),
            };
            Session::new(MOCK_REGISTER_TOKEN, user, true)
        })
        .await
    }

    async fn authenticate<F>(
        &self,
        action: &'static str,
        body: &JsonValue,
        offline: F,
    ) -> Result<Session, BackendError>
    where
        F: FnOnce() -> Session,
    {
        let call = WithFallback::new(action).timeout(self.request_timeout);

        if !self.offline_auth {
            return call.attempt(self.post_auth(action, body)).await;
        }

        let resolved = call
            .substitution_delay(self.fallback_delay)
            .run(self.post_auth(action, body), |_| offline())
            .await;
        if resolved.is_substituted() {
            tracing::warn!(action, "Backend unreachable, using offline session");
        }
        Ok(resolved.value)
    }

    async fn post_auth(&self, action: &str, body: &JsonValue) -> Result<Session, BackendError> {
        let url = format!("{}/auth/{}", self.base_url, action);

        let response = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout(self.request_timeout)
                } else {
                    BackendError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<JsonValue>(&text)
                .ok()
                .and_then(|v| {
                    v.get("detail")
                        .or_else(|| v.get("message"))
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                })
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let auth: AuthResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        auth.into_session()
    }
}
