//! Timeout-bounded remote calls with local substitutes.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use legalease_core::{FailureKind, Outcome, SubstitutionReason};

/// An error from a remote call that [`WithFallback`] can classify.
pub trait RemoteFailure: fmt::Display {
    /// The error reported when the call exceeded its time bound.
    fn timed_out(after: Duration) -> Self;

    /// Where this failure sits in the failure taxonomy.
    fn failure_kind(&self) -> FailureKind;
}

/// Value produced by [`WithFallback::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    /// Live value or substitute
    pub value: T,

    /// Set when `value` is a substitute
    pub failure: Option<FailureKind>,
}

impl<T> Resolved<T> {
    /// Whether the value came from the fallback.
    pub fn is_substituted(&self) -> bool {
        self.failure.is_some()
    }
}

impl Resolved<String> {
    /// Convert into a gateway outcome.
    pub fn into_outcome(self) -> Outcome {
        match self.failure {
            None => Outcome::success(self.value),
            Some(kind) => Outcome::substituted(self.value, SubstitutionReason::Failure(kind)),
        }
    }
}

/// Decorator for a single remote attempt.
///
/// ```ignore
/// let resolved = WithFallback::new("chat")
///     .timeout(Duration::from_secs(20))
///     .run(provider_call, |err| notice_for(err))
///     .await;
/// ```
#[derive(Debug, Clone)]
pub struct WithFallback {
    label: &'static str,
    timeout: Duration,
    substitution_delay: Duration,
}

impl WithFallback {
    /// Create a decorator with a 20 s bound and no substitution delay.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            timeout: Duration::from_secs(20),
            substitution_delay: Duration::ZERO,
        }
    }

    /// Set the time bound for the attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Wait this long before handing back a substitute.
    pub fn substitution_delay(mut self, delay: Duration) -> Self {
        self.substitution_delay = delay;
        self
    }

    /// Run the attempt under the time bound and report its failure.
    pub async fn attempt<T, E, F>(&self, call: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: RemoteFailure,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => {
                tracing::debug!(call = self.label, "Remote call succeeded");
                Ok(value)
            }
            Ok(Err(err)) => {
                tracing::warn!(
                    call = self.label,
                    kind = %err.failure_kind(),
                    error = %err,
                    "Remote call failed"
                );
                Err(err)
            }
            Err(_) => {
                tracing::warn!(call = self.label, timeout = ?self.timeout, "Remote call timed out");
                Err(E::timed_out(self.timeout))
            }
        }
    }

    /// Run the attempt; on any failure return `fallback(&error)` instead.
    pub async fn run<T, E, F, G>(&self, call: F, fallback: G) -> Resolved<T>
    where
        F: Future<Output = Result<T, E>>,
        E: RemoteFailure,
        G: FnOnce(&E) -> T,
    {
        match self.attempt(call).await {
            Ok(value) => Resolved {
                value,
                failure: None,
            },
            Err(err) => {
                if !self.substitution_delay.is_zero() {
                    tokio::time::sleep(self.substitution_delay).await;
                }
                Resolved {
                    value: fallback(&err),
                    failure: Some(err.failure_kind()),
                }
            }
        }
    }
}
