//! Failure taxonomy and textual failure signatures.
//!
//! Provider SDKs and HTTP layers report rate limiting inconsistently: some as
//! a 429 status, some only in the message text ("quota exceeded"). The
//! patterns here classify a failure description so the gateway can choose the
//! right notice.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    /// HTTP 429 or any mention of a quota.
    pub static ref RATE_LIMIT_PATTERN: Regex = Regex::new(r"(?i)(?:^|\D)429(?:\D|$)|quota").unwrap();
}

/// Why a remote attempt did not produce a live answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No provider credential; permanent for the gateway's lifetime
    CredentialMissing,

    /// Network error, timeout, non-success status or provider exception
    TransportFailure,

    /// A transport failure identified as rate limiting
    RateLimited,
}

impl FailureKind {
    /// Classify a failure description as rate limited or a plain transport failure.
    pub fn from_description(description: &str) -> Self {
        if is_rate_limit_signature(description) {
            Self::RateLimited
        } else {
            Self::TransportFailure
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::CredentialMissing => write!(f, "credential missing"),
            FailureKind::TransportFailure => write!(f, "transport failure"),
            FailureKind::RateLimited => write!(f, "rate limited"),
        }
    }
}

/// Check if a failure description looks like rate limiting.
pub fn is_rate_limit_signature(description: &str) -> bool {
    RATE_LIMIT_PATTERN.is_match(description)
}
