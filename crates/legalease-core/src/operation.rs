//! Gateway requests and their outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::signature::FailureKind;

/// A capability request handled by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Operation {
    /// Answer a legal question
    Chat { message: String },

    /// Rewrite a legal document in plain language
    Simplify { document: String },
}

impl Operation {
    /// Create a chat request.
    pub fn chat(message: impl Into<String>) -> Self {
        Self::Chat {
            message: message.into(),
        }
    }

    /// Create a simplify request.
    pub fn simplify(document: impl Into<String>) -> Self {
        Self::Simplify {
            document: document.into(),
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Chat { .. } => "chat",
            Operation::Simplify { .. } => "simplify",
        }
    }
}

/// Why a substituted text was returned instead of a live answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "kind", rename_all = "snake_case")]
pub enum SubstitutionReason {
    /// The remote attempt failed or was never possible
    Failure(FailureKind),

    /// The document was empty, so no remote call was made
    EmptyDocument,
}

impl fmt::Display for SubstitutionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstitutionReason::Failure(kind) => write!(f, "{kind}"),
            SubstitutionReason::EmptyDocument => write!(f, "empty document"),
        }
    }
}

/// Result of a gateway call.
///
/// Both variants carry plain text; callers that only want the answer use
/// [`Outcome::into_text`]. The variant is kept for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Live provider text, unmodified
    Success { text: String },

    /// Locally authored text returned in place of a live answer
    Substituted {
        text: String,
        reason: SubstitutionReason,
    },
}

impl Outcome {
    /// Live provider text.
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    /// Substituted text with its reason.
    pub fn substituted(text: impl Into<String>, reason: SubstitutionReason) -> Self {
        Self::Substituted {
            text: text.into(),
            reason,
        }
    }

    /// The text, whichever variant this is.
    pub fn text(&self) -> &str {
        match self {
            Outcome::Success { text } | Outcome::Substituted { text, .. } => text,
        }
    }

    /// Consume the outcome, keeping only the text.
    pub fn into_text(self) -> String {
        match self {
            Outcome::Success { text } | Outcome::Substituted { text, .. } => text,
        }
    }

    /// Whether the text was substituted.
    pub fn is_substituted(&self) -> bool {
        matches!(self, Outcome::Substituted { .. })
    }

    /// The substitution reason, if any.
    pub fn reason(&self) -> Option<SubstitutionReason> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Substituted { reason, .. } => Some(*reason),
        }
    }
}
