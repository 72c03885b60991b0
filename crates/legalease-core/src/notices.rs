//! Fixed user-facing texts.
//!
//! Everything a caller can receive in place of a live provider answer is
//! defined here, so the substituted path never formats text ad hoc.

/// Suffix appended to every canned legal answer.
pub const DISCLAIMER: &str = "⚠️ This is educational information, not legal advice.";

/// Returned by `chat` when the provider reports a rate limit.
pub const RATE_LIMIT_NOTICE: &str = "I'm receiving too many requests right now. Please try again in a minute. (Rate limit: 15 requests/minute on free tier)";

/// Returned by `chat` for any other provider failure.
pub const CHAT_FAILURE_NOTICE: &str = "I encountered an error processing your question. Please try again shortly.\n\n⚠️ If this persists, check that your API key is valid.";

/// Returned by `simplify` when no provider credential is configured.
pub const CREDENTIAL_REQUIRED_NOTICE: &str = "**API Key Required**\n\nTo simplify real documents, please add your Gemini API key to the environment:\n\n```\nGEMINI_API_KEY=your_key_here\n```\n\nGet a free key at [Google AI Studio](https://aistudio.google.com/apikey).";

/// Returned by `simplify` when the document has no content.
pub const EMPTY_DOCUMENT_NOTICE: &str = "There is nothing to simplify yet. Please paste some legal text or choose a text file.";

/// Description used when a failure carries no message of its own.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Failure text for `simplify`, embedding the underlying error description.
pub fn simplify_failure(detail: &str) -> String {
    let detail = detail.trim();
    let detail = if detail.is_empty() { UNKNOWN_ERROR } else { detail };
    format!("Failed to simplify this document. Please try again.\n\nError: {detail}")
}
