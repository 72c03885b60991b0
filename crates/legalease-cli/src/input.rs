//! Caller-side validation of user input.

use anyhow::{bail, ensure, Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Largest document accepted for simplification.
pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Only plain-text files are accepted.
pub fn check_extension(path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("txt") => Ok(()),
        _ => bail!(
            "{} is not a .txt file; only plain-text documents can be simplified",
            path.display()
        ),
    }
}

pub fn check_size(bytes: u64) -> Result<()> {
    ensure!(
        bytes <= MAX_DOCUMENT_BYTES,
        "document is {} bytes; the limit is 10 MB",
        bytes
    );
    Ok(())
}

/// Reject text that is empty after trimming.
pub fn require_text<'a>(text: &'a str, what: &str) -> Result<&'a str> {
    ensure!(!text.trim().is_empty(), "{what} must not be empty");
    Ok(text)
}

/// Read and check a document file.
pub fn read_document(path: &Path) -> Result<String> {
    check_extension(path)?;
    let metadata =
        fs::metadata(path).with_context(|| format!("cannot access {}", path.display()))?;
    check_size(metadata.len())?;

    let text =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    require_text(&text, "document")?;
    Ok(text)
}

/// Read a document from a stream such as stdin.
///
/// At most one byte past the limit is buffered, so an oversized pipe is
/// rejected without being held in memory.
pub fn read_stdin_document(reader: impl Read) -> Result<String> {
    let mut bytes = Vec::new();
    reader
        .take(MAX_DOCUMENT_BYTES + 1)
        .read_to_end(&mut bytes)
        .context("failed to read document from stdin")?;
    check_size(bytes.len() as u64)?;
    let text = String::from_utf8(bytes).context("document is not valid UTF-8 text")?;
    require_text(&text, "document")?;
    Ok(text)
}
