//! Keyword-matched canned answers.
//!
//! A [`CannedResponseTable`] is an ordered list of entries, each pairing a set
//! of keywords with a fixed body, plus one default body. Classification is a
//! case-insensitive substring match and the first matching entry wins, so the
//! order of entries is part of the table's meaning.
//!
//! Tables are built once (either [`CannedResponseTable::builtin`] or loaded
//! from YAML at startup) and are read-only afterwards.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::notices::DISCLAIMER;

/// Errors that can occur when loading a canned table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read canned table file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Canned table validation failed: {0}")]
    ValidationError(String),
}

/// One keyword predicate and the body it selects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CannedEntry {
    /// Short name of the topic (e.g., "consumer")
    pub topic: String,

    /// Keywords, any of which selects this entry
    pub keywords: Vec<String>,

    /// Text returned when the entry matches
    pub body: String,
}

impl CannedEntry {
    /// Create an entry. Keywords are stored lowercase.
    pub fn new(topic: impl Into<String>, keywords: &[&str], body: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            body: body.into(),
        }
    }

    /// Whether any keyword occurs in the already-lowercased message.
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Ordered keyword table with a default body.
///
/// Every construction path normalizes keywords and rejects blank bodies, so
/// a table always answers with non-empty text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "TableFile")]
pub struct CannedResponseTable {
    /// Body used when no entry matches
    #[serde(rename = "default")]
    default_body: String,

    /// Entries in priority order
    entries: Vec<CannedEntry>,
}

/// On-disk table layout, before validation.
#[derive(Deserialize)]
struct TableFile {
    #[serde(rename = "default")]
    default_body: String,

    #[serde(default)]
    entries: Vec<CannedEntry>,
}

impl TryFrom<TableFile> for CannedResponseTable {
    type Error = TableError;

    fn try_from(file: TableFile) -> Result<Self, Self::Error> {
        CannedResponseTable::new(file.default_body, file.entries)
    }
}

lazy_static! {
    /// The built-in table, shared by every gateway that is not given its own.
    pub static ref BUILTIN_TABLE: CannedResponseTable = CannedResponseTable::builtin();
}

fn with_disclaimer(body: &str) -> String {
    format!("{body}\n\n{DISCLAIMER}")
}

impl CannedResponseTable {
    /// Create a table from a default body and ordered entries.
    ///
    /// Keywords are trimmed and lowercased. A blank body or an entry without
    /// keywords is rejected.
    pub fn new(
        default_body: impl Into<String>,
        entries: Vec<CannedEntry>,
    ) -> Result<Self, TableError> {
        let mut table = Self {
            default_body: default_body.into(),
            entries,
        };
        table.normalize();
        table.validate()?;
        Ok(table)
    }

    /// The built-in Indian-law table.
    ///
    /// Order: consumer, labour, cyber, RTI.
    pub fn builtin() -> Self {
        Self {
            default_body: "I can help clarify that in the context of Indian law. However, the Gemini API key is not configured. Please set the GEMINI_API_KEY environment variable to enable real AI responses.".to_string(),
            entries: vec![
                CannedEntry::new(
                    "consumer",
                    &["consumer"],
                    with_disclaimer("Under the Consumer Protection Act, 2019, you have the right to file a complaint against unfair trade practices. You can approach the District Consumer Forum for claims up to ₹1 crore."),
                ),
                CannedEntry::new(
                    "labour",
                    &["labor", "labour", "wage"],
                    with_disclaimer("The Code on Wages, 2019 consolidates four existing labour laws and ensures timely payment of minimum wages to all employees across all sectors."),
                ),
                CannedEntry::new(
                    "cyber",
                    &["cyber", "hack", "online"],
                    with_disclaimer("The IT Act, 2000 (amended 2008) addresses cybercrimes including hacking (Sec. 66), identity theft (Sec. 66C), and cyber terrorism (Sec. 66F). Penalties range from 3 years to life imprisonment."),
                ),
                CannedEntry::new(
                    "rti",
                    &["rti", "information"],
                    with_disclaimer("Under the Right to Information Act, 2005, any citizen can request information from a public authority within 30 days. The fee is just ₹10. You can file an RTI application online at rtionline.gov.in."),
                ),
            ],
        }
    }

    /// Parse a table from YAML.
    ///
    /// ```yaml
    /// default: "Fallback text"
    /// entries:
    ///   - topic: consumer
    ///     keywords: [consumer, refund]
    ///     body: "..."
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, TableError> {
        let file: TableFile = serde_yaml::from_str(yaml)?;
        Self::new(file.default_body, file.entries)
    }

    /// Load a table from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let table = Self::from_yaml(&fs::read_to_string(path)?)?;
        tracing::debug!(
            path = %path.display(),
            entries = table.entries.len(),
            "Loaded canned response table"
        );
        Ok(table)
    }

    fn normalize(&mut self) {
        for entry in &mut self.entries {
            for keyword in &mut entry.keywords {
                *keyword = keyword.trim().to_lowercase();
            }
        }
    }

    fn validate(&self) -> Result<(), TableError> {
        if self.default_body.trim().is_empty() {
            return Err(TableError::ValidationError(
                "default body must not be empty".to_string(),
            ));
        }

        for entry in &self.entries {
            if entry.body.trim().is_empty() {
                return Err(TableError::ValidationError(format!(
                    "entry '{}' has an empty body",
                    entry.topic
                )));
            }
            if entry.keywords.is_empty() || entry.keywords.iter().any(|k| k.is_empty()) {
                return Err(TableError::ValidationError(format!(
                    "entry '{}' needs at least one non-empty keyword",
                    entry.topic
                )));
            }
        }

        Ok(())
    }

    /// First entry whose keywords occur in `message`, if any.
    pub fn classify(&self, message: &str) -> Option<&CannedEntry> {
        let lowered = message.to_lowercase();
        self.entries.iter().find(|entry| entry.matches(&lowered))
    }

    /// Canned answer for `message`: the first matching body or the default.
    pub fn respond(&self, message: &str) -> &str {
        self.classify(message)
            .map(|entry| entry.body.as_str())
            .unwrap_or(&self.default_body)
    }

    /// Body used when nothing matches.
    pub fn default_body(&self) -> &str {
        &self.default_body
    }

    /// Entries in priority order.
    pub fn entries(&self) -> &[CannedEntry] {
        &self.entries
    }
}

impl Default for CannedResponseTable {
    fn default() -> Self {
        BUILTIN_TABLE.clone()
    }
}
