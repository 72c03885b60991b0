//! # legalease-core
//!
//! Deterministic building blocks for the LegalEase assistant.
//!
//! Nothing in this crate performs I/O beyond reading an optional canned
//! table file. It answers:
//! - Which canned answer fits this message?
//! - Does this failure look like rate limiting?
//! - What fixed text does a caller see for each failure?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: the same message always selects the same canned text
//! 2. **Never empty**: every lookup yields a non-empty body
//! 3. **Ordered**: the first matching keyword entry wins
//!
//! ## Example
//!
//! ```rust
//! use legalease_core::BUILTIN_TABLE;
//!
//! let answer = BUILTIN_TABLE.respond("Is hacking a crime?");
//! assert!(answer.contains("IT Act"));
//! ```

pub mod canned;
pub mod notices;
pub mod operation;
pub mod rights;
pub mod signature;

// Re-export main types at crate root
pub use canned::{CannedEntry, CannedResponseTable, TableError, BUILTIN_TABLE};
pub use operation::{Operation, Outcome, SubstitutionReason};
pub use rights::RightsCategory;
pub use signature::{is_rate_limit_signature, FailureKind};
