//! Custom error types for the sequence builder.
//!
//! This module defines the primary error type, `SequenceError`, shared by every
//! builder in the crate. Using the `thiserror` crate, it provides a single place
//! to describe what can go wrong while turning caller input into a document.
//!
//! ## Error Hierarchy
//!
//! - **`InvalidInput`**: A primitive value could not be encoded. Covers non-finite
//!   numbers (NaN, infinities), negative durations, durations too long for an `xsd:int`
//!   millisecond count, and raw port/state numbers outside their fixed sets.
//! - **`Parse`**: The formatter was handed text that is not a well-formed markup
//!   document. Wraps the underlying `roxmltree::Error`.
//! - **`UnresolvedReferences`**: Returned only by the opt-in reference checker when
//!   `Repeat` or `Goto` elements name a tag that no earlier element defines.
//!
//! Configuration loading has its own error type, see [`crate::config::ConfigError`].

use std::fmt;
use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type AppResult<T> = std::result::Result<T, SequenceError>;

/// Errors raised while building, formatting or checking a document.
#[derive(Error, Debug)]
pub enum SequenceError {
    /// A caller value cannot be encoded.
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput {
        /// Which input was rejected.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// Formatter input is not well-formed.
    #[error("Malformed document: {0}")]
    Parse(#[from] roxmltree::Error),

    /// Reference tags without a matching earlier element.
    #[error("Unresolved reference tags: {}", join_issues(.0))]
    UnresolvedReferences(Vec<ReferenceIssue>),
}

impl SequenceError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SequenceError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// A `Repeat` or `Goto` element whose tag does not name an earlier element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceIssue {
    /// Zero-based index of the offending element in the sequence list.
    pub position: usize,
    /// The tag that could not be resolved.
    pub tag: String,
}

impl fmt::Display for ReferenceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' at element {}", self.tag, self.position)
    }
}

fn join_issues(issues: &[ReferenceIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
