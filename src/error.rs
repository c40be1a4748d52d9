//! Crate error taxonomy.
//!
//! A single `ScrubError` covers the whole pipeline: parse failures (with a
//! byte offset), structural corruption of a programmatically built tree,
//! unresolvable rule matches, and invalid rule patterns. No retries, no
//! partial output — an operation either succeeds or returns one of these.

use thiserror::Error;

/// Errors emitted by the scrub pipeline.
#[derive(Debug, Error)]
pub enum ScrubError {
    /// Malformed input text detected while parsing, carrying the byte offset
    /// at which the failure was observed.
    #[error("parse error at byte {offset}: {message}")]
    Parse { message: String, offset: usize },

    /// Structural invariant violation in a constructed document
    /// (e.g. dangling node links). A programming error, not input text.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A path could not be resolved to any rule. Indicates a rule set built
    /// without the identity-copy fallback — a programming error.
    #[error("no rule matched the element path")]
    UnresolvedMatch,

    /// An invalid textual rule pattern.
    #[error("invalid pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },
}

impl ScrubError {
    /// Construct a [`ScrubError::Parse`] from a message and byte offset.
    pub fn parse(message: impl Into<String>, offset: usize) -> Self {
        ScrubError::Parse {
            message: message.into(),
            offset,
        }
    }

    /// Construct a [`ScrubError::Pattern`] from the offending pattern and a
    /// reason describing why it is invalid.
    pub fn pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        ScrubError::Pattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}
