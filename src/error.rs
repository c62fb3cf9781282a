//! Error types for tokenizing, assembling and rendering markup.
//!
//! Two families live here:
//!
//! - [`SyntaxError`]: a tag occurrence that does not match the tag grammar.
//!   These are **local** failures. The tokenizer recovers from them by treating
//!   the opening delimiter as ordinary text, so they never reach the caller of
//!   [`parse`](crate::parse) or [`to_html`](crate::to_html).
//! - [`Error`]: the fatal class. Bad preconditions (empty input, identical
//!   delimiters), invalid registry entries and descriptor contract violations.
//!
//! Unknown tags and unmatched close tags are not errors at all; they degrade to
//! literal text in the tree.
//!
//! ## Examples
//!
//! ```rust
//! use bbmark::{tokenize, Error};
//!
//! let result = tokenize("");
//! assert!(matches!(result, Err(Error::EmptyInput)));
//! ```

use thiserror::Error;

/// Fatal errors surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The tokenizer was handed an empty string.
    #[error("No text input given")]
    EmptyInput,

    /// Opening and closing delimiters must differ.
    #[error("Invalid delimiters: opening '{open}' and closing '{close}' must be different characters")]
    InvalidDelimiters { open: char, close: char },

    /// A registry entry was given a name the tag grammar could never produce.
    #[error("Invalid tag name: {0:?}\nHelp: tag names use ASCII letters, digits, '_', '-' or '*'")]
    InvalidTagName(String),

    /// A descriptor broke the capability contract the engine relies on.
    #[error("Contract violation for tag '{tag}': {msg}")]
    ContractViolation { tag: String, msg: String },
}

impl Error {
    /// Creates a contract violation error for the given tag name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bbmark::Error;
    ///
    /// let err = Error::contract_violation("hr", "standalone tags cannot capture verbatim text");
    /// assert!(err.to_string().contains("'hr'"));
    /// ```
    pub fn contract_violation(tag: &str, msg: &str) -> Self {
        Error::ContractViolation {
            tag: tag.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates an invalid tag name error.
    pub fn invalid_tag_name(name: &str) -> Self {
        Error::InvalidTagName(name.to_string())
    }
}

/// A tag occurrence that failed to match the tag grammar.
///
/// `offset` is the byte offset (in the newline-normalized text) where the
/// failure was detected, which is not necessarily the tag start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("Unterminated tag at offset {offset}: no closing delimiter before end of input")]
    Unterminated { offset: usize },

    #[error("Empty tag name at offset {offset}")]
    EmptyName { offset: usize },

    #[error("Invalid tag name {name:?} at offset {offset}")]
    InvalidName { offset: usize, name: String },

    #[error("Invalid attribute name {name:?} at offset {offset}")]
    InvalidAttributeName { offset: usize, name: String },

    #[error("Closing tag carries attributes at offset {offset}")]
    AttributesOnClosingTag { offset: usize },

    #[error("Self-closing tag syntax is disabled (offset {offset})")]
    SelfClosingNotAllowed { offset: usize },

    #[error("Shorthand tag value syntax is disabled (offset {offset})")]
    TagValueNotAllowed { offset: usize },

    #[error("Unterminated quoted attribute value starting at offset {offset}")]
    UnterminatedQuote { offset: usize },
}

impl SyntaxError {
    /// Byte offset where the failure was detected.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            SyntaxError::Unterminated { offset }
            | SyntaxError::EmptyName { offset }
            | SyntaxError::InvalidName { offset, .. }
            | SyntaxError::InvalidAttributeName { offset, .. }
            | SyntaxError::AttributesOnClosingTag { offset }
            | SyntaxError::SelfClosingNotAllowed { offset }
            | SyntaxError::TagValueNotAllowed { offset }
            | SyntaxError::UnterminatedQuote { offset } => *offset,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidDelimiters {
            open: '[',
            close: '[',
        };
        assert!(err.to_string().contains("must be different"));

        let err = Error::invalid_tag_name("a b");
        assert!(err.to_string().contains("Help:"));
    }

    #[test]
    fn test_syntax_error_offset() {
        let err = SyntaxError::InvalidName {
            offset: 7,
            name: "a!".to_string(),
        };
        assert_eq!(err.offset(), 7);
        assert!(err.to_string().contains("offset 7"));
    }
}
