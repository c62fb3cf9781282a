//! Parse-time configuration.
//!
//! [`ParseOptions`] controls the tag syntax (delimiters, shorthand tag value,
//! self-closing markers) and whether the document root is segmented into
//! paragraphs.
//!
//! ## Examples
//!
//! ```rust
//! use bbmark::{tokenize_with_options, ParseOptions, TokenKind};
//!
//! // HTML-looking delimiters, no `[tag/]` shortcut
//! let options = ParseOptions::new()
//!     .with_delimiters('<', '>')
//!     .with_self_closing(false);
//!
//! let kinds: Vec<_> = tokenize_with_options("<b>hi</b>", &options)
//!     .unwrap()
//!     .map(|t| t.kind)
//!     .collect();
//! assert_eq!(kinds, vec![TokenKind::OpenTag, TokenKind::Data, TokenKind::CloseTag]);
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration options for tokenizing and assembling markup.
///
/// # Examples
///
/// ```rust
/// use bbmark::ParseOptions;
///
/// let options = ParseOptions::new();
/// assert_eq!(options.open_ch, '[');
/// assert_eq!(options.close_ch, ']');
/// assert!(options.allow_tagvalue_attr);
/// assert!(options.allow_self_closing);
/// assert!(!options.root_paragraphs);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParseOptions {
    pub open_ch: char,
    pub close_ch: char,
    /// Accept the `[name=value]` shorthand.
    pub allow_tagvalue_attr: bool,
    /// Accept the `[name/]` self-closing form.
    pub allow_self_closing: bool,
    /// Segment the root's children into paragraphs.
    pub root_paragraphs: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            open_ch: '[',
            close_ch: ']',
            allow_tagvalue_attr: true,
            allow_self_closing: true,
            root_paragraphs: false,
        }
    }
}

impl ParseOptions {
    /// Creates default options (`[` `]` delimiters, all syntax shortcuts enabled).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the opening and closing delimiter characters.
    ///
    /// The pair is checked by [`ParseOptions::validate`], not here.
    #[must_use]
    pub fn with_delimiters(mut self, open_ch: char, close_ch: char) -> Self {
        self.open_ch = open_ch;
        self.close_ch = close_ch;
        self
    }

    /// Enables or disables the `[name=value]` shorthand attribute.
    #[must_use]
    pub fn with_tagvalue_attr(mut self, allow: bool) -> Self {
        self.allow_tagvalue_attr = allow;
        self
    }

    /// Enables or disables the `[name/]` self-closing syntax.
    #[must_use]
    pub fn with_self_closing(mut self, allow: bool) -> Self {
        self.allow_self_closing = allow;
        self
    }

    /// Enables paragraph segmentation of the document root.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bbmark::{parse_with_options, ParseOptions, TagRegistry};
    ///
    /// let registry = TagRegistry::with_defaults();
    /// let options = ParseOptions::new().with_root_paragraphs(true);
    /// let tree = parse_with_options("one\n\ntwo", &registry, &options).unwrap();
    /// assert_eq!(tree.to_html(), "<p>one</p>\n<p>two</p>\n");
    /// ```
    #[must_use]
    pub fn with_root_paragraphs(mut self, enabled: bool) -> Self {
        self.root_paragraphs = enabled;
        self
    }

    /// Checks the delimiter pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDelimiters`] when both delimiters are the same character.
    pub fn validate(&self) -> Result<()> {
        if self.open_ch == self.close_ch {
            return Err(Error::InvalidDelimiters {
                open: self.open_ch,
                close: self.close_ch,
            });
        }
        Ok(())
    }
}
