//! Lossless tokenization.
//!
//! The [`Tokenizer`] scans newline-normalized text for the opening delimiter,
//! tries [`parse_tag`] at each occurrence, and splits the untagged spans in
//! between into [`TokenKind::Data`] and [`TokenKind::Newline`] tokens.
//!
//! Concatenating the `raw_text` of every token reproduces the normalized input
//! exactly. A malformed tag is not an error: its opening delimiter simply stays
//! part of the surrounding data.
//!
//! ## Examples
//!
//! ```rust
//! use bbmark::{tokenize, TokenKind};
//!
//! let tokens: Vec<_> = tokenize("a [b]x[/b]\r\nc [").unwrap().collect();
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Data,
//!         TokenKind::OpenTag,
//!         TokenKind::Data,
//!         TokenKind::CloseTag,
//!         TokenKind::Newline,
//!         TokenKind::Data,
//!     ]
//! );
//!
//! let raw: String = tokens.iter().map(|t| t.raw_text.as_str()).collect();
//! assert_eq!(raw, "a [b]x[/b]\nc [");
//! ```

use crate::tag::{parse_tag, ParsedTag};
use crate::{Attributes, Error, ParseOptions, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Data,
    Newline,
    OpenTag,
    CloseTag,
    SelfClosingTag,
}

impl TokenKind {
    /// Returns `true` for the three tag kinds.
    #[must_use]
    pub const fn is_tag(&self) -> bool {
        matches!(
            self,
            TokenKind::OpenTag | TokenKind::CloseTag | TokenKind::SelfClosingTag
        )
    }
}

/// One token of the stream.
///
/// `name` and `attributes` are set for tag kinds only. `raw_text` is the exact
/// source slice the token was produced from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
    pub raw_text: String,
}

impl Token {
    /// Builds a data token holding `text` verbatim.
    pub fn data(text: &str) -> Self {
        Token {
            kind: TokenKind::Data,
            name: None,
            attributes: None,
            raw_text: text.to_string(),
        }
    }

    /// Builds the token for one normalized line break.
    pub fn newline() -> Self {
        Token {
            kind: TokenKind::Newline,
            name: None,
            attributes: None,
            raw_text: "\n".to_string(),
        }
    }

    /// Builds a tag token from a parsed tag and its source slice.
    pub fn tag(tag: ParsedTag, raw_text: &str) -> Self {
        let kind = if tag.self_closing {
            TokenKind::SelfClosingTag
        } else if tag.closing {
            TokenKind::CloseTag
        } else {
            TokenKind::OpenTag
        };
        Token {
            kind,
            name: Some(tag.name),
            attributes: Some(tag.attributes),
            raw_text: raw_text.to_string(),
        }
    }

    /// Tag name, or the empty string for data and newline tokens.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Replaces `\r\n` and bare `\r` with `\n`.
///
/// Borrows the input when it contains no carriage return.
///
/// # Examples
///
/// ```rust
/// use bbmark::normalize_newlines;
///
/// assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
/// ```
#[must_use]
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Splits an untagged span into data and newline tokens.
///
/// Empty lines yield no data token; a newline token separates consecutive lines.
pub fn split_lines(span: &str, out: &mut VecDeque<Token>) {
    let mut lines = span.split('\n').peekable();
    while let Some(line) = lines.next() {
        if !line.is_empty() {
            out.push_back(Token::data(line));
        }
        if lines.peek().is_some() {
            out.push_back(Token::newline());
        }
    }
}

/// Lazy token iterator over one input.
///
/// Single forward pass; create a fresh one to scan the same text again.
pub struct Tokenizer<'a> {
    text: Cow<'a, str>,
    options: ParseOptions,
    /// End of the last emitted token.
    cursor: usize,
    /// Where to look for the next opening delimiter.
    search: usize,
    pending: VecDeque<Token>,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over `text`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] for an empty string and
    /// [`Error::InvalidDelimiters`] when both delimiters are equal.
    pub fn new(text: &'a str, options: &ParseOptions) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::EmptyInput);
        }
        options.validate()?;
        Ok(Tokenizer {
            text: normalize_newlines(text),
            options: options.clone(),
            cursor: 0,
            search: 0,
            pending: VecDeque::new(),
            done: false,
        })
    }

    /// The normalized text all token offsets refer to.
    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.text
    }

    fn scan(&mut self) {
        let open_ch = self.options.open_ch;
        while let Some(found) = self.text[self.search..].find(open_ch) {
            let start = self.search + found;
            match parse_tag(&self.text, start, &self.options) {
                Ok(tag) => {
                    let end = tag.end;
                    if start > self.cursor {
                        split_lines(&self.text[self.cursor..start], &mut self.pending);
                    }
                    self.pending
                        .push_back(Token::tag(tag, &self.text[start..end]));
                    self.cursor = end;
                    self.search = end;
                    return;
                }
                Err(err) => {
                    log::trace!(target: "bbmark::tokenizer", "not a tag at {start}: {err}");
                    self.search = start + open_ch.len_utf8();
                }
            }
        }

        if self.cursor < self.text.len() {
            split_lines(&self.text[self.cursor..], &mut self.pending);
            self.cursor = self.text.len();
        }
        self.done = true;
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.done {
                return None;
            }
            self.scan();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        Tokenizer::new(text, &ParseOptions::default())
            .unwrap()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_split_lines() {
        let mut out = VecDeque::new();
        split_lines("a\n\nb\n", &mut out);
        let raw: Vec<_> = out.iter().map(|t| t.raw_text.as_str()).collect();
        assert_eq!(raw, vec!["a", "\n", "\n", "b", "\n"]);
    }

    #[test]
    fn test_normalize_is_borrowed_without_cr() {
        assert!(matches!(normalize_newlines("a\nb"), Cow::Borrowed(_)));
        assert_eq!(normalize_newlines("\r\r\n"), "\n\n");
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(kinds("hello"), vec![TokenKind::Data]);
        assert_eq!(kinds("\n"), vec![TokenKind::Newline]);
    }

    #[test]
    fn test_tag_kinds() {
        assert_eq!(
            kinds("[b]x[/b][hr/]"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Data,
                TokenKind::CloseTag,
                TokenKind::SelfClosingTag
            ]
        );
    }

    #[test]
    fn test_failed_tag_resumes_at_next_delimiter() {
        let tokens: Vec<_> = Tokenizer::new("[[b]x", &ParseOptions::default())
            .unwrap()
            .collect();
        assert_eq!(tokens[0], Token::data("["));
        assert_eq!(tokens[1].kind, TokenKind::OpenTag);
        assert_eq!(tokens[1].raw_text, "[b]");
        assert_eq!(tokens[2], Token::data("x"));
    }

    #[test]
    fn test_preconditions() {
        assert!(matches!(
            Tokenizer::new("", &ParseOptions::default()),
            Err(Error::EmptyInput)
        ));
        let options = ParseOptions::new().with_delimiters('#', '#');
        assert!(matches!(
            Tokenizer::new("x", &options),
            Err(Error::InvalidDelimiters { .. })
        ));
    }

    #[test]
    fn test_early_stop() {
        let mut tokens = Tokenizer::new("[b]a[/b][i]b[/i]", &ParseOptions::default()).unwrap();
        assert_eq!(tokens.next().map(|t| t.kind), Some(TokenKind::OpenTag));
        assert_eq!(tokens.next().map(|t| t.raw_text), Some("a".to_string()));
        drop(tokens);
    }
}
