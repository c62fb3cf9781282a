//! Tag syntax recognition.
//!
//! [`parse_tag`] recognizes exactly one tag occurrence starting at a given
//! byte offset. It is a pure function: it never allocates anything beyond the
//! returned [`ParsedTag`] and never looks past the first closing delimiter that
//! ends the tag (quoted values may contain delimiters).
//!
//! ## Grammar
//!
//! ```text
//! tag        := open ( closing | opening ) close
//! closing    := '/' name ws*
//! opening    := name ( '=' value )? ( ws+ attribute )* ws* '/'?
//! attribute  := name ( '=' value )?
//! value      := '"' [^"]* '"' | '\'' [^']* '\'' | [^ws open close]*
//! name       := [A-Za-z0-9_*-]+
//! ```
//!
//! Names are ASCII-lowercased. A failed attempt only reads as far as the
//! first character that cannot continue the tag, so recovery cost stays local.
//! Failures are reported as [`SyntaxError`] and
//! are meant to be recovered from by the caller.
//!
//! ## Examples
//!
//! ```rust
//! use bbmark::{parse_tag, ParseOptions};
//!
//! let tag = parse_tag("[URL=http://x.org title='X Org']", 0, &ParseOptions::default()).unwrap();
//! assert_eq!(tag.name, "url");
//! assert_eq!(tag.attributes.tag_value(), Some("http://x.org"));
//! assert_eq!(tag.attributes.get("title"), Some("X Org"));
//! assert!(!tag.closing && !tag.self_closing);
//! ```

use crate::attrs::TAG_VALUE_KEY;
use crate::error::SyntaxError;
use crate::{Attributes, ParseOptions};

/// One recognized tag occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag {
    /// Lowercased tag name.
    pub name: String,
    /// `[/name]` form.
    pub closing: bool,
    /// `[name/]` form.
    pub self_closing: bool,
    pub attributes: Attributes,
    /// Byte offset just past the closing delimiter.
    pub end: usize,
}

/// Returns `true` if `c` may appear in a tag or attribute name.
#[inline]
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '*')
}

/// Returns `true` if `name` is a non-empty string of name characters.
///
/// # Examples
///
/// ```rust
/// use bbmark::tag::is_valid_tag_name;
///
/// assert!(is_valid_tag_name("h1"));
/// assert!(is_valid_tag_name("*"));
/// assert!(!is_valid_tag_name(""));
/// assert!(!is_valid_tag_name("a b"));
/// ```
#[must_use]
pub fn is_valid_tag_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

/// Parses the tag starting at byte offset `start` of `text`.
///
/// `text[start..]` is expected to begin with `options.open_ch`.
///
/// # Errors
///
/// Returns a [`SyntaxError`] when the text at `start` is not a well-formed tag:
/// no closing delimiter, empty or invalid name, attributes on a closing tag,
/// a disabled syntax shortcut, or an unterminated quoted value.
pub fn parse_tag(
    text: &str,
    start: usize,
    options: &ParseOptions,
) -> Result<ParsedTag, SyntaxError> {
    TagParser::new(text, start, options).parse()
}

struct TagParser<'a> {
    input: &'a str,
    start: usize,
    position: usize,
    options: &'a ParseOptions,
}

impl<'a> TagParser<'a> {
    fn new(input: &'a str, start: usize, options: &'a ParseOptions) -> Self {
        TagParser {
            input,
            start,
            position: start,
            options,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position..)?.chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn unterminated(&self) -> SyntaxError {
        SyntaxError::Unterminated {
            offset: self.position,
        }
    }

    /// Reads a run of name characters.
    fn read_word(&mut self) -> &'a str {
        let begin = self.position;
        while self.peek_char().is_some_and(is_name_char) {
            self.next_char();
        }
        &self.input[begin..self.position]
    }

    /// Whether the current character may follow a name.
    fn at_name_boundary(&self) -> bool {
        match self.peek_char() {
            None => true,
            Some(ch) => {
                ch.is_whitespace() || ch == '=' || ch == '/' || ch == self.options.close_ch
            }
        }
    }

    fn parse(mut self) -> Result<ParsedTag, SyntaxError> {
        if self.next_char() != Some(self.options.open_ch) {
            return Err(SyntaxError::EmptyName { offset: self.start });
        }

        let closing = if self.peek_char() == Some('/') {
            self.next_char();
            true
        } else {
            false
        };

        let name_at = self.position;
        let name = self.read_word();
        if self.peek_char().is_none() {
            return Err(self.unterminated());
        }
        if name.is_empty() {
            return Err(SyntaxError::EmptyName { offset: name_at });
        }
        if !self.at_name_boundary() {
            return Err(SyntaxError::InvalidName {
                offset: self.position,
                name: name.to_string(),
            });
        }
        let name = name.to_ascii_lowercase();

        if closing {
            self.skip_whitespace();
            return match self.next_char() {
                None => Err(self.unterminated()),
                Some(ch) if ch == self.options.close_ch => Ok(ParsedTag {
                    name,
                    closing: true,
                    self_closing: false,
                    attributes: Attributes::new(),
                    end: self.position,
                }),
                Some(_) => Err(SyntaxError::AttributesOnClosingTag { offset: name_at }),
            };
        }

        let mut attributes = Attributes::new();
        if self.peek_char() == Some('=') {
            if !self.options.allow_tagvalue_attr {
                return Err(SyntaxError::TagValueNotAllowed {
                    offset: self.position,
                });
            }
            self.next_char();
            let value = self.read_value()?;
            attributes.insert(TAG_VALUE_KEY.to_string(), value);
        }

        let self_closing = loop {
            self.skip_whitespace();
            match self.peek_char() {
                None => return Err(self.unterminated()),
                Some(ch) if ch == self.options.close_ch => {
                    self.next_char();
                    break false;
                }
                Some('/') => {
                    let slash_at = self.position;
                    self.next_char();
                    self.skip_whitespace();
                    match self.next_char() {
                        None => return Err(self.unterminated()),
                        Some(ch) if ch == self.options.close_ch => {
                            if !self.options.allow_self_closing {
                                return Err(SyntaxError::SelfClosingNotAllowed { offset: slash_at });
                            }
                            break true;
                        }
                        Some(_) => {
                            return Err(SyntaxError::InvalidAttributeName {
                                offset: slash_at,
                                name: "/".to_string(),
                            })
                        }
                    }
                }
                Some(_) => {
                    let attr_at = self.position;
                    let attr_name = self.read_word();
                    if attr_name.is_empty() || !self.at_name_boundary() {
                        return Err(SyntaxError::InvalidAttributeName {
                            offset: attr_at,
                            name: attr_name.to_string(),
                        });
                    }
                    let attr_name = attr_name.to_ascii_lowercase();
                    let value = if self.peek_char() == Some('=') {
                        self.next_char();
                        self.read_value()?
                    } else {
                        String::new()
                    };
                    attributes.insert(attr_name, value);
                }
            }
        };

        Ok(ParsedTag {
            name,
            closing: false,
            self_closing,
            attributes,
            end: self.position,
        })
    }

    fn read_value(&mut self) -> Result<String, SyntaxError> {
        match self.peek_char() {
            Some(quote @ ('"' | '\'')) => {
                let quote_at = self.position;
                self.next_char();
                let begin = self.position;
                loop {
                    match self.next_char() {
                        None => return Err(SyntaxError::UnterminatedQuote { offset: quote_at }),
                        Some(ch) if ch == quote => {
                            let end = self.position - quote.len_utf8();
                            return Ok(self.input[begin..end].to_string());
                        }
                        Some(_) => {}
                    }
                }
            }
            _ => {
                let begin = self.position;
                while let Some(ch) = self.peek_char() {
                    if ch.is_whitespace()
                        || ch == self.options.close_ch
                        || ch == self.options.open_ch
                    {
                        break;
                    }
                    self.next_char();
                }
                Ok(self.input[begin..self.position].to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ParsedTag, SyntaxError> {
        parse_tag(text, 0, &ParseOptions::default())
    }

    #[test]
    fn test_opening_tag() {
        let tag = parse("[b]rest").unwrap();
        assert_eq!(tag.name, "b");
        assert!(!tag.closing);
        assert!(!tag.self_closing);
        assert!(tag.attributes.is_empty());
        assert_eq!(tag.end, 3);
    }

    #[test]
    fn test_closing_tag() {
        let tag = parse("[/QUOTE ]").unwrap();
        assert_eq!(tag.name, "quote");
        assert!(tag.closing);
        assert_eq!(tag.end, 9);
    }

    #[test]
    fn test_self_closing_tag() {
        let tag = parse("[hr/]").unwrap();
        assert!(tag.self_closing);
        let tag = parse("[img src=a.png /]").unwrap();
        assert!(tag.self_closing);
        assert_eq!(tag.attributes.get("src"), Some("a.png"));
    }

    #[test]
    fn test_tag_value_then_attributes() {
        let tag = parse(r#"[quote="John Doe" date=2020 pinned]"#).unwrap();
        let pairs: Vec<_> = tag.attributes.iter().collect();
        assert_eq!(
            pairs,
            vec![("", "John Doe"), ("date", "2020"), ("pinned", "")]
        );
    }

    #[test]
    fn test_unquoted_value_keeps_slashes() {
        let tag = parse("[url=http://example.com/]").unwrap();
        assert_eq!(tag.attributes.tag_value(), Some("http://example.com/"));
        assert!(!tag.self_closing);
    }

    #[test]
    fn test_quoted_value_may_contain_delimiters() {
        let tag = parse("[a title='[x]']").unwrap();
        assert_eq!(tag.attributes.get("title"), Some("[x]"));
        assert_eq!(tag.end, 15);
    }

    #[test]
    fn test_start_offset() {
        let text = "abc [i]";
        let tag = parse_tag(text, 4, &ParseOptions::default()).unwrap();
        assert_eq!(tag.name, "i");
        assert_eq!(tag.end, text.len());
    }

    #[test]
    fn test_failures() {
        assert!(matches!(parse("[b"), Err(SyntaxError::Unterminated { .. })));
        assert!(matches!(parse("[]"), Err(SyntaxError::EmptyName { .. })));
        assert!(matches!(parse("[ b]"), Err(SyntaxError::EmptyName { .. })));
        assert!(matches!(parse("[b!]"), Err(SyntaxError::InvalidName { .. })));
        assert!(matches!(
            parse("[b[i]"),
            Err(SyntaxError::InvalidName { offset: 2, .. })
        ));
        assert!(matches!(
            parse("[a x[y]"),
            Err(SyntaxError::InvalidAttributeName { offset: 3, .. })
        ));
        assert!(matches!(
            parse("[url=a[b]"),
            Err(SyntaxError::InvalidAttributeName { offset: 6, .. })
        ));
        assert!(matches!(
            parse("[/b x=1]"),
            Err(SyntaxError::AttributesOnClosingTag { .. })
        ));
        assert!(matches!(
            parse("[a title=\"oops]"),
            Err(SyntaxError::UnterminatedQuote { offset: 9 })
        ));
        assert!(matches!(
            parse("[a /x]"),
            Err(SyntaxError::InvalidAttributeName { .. })
        ));
    }

    #[test]
    fn test_disabled_shortcuts() {
        let options = ParseOptions::new()
            .with_self_closing(false)
            .with_tagvalue_attr(false);
        assert!(matches!(
            parse_tag("[hr/]", 0, &options),
            Err(SyntaxError::SelfClosingNotAllowed { offset: 3 })
        ));
        assert!(matches!(
            parse_tag("[url=x]", 0, &options),
            Err(SyntaxError::TagValueNotAllowed { offset: 4 })
        ));
    }

    #[test]
    fn test_custom_delimiters_and_unicode() {
        let options = ParseOptions::new().with_delimiters('«', '»');
        let text = "«b title=é»";
        let tag = parse_tag(text, 0, &options).unwrap();
        assert_eq!(tag.name, "b");
        assert_eq!(tag.attributes.get("title"), Some("é"));
        assert_eq!(tag.end, text.len());
    }
}
