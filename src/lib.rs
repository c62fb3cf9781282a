//! # bbmark
//!
//! A front end for BBCode-style markup: bracket-delimited tags such as
//! `[b]bold[/b]`, `[url=http://example.com]link[/url]` or `[hr/]`.
//!
//! ## Pipeline
//!
//! ```text
//! text ──▶ Tokenizer ──▶ tokens ──▶ TreeBuilder ──▶ Tree ──▶ render ──▶ HTML / text
//!             │                         │
//!         parse_tag               DescriptorLookup
//! ```
//!
//! - **[`tokenize`]**: lossless, lazy tokenization. Malformed tag syntax stays
//!   ordinary text; concatenating every token's `raw_text` gives back the
//!   (newline-normalized) input.
//! - **[`parse_tag`]**: recognizes one tag occurrence with its attributes.
//! - **[`build`]**: assembles the tree from tokens and a registry of
//!   [`TagDescriptor`]s, honoring implicit closes, verbatim bodies, standalone
//!   tags and paragraph segmentation.
//! - **[`render`]**: post-order HTML or plain-text rendering.
//!
//! ## Quick Start
//!
//! ```rust
//! use bbmark::{to_html, to_text, TagRegistry};
//!
//! let registry = TagRegistry::with_defaults();
//!
//! let html = to_html("[b]Hello[/b] [uppercase]world[/uppercase]", &registry).unwrap();
//! assert_eq!(html, "<strong>Hello</strong> <span class=\"text-uppercase\">world</span>\n");
//!
//! let text = to_text("[b]Hello[/b] [uppercase]world[/uppercase]", &registry).unwrap();
//! assert_eq!(text, "Hello WORLD");
//! ```
//!
//! ## Graceful degradation
//!
//! Unknown tags, unmatched close tags and malformed syntax all end up as
//! visible text:
//!
//! ```rust
//! use bbmark::{to_html, TagRegistry};
//!
//! let registry = TagRegistry::with_defaults();
//! let html = to_html("[blink]a [ b[/i]", &registry).unwrap();
//! assert_eq!(html, "[blink]a [ b[/i]");
//! ```
//!
//! ## Custom tags
//!
//! Implement [`TagDescriptor`] and register it; see the [`descriptor`] module.

pub mod attrs;
pub mod builder;
pub mod descriptor;
pub mod error;
pub mod options;
pub mod render;
pub mod tag;
pub mod tags;
pub mod token;
pub mod tree;

pub use attrs::Attributes;
pub use builder::{build, TreeBuilder};
pub use descriptor::{DescriptorLookup, TagDescriptor, TagFlags, TagRegistry};
pub use error::{Error, Result, SyntaxError};
pub use options::ParseOptions;
pub use render::{escape_html, render, Target};
pub use tag::{parse_tag, ParsedTag};
pub use token::{normalize_newlines, Token, TokenKind, Tokenizer};
pub use tree::{Node, NodeId, NodeKind, NodeRef, Tree};

/// Tokenizes `text` with the default `[` `]` syntax.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] for an empty string.
pub fn tokenize(text: &str) -> Result<Tokenizer<'_>> {
    Tokenizer::new(text, &ParseOptions::default())
}

/// Tokenizes `text` with custom syntax options.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] for an empty string and
/// [`Error::InvalidDelimiters`] for identical delimiters.
pub fn tokenize_with_options<'a>(text: &'a str, options: &ParseOptions) -> Result<Tokenizer<'a>> {
    Tokenizer::new(text, options)
}

/// Parses `text` into a tree using the default options.
///
/// # Examples
///
/// ```rust
/// use bbmark::{parse, TagRegistry};
///
/// let registry = TagRegistry::with_defaults();
/// let tree = parse("[i]x[/i]", &registry).unwrap();
/// let root = tree.root();
/// assert_eq!(tree.children(root).len(), 1);
/// assert_eq!(tree.node(tree.children(root)[0]).name(), Some("i"));
/// ```
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] for an empty string and
/// [`Error::ContractViolation`] for descriptors with contradictory flags.
pub fn parse(text: &str, lookup: &dyn DescriptorLookup) -> Result<Tree> {
    parse_with_options(text, lookup, &ParseOptions::default())
}

/// Parses `text` into a tree with custom options.
///
/// # Errors
///
/// See [`parse`] and [`tokenize_with_options`].
pub fn parse_with_options(
    text: &str,
    lookup: &dyn DescriptorLookup,
    options: &ParseOptions,
) -> Result<Tree> {
    let tokens = Tokenizer::new(text, options)?;
    build(tokens, lookup, options)
}

/// Parses and renders `text` as HTML.
///
/// # Errors
///
/// See [`parse`].
pub fn to_html(text: &str, lookup: &dyn DescriptorLookup) -> Result<String> {
    Ok(parse(text, lookup)?.to_html())
}

/// Parses and renders `text` as plain text.
///
/// # Errors
///
/// See [`parse`].
pub fn to_text(text: &str, lookup: &dyn DescriptorLookup) -> Result<String> {
    Ok(parse(text, lookup)?.to_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_rejected() {
        let registry = TagRegistry::with_defaults();
        assert_eq!(parse("", &registry).err(), Some(Error::EmptyInput));
    }

    #[test]
    fn test_custom_delimiters_end_to_end() {
        let registry = TagRegistry::with_defaults();
        let options = ParseOptions::new().with_delimiters('<', '>');
        let tree = parse_with_options("<b>x</b> [b]", &registry, &options).unwrap();
        assert_eq!(tree.to_html(), "<strong>x</strong> [b]");
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        let registry = std::sync::Arc::new(TagRegistry::with_defaults());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || to_text(&format!("[uppercase]n{i}[/uppercase]"), &*registry))
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap().unwrap(), format!("N{i}"));
        }
    }
}
