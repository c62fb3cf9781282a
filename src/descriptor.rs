//! Tag descriptors and the registry that maps names to them.
//!
//! A [`TagDescriptor`] is everything the tree builder and the renderer need
//! to know about a tag: eight behavioral flags ([`TagFlags`]) and two
//! rendering callbacks. Hosts plug their own tag types in by implementing the
//! trait and registering them in a [`TagRegistry`], or by implementing
//! [`DescriptorLookup`] over their own storage.
//!
//! ## Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use bbmark::{NodeRef, TagDescriptor, TagFlags, TagRegistry};
//!
//! #[derive(Debug)]
//! struct Spoiler;
//!
//! impl TagDescriptor for Spoiler {
//!     fn flags(&self) -> TagFlags {
//!         TagFlags::block().with_close_inlines(true)
//!     }
//!
//!     fn render_html(&self, _node: &NodeRef<'_>, children: &str) -> String {
//!         format!("<details>{children}</details>\n")
//!     }
//!
//!     fn render_text(&self, _node: &NodeRef<'_>, _children: &str) -> String {
//!         "[spoiler]".to_string()
//!     }
//! }
//!
//! let mut registry = TagRegistry::new();
//! registry.register("spoiler", Arc::new(Spoiler)).unwrap();
//! let tree = bbmark::parse("[spoiler]secret[/spoiler]", &registry).unwrap();
//! assert_eq!(tree.to_html(), "<details>secret</details>\n");
//! assert_eq!(tree.to_text(), "[spoiler]");
//! ```

use crate::tag::is_valid_tag_name;
use crate::tree::NodeRef;
use crate::{Error, Result};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Behavioral flags of a tag type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagFlags {
    /// An unterminated tag is closed at the next newline.
    pub newline_closes: bool,
    /// Opening the same tag again closes the previous one (list items).
    pub same_tag_closes: bool,
    /// The tag never has children nor a matching close tag.
    pub standalone: bool,
    /// When `false`, the body is captured verbatim as a single text child.
    pub parse_embedded: bool,
    /// One newline right after the tag's close is dropped.
    pub swallow_trailing_newline: bool,
    /// Inline-level (`true`) or block-level (`false`) element.
    pub inline: bool,
    /// Opening the tag closes all open inline tags first.
    pub close_inlines: bool,
    /// The tag's children are grouped into paragraphs at blank lines.
    pub make_paragraphs_here: bool,
}

impl Default for TagFlags {
    fn default() -> Self {
        TagFlags::inline()
    }
}

impl TagFlags {
    /// A plain inline tag: parses its body, nothing implicit.
    #[must_use]
    pub const fn inline() -> Self {
        TagFlags {
            newline_closes: false,
            same_tag_closes: false,
            standalone: false,
            parse_embedded: true,
            swallow_trailing_newline: false,
            inline: true,
            close_inlines: false,
            make_paragraphs_here: false,
        }
    }

    /// A plain block-level tag.
    #[must_use]
    pub const fn block() -> Self {
        TagFlags {
            inline: false,
            ..TagFlags::inline()
        }
    }

    #[must_use]
    pub const fn with_newline_closes(mut self, value: bool) -> Self {
        self.newline_closes = value;
        self
    }

    #[must_use]
    pub const fn with_same_tag_closes(mut self, value: bool) -> Self {
        self.same_tag_closes = value;
        self
    }

    #[must_use]
    pub const fn with_standalone(mut self, value: bool) -> Self {
        self.standalone = value;
        self
    }

    #[must_use]
    pub const fn with_parse_embedded(mut self, value: bool) -> Self {
        self.parse_embedded = value;
        self
    }

    #[must_use]
    pub const fn with_swallow_trailing_newline(mut self, value: bool) -> Self {
        self.swallow_trailing_newline = value;
        self
    }

    #[must_use]
    pub const fn with_close_inlines(mut self, value: bool) -> Self {
        self.close_inlines = value;
        self
    }

    #[must_use]
    pub const fn with_make_paragraphs_here(mut self, value: bool) -> Self {
        self.make_paragraphs_here = value;
        self
    }

    /// Rejects flag combinations the tree builder cannot honor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContractViolation`] when a standalone tag also asks to
    /// segment paragraphs or to capture a verbatim body.
    pub fn check(&self, tag: &str) -> Result<()> {
        if self.standalone && self.make_paragraphs_here {
            return Err(Error::contract_violation(
                tag,
                "standalone tags have no children to segment into paragraphs",
            ));
        }
        if self.standalone && !self.parse_embedded {
            return Err(Error::contract_violation(
                tag,
                "standalone tags have no body to capture verbatim",
            ));
        }
        Ok(())
    }
}

/// Behavior and rendering of one tag type.
///
/// Rendering is post-order: `children` is the already rendered output of the
/// node's children, concatenated in source order.
pub trait TagDescriptor: fmt::Debug + Send + Sync {
    fn flags(&self) -> TagFlags;

    fn render_html(&self, node: &NodeRef<'_>, children: &str) -> String;

    fn render_text(&self, node: &NodeRef<'_>, children: &str) -> String;
}

/// Read-only name lookup used during a parse.
pub trait DescriptorLookup {
    /// Returns the descriptor registered under the (lowercase) `name`.
    fn lookup(&self, name: &str) -> Option<Arc<dyn TagDescriptor>>;
}

/// Name-keyed descriptor registry.
///
/// # Examples
///
/// ```rust
/// use bbmark::TagRegistry;
///
/// let registry = TagRegistry::with_defaults();
/// assert!(registry.contains("lowercase"));
/// assert!(registry.contains("*"));
/// assert!(!registry.contains("marquee"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    tags: IndexMap<String, Arc<dyn TagDescriptor>>,
}

impl TagRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in tag families.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        crate::tags::register_defaults(&mut registry);
        registry
    }

    /// Registers `descriptor` under `name` (case-insensitive), replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTagName`] when the tag grammar could never produce `name`.
    pub fn register(&mut self, name: &str, descriptor: Arc<dyn TagDescriptor>) -> Result<()> {
        if !is_valid_tag_name(name) {
            return Err(Error::invalid_tag_name(name));
        }
        self.tags.insert(name.to_ascii_lowercase(), descriptor);
        Ok(())
    }

    /// Inserts a built-in entry whose name is a lowercase identifier.
    pub(crate) fn insert_builtin(&mut self, name: &'static str, descriptor: Arc<dyn TagDescriptor>) {
        debug_assert!(
            is_valid_tag_name(name) && name == name.to_ascii_lowercase(),
            "built-in tag name {name:?}"
        );
        self.tags.insert(name.to_string(), descriptor);
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl DescriptorLookup for TagRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<dyn TagDescriptor>> {
        self.tags.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::HorizontalRule;

    #[test]
    fn test_flag_presets() {
        let inline = TagFlags::inline();
        assert!(inline.inline && inline.parse_embedded);
        assert!(!inline.standalone && !inline.close_inlines);
        let block = TagFlags::block().with_make_paragraphs_here(true);
        assert!(!block.inline && block.make_paragraphs_here);
    }

    #[test]
    fn test_contradictory_flags() {
        let flags = TagFlags::block()
            .with_standalone(true)
            .with_parse_embedded(false);
        assert!(matches!(
            flags.check("x"),
            Err(Error::ContractViolation { .. })
        ));
        assert!(TagFlags::block().with_standalone(true).check("x").is_ok());
    }

    #[test]
    fn test_register_normalizes_and_validates() {
        let mut registry = TagRegistry::new();
        registry.register("HR", Arc::new(HorizontalRule)).unwrap();
        assert!(registry.lookup("hr").is_some());
        assert!(registry.lookup("HR").is_none());
        assert!(matches!(
            registry.register("h r", Arc::new(HorizontalRule)),
            Err(Error::InvalidTagName(_))
        ));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["hr"]);
    }
}
