//! Built-in tag families.
//!
//! Each family is one small type implementing [`TagDescriptor`]:
//!
//! - [`TextModifier`]: `lowercase`, `uppercase`, `capitalize`
//! - [`InlineWrapper`]: `b`, `i`, `u`, `s`
//! - [`ListTag`] and [`ListItem`]: `list`, `*`, `li`
//! - [`HorizontalRule`]: `hr`
//! - [`CodeBlock`]: `code`
//! - [`Heading`]: `h1` to `h6`
//! - [`Quote`]: `quote`
//!
//! [`TagRegistry::with_defaults`] registers all of them.

use crate::descriptor::{TagDescriptor, TagFlags, TagRegistry};
use crate::tree::NodeRef;
use std::sync::Arc;

/// Case transformation applied by a [`TextModifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTransform {
    Lowercase,
    Uppercase,
    Capitalize,
    /// Leaves text unchanged.
    PassThrough,
}

impl TextTransform {
    /// Maps a modifier name to its transform; unknown names pass through.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "lowercase" => TextTransform::Lowercase,
            "uppercase" => TextTransform::Uppercase,
            "capitalize" => TextTransform::Capitalize,
            _ => TextTransform::PassThrough,
        }
    }

    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            TextTransform::Lowercase => text.to_lowercase(),
            TextTransform::Uppercase => text.to_uppercase(),
            TextTransform::Capitalize => {
                let mut chars = text.chars();
                let Some(first) = chars.next() else {
                    return String::new();
                };
                let mut out: String = first.to_uppercase().collect();
                out.push_str(&chars.as_str().to_lowercase());
                out
            }
            TextTransform::PassThrough => text.to_string(),
        }
    }
}

/// Inline tag changing the case of its text.
///
/// HTML output leaves the transform to a `text-{name}` CSS class; text output
/// applies it.
///
/// # Examples
///
/// ```rust
/// use bbmark::{parse, TagRegistry};
///
/// let registry = TagRegistry::with_defaults();
/// let tree = parse("[lowercase]teST[/lowercase]", &registry).unwrap();
/// assert_eq!(tree.to_text(), "test");
/// ```
#[derive(Debug, Clone)]
pub struct TextModifier {
    name: String,
    transform: TextTransform,
}

impl TextModifier {
    pub fn new(name: &str) -> Self {
        TextModifier {
            name: name.to_string(),
            transform: TextTransform::from_name(name),
        }
    }

    #[must_use]
    pub fn transform(&self) -> TextTransform {
        self.transform
    }
}

impl TagDescriptor for TextModifier {
    fn flags(&self) -> TagFlags {
        TagFlags::inline()
    }

    fn render_html(&self, _node: &NodeRef<'_>, children: &str) -> String {
        format!("<span class=\"text-{}\">{children}</span>\n", self.name)
    }

    fn render_text(&self, _node: &NodeRef<'_>, children: &str) -> String {
        self.transform.apply(children)
    }
}

/// Inline tag rendered as a plain HTML element.
#[derive(Debug, Clone)]
pub struct InlineWrapper {
    html_tag: &'static str,
}

impl InlineWrapper {
    #[must_use]
    pub const fn new(html_tag: &'static str) -> Self {
        InlineWrapper { html_tag }
    }

    #[must_use]
    pub const fn bold() -> Self {
        Self::new("strong")
    }

    #[must_use]
    pub const fn italic() -> Self {
        Self::new("em")
    }

    #[must_use]
    pub const fn underline() -> Self {
        Self::new("ins")
    }

    #[must_use]
    pub const fn strike() -> Self {
        Self::new("del")
    }
}

impl TagDescriptor for InlineWrapper {
    fn flags(&self) -> TagFlags {
        TagFlags::inline()
    }

    fn render_html(&self, _node: &NodeRef<'_>, children: &str) -> String {
        format!("<{tag}>{children}</{tag}>", tag = self.html_tag)
    }

    fn render_text(&self, _node: &NodeRef<'_>, children: &str) -> String {
        children.to_string()
    }
}

/// `[list]` container; `[list=1]`, `a`, `A`, `i` or `I` make it ordered.
#[derive(Debug, Clone)]
pub struct ListTag;

impl ListTag {
    fn ordered_type(node: &NodeRef<'_>) -> Option<&'static str> {
        match node.attributes().tag_value()? {
            "1" => Some("1"),
            "a" => Some("a"),
            "A" => Some("A"),
            "i" => Some("i"),
            "I" => Some("I"),
            _ => None,
        }
    }
}

impl TagDescriptor for ListTag {
    fn flags(&self) -> TagFlags {
        TagFlags::block()
            .with_close_inlines(true)
            .with_swallow_trailing_newline(true)
    }

    fn render_html(&self, node: &NodeRef<'_>, children: &str) -> String {
        let children = children.trim_start_matches("<br>\n");
        match Self::ordered_type(node) {
            Some("1") => format!("<ol>\n{children}</ol>\n"),
            Some(kind) => format!("<ol type=\"{kind}\">\n{children}</ol>\n"),
            None => format!("<ul>\n{children}</ul>\n"),
        }
    }

    fn render_text(&self, _node: &NodeRef<'_>, children: &str) -> String {
        children.trim_start_matches('\n').to_string()
    }
}

/// List item; a new item closes the previous one.
#[derive(Debug, Clone)]
pub struct ListItem;

impl TagDescriptor for ListItem {
    fn flags(&self) -> TagFlags {
        TagFlags::block()
            .with_same_tag_closes(true)
            .with_close_inlines(true)
    }

    fn render_html(&self, _node: &NodeRef<'_>, children: &str) -> String {
        format!("<li>{}</li>\n", children.trim_end_matches("<br>\n"))
    }

    fn render_text(&self, _node: &NodeRef<'_>, children: &str) -> String {
        format!("- {}\n", children.trim_end_matches('\n'))
    }
}

#[derive(Debug, Clone)]
pub struct HorizontalRule;

impl TagDescriptor for HorizontalRule {
    fn flags(&self) -> TagFlags {
        TagFlags::block()
            .with_standalone(true)
            .with_close_inlines(true)
            .with_swallow_trailing_newline(true)
    }

    fn render_html(&self, _node: &NodeRef<'_>, _children: &str) -> String {
        "<hr>\n".to_string()
    }

    fn render_text(&self, _node: &NodeRef<'_>, _children: &str) -> String {
        "----------\n".to_string()
    }
}

/// Preformatted block whose body is never parsed.
#[derive(Debug, Clone)]
pub struct CodeBlock;

impl TagDescriptor for CodeBlock {
    fn flags(&self) -> TagFlags {
        TagFlags::block()
            .with_parse_embedded(false)
            .with_close_inlines(true)
            .with_swallow_trailing_newline(true)
    }

    fn render_html(&self, node: &NodeRef<'_>, children: &str) -> String {
        match node.attributes().tag_value() {
            Some(language) if !language.is_empty() => format!(
                "<pre><code class=\"language-{}\">{children}</code></pre>\n",
                crate::escape_html(language)
            ),
            _ => format!("<pre><code>{children}</code></pre>\n"),
        }
    }

    fn render_text(&self, _node: &NodeRef<'_>, children: &str) -> String {
        format!("{children}\n")
    }
}

/// Single-line heading, closed by the end of its line.
#[derive(Debug, Clone)]
pub struct Heading {
    level: u8,
}

impl Heading {
    /// Creates a heading descriptor; `level` is clamped to 1..=6.
    #[must_use]
    pub fn new(level: u8) -> Self {
        Heading {
            level: level.clamp(1, 6),
        }
    }
}

impl TagDescriptor for Heading {
    fn flags(&self) -> TagFlags {
        TagFlags::block()
            .with_newline_closes(true)
            .with_close_inlines(true)
            .with_swallow_trailing_newline(true)
    }

    fn render_html(&self, _node: &NodeRef<'_>, children: &str) -> String {
        format!("<h{level}>{children}</h{level}>\n", level = self.level)
    }

    fn render_text(&self, _node: &NodeRef<'_>, children: &str) -> String {
        format!("{children}\n")
    }
}

/// Block quotation, optionally attributed with `[quote=author]`.
#[derive(Debug, Clone)]
pub struct Quote;

impl TagDescriptor for Quote {
    fn flags(&self) -> TagFlags {
        TagFlags::block()
            .with_close_inlines(true)
            .with_make_paragraphs_here(true)
            .with_swallow_trailing_newline(true)
    }

    fn render_html(&self, node: &NodeRef<'_>, children: &str) -> String {
        match node.attributes().tag_value() {
            Some(author) if !author.is_empty() => format!(
                "<blockquote>\n{children}<footer>{}</footer>\n</blockquote>\n",
                crate::escape_html(author)
            ),
            _ => format!("<blockquote>\n{children}</blockquote>\n"),
        }
    }

    fn render_text(&self, _node: &NodeRef<'_>, children: &str) -> String {
        let mut out = String::with_capacity(children.len() + 16);
        for line in children.trim_end_matches('\n').lines() {
            out.push_str("> ");
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

pub(crate) fn register_defaults(registry: &mut TagRegistry) {
    let defaults: Vec<(&'static str, Arc<dyn TagDescriptor>)> = vec![
        ("lowercase", Arc::new(TextModifier::new("lowercase"))),
        ("uppercase", Arc::new(TextModifier::new("uppercase"))),
        ("capitalize", Arc::new(TextModifier::new("capitalize"))),
        ("b", Arc::new(InlineWrapper::bold())),
        ("i", Arc::new(InlineWrapper::italic())),
        ("u", Arc::new(InlineWrapper::underline())),
        ("s", Arc::new(InlineWrapper::strike())),
        ("list", Arc::new(ListTag)),
        ("*", Arc::new(ListItem)),
        ("li", Arc::new(ListItem)),
        ("hr", Arc::new(HorizontalRule)),
        ("code", Arc::new(CodeBlock)),
        ("h1", Arc::new(Heading::new(1))),
        ("h2", Arc::new(Heading::new(2))),
        ("h3", Arc::new(Heading::new(3))),
        ("h4", Arc::new(Heading::new(4))),
        ("h5", Arc::new(Heading::new(5))),
        ("h6", Arc::new(Heading::new(6))),
        ("quote", Arc::new(Quote)),
    ];
    for (name, descriptor) in defaults {
        registry.insert_builtin(name, descriptor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;
    use crate::Attributes;

    fn with_node<R>(name: &str, descriptor: Arc<dyn TagDescriptor>, f: impl FnOnce(&NodeRef<'_>) -> R) -> R {
        let mut tree = Tree::new();
        let root = tree.root();
        let id = tree.append_element(root, name, descriptor, Attributes::new());
        f(&tree.get(id))
    }

    #[test]
    fn test_text_modifier_flags() {
        let flags = TextModifier::new("lowercase").flags();
        assert!(!flags.newline_closes);
        assert!(!flags.same_tag_closes);
        assert!(!flags.standalone);
        assert!(flags.parse_embedded);
        assert!(!flags.swallow_trailing_newline);
        assert!(flags.inline);
        assert!(!flags.close_inlines);
        assert!(!flags.make_paragraphs_here);
    }

    #[test]
    fn test_render_html_modifiers() {
        for name in ["lowercase", "uppercase", "capitalize"] {
            let opts = Arc::new(TextModifier::new(name));
            let html = with_node(name, opts.clone(), |node| opts.render_html(node, "test"));
            assert_eq!(html, format!("<span class=\"text-{name}\">test</span>\n"));
        }
    }

    #[test]
    fn test_render_text_modifiers() {
        let cases = [
            ("lowercase", "teST", "test"),
            ("uppercase", "teST", "TEST"),
            ("capitalize", "test", "Test"),
            ("capitalize", "tEST", "Test"),
            ("unknown", "teST", "teST"),
        ];
        for (name, input, expected) in cases {
            let opts = Arc::new(TextModifier::new(name));
            let text = with_node(name, opts.clone(), |node| opts.render_text(node, input));
            assert_eq!(text, expected, "{name}");
        }
    }

    #[test]
    fn test_unknown_transform_passes_through() {
        assert_eq!(TextTransform::from_name("wavy"), TextTransform::PassThrough);
        assert_eq!(TextTransform::Capitalize.apply(""), "");
    }

    #[test]
    fn test_heading_level_clamped() {
        let heading = Arc::new(Heading::new(9));
        let html = with_node("h9", heading.clone(), |node| heading.render_html(node, "x"));
        assert_eq!(html, "<h6>x</h6>\n");
    }

    #[test]
    fn test_defaults_pass_flag_check() {
        let registry = TagRegistry::with_defaults();
        assert_eq!(registry.len(), 19);
        for name in registry.names() {
            let descriptor = crate::DescriptorLookup::lookup(&registry, name).unwrap();
            assert!(descriptor.flags().check(name).is_ok(), "{name}");
            assert!(crate::tag::is_valid_tag_name(name), "{name}");
        }
    }
}
