//! Rendering dispatch.
//!
//! [`render`] walks a subtree depth-first and post-order: every child is
//! rendered before its parent, the results are concatenated in source order,
//! and the parent's descriptor turns that into its own output. The walk uses
//! an explicit stack, so nesting depth is not limited by the call stack.
//!
//! Nodes without a descriptor render as follows:
//!
//! | Node            | HTML                 | Text           |
//! |-----------------|----------------------|----------------|
//! | root            | children             | children       |
//! | paragraph       | `<p>children</p>\n`  | `children\n\n` |
//! | text, literal   | escaped text         | text           |
//! | newline         | `<br>\n`             | `\n`           |

use crate::tree::{NodeId, NodeKind, Tree};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Html,
    Text,
}

/// Escapes `&`, `<`, `>`, `"` and `'` for HTML text and attribute values.
///
/// # Examples
///
/// ```rust
/// use bbmark::escape_html;
///
/// assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
/// ```
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

struct Frame {
    id: NodeId,
    next_child: usize,
    output: String,
}

/// Renders the subtree rooted at `id` to `target`.
///
/// # Examples
///
/// ```rust
/// use bbmark::{parse, render, TagRegistry, Target};
///
/// let registry = TagRegistry::with_defaults();
/// let tree = parse("[b]1 < 2[/b]", &registry).unwrap();
/// assert_eq!(render(&tree, tree.root(), Target::Html), "<strong>1 &lt; 2</strong>");
/// assert_eq!(render(&tree, tree.root(), Target::Text), "1 < 2");
/// ```
#[must_use]
pub fn render(tree: &Tree, id: NodeId, target: Target) -> String {
    let mut stack = vec![Frame {
        id,
        next_child: 0,
        output: String::new(),
    }];

    loop {
        let Some(top) = stack.last_mut() else {
            return String::new();
        };
        if let Some(&child) = tree.children(top.id).get(top.next_child) {
            top.next_child += 1;
            stack.push(Frame {
                id: child,
                next_child: 0,
                output: String::new(),
            });
            continue;
        }

        let Some(done) = stack.pop() else {
            return String::new();
        };
        let rendered = render_node(tree, done.id, &done.output, target);
        match stack.last_mut() {
            Some(parent) => parent.output.push_str(&rendered),
            None => return rendered,
        }
    }
}

fn render_node(tree: &Tree, id: NodeId, children: &str, target: Target) -> String {
    let node = tree.node(id);
    match (&node.kind, target) {
        (NodeKind::Root, _) => children.to_string(),
        (NodeKind::Element { descriptor, .. }, Target::Html) => {
            descriptor.render_html(&tree.get(id), children)
        }
        (NodeKind::Element { descriptor, .. }, Target::Text) => {
            descriptor.render_text(&tree.get(id), children)
        }
        (NodeKind::Paragraph, Target::Html) => format!("<p>{children}</p>\n"),
        (NodeKind::Paragraph, Target::Text) => format!("{children}\n\n"),
        (NodeKind::Text(text) | NodeKind::Literal(text), Target::Html) => escape_html(text),
        (NodeKind::Text(text) | NodeKind::Literal(text), Target::Text) => text.clone(),
        (NodeKind::Newline, Target::Html) => "<br>\n".to_string(),
        (NodeKind::Newline, Target::Text) => "\n".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{InlineWrapper, TextModifier};
    use crate::Attributes;
    use std::sync::Arc;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_post_order_concatenation() {
        let mut tree = Tree::new();
        let root = tree.root();
        let bold = tree.append_element(root, "b", Arc::new(InlineWrapper::bold()), Attributes::new());
        tree.append(bold, NodeKind::Text("x".to_string()));
        let lower = tree.append_element(bold, "lowercase", Arc::new(TextModifier::new("lowercase")), Attributes::new());
        tree.append(lower, NodeKind::Text("YZ".to_string()));
        tree.append(root, NodeKind::Newline);
        tree.append(root, NodeKind::Literal("[/q]".to_string()));

        assert_eq!(
            tree.to_html(),
            "<strong>x<span class=\"text-lowercase\">YZ</span>\n</strong><br>\n[/q]"
        );
        assert_eq!(tree.to_text(), "xyz\n[/q]");
        assert_eq!(render(&tree, lower, Target::Text), "yz");
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let mut tree = Tree::new();
        let mut parent = tree.root();
        for _ in 0..10_000 {
            parent = tree.append(parent, NodeKind::Paragraph);
        }
        tree.append(parent, NodeKind::Text("deep".to_string()));
        assert!(tree.to_text().starts_with("deep\n\n"));
    }
}
