//! Tree assembly.
//!
//! [`TreeBuilder`] consumes tokens one at a time and grows a [`Tree`]. Open
//! tags live on an explicit stack of frames; the top frame is the insertion
//! parent for new nodes, the root when the stack is empty.
//!
//! Markup problems never fail a build:
//!
//! - unknown tags, in any form, become literal text nodes
//! - a close tag with no matching open frame becomes literal text
//! - tags left open at the end of input are closed silently
//!
//! The only fatal error is a descriptor whose flags break the contract
//! checked by [`TagFlags::check`](crate::TagFlags::check).
//!
//! ## Examples
//!
//! ```rust
//! use bbmark::{build, tokenize, ParseOptions, TagRegistry};
//!
//! let registry = TagRegistry::with_defaults();
//! let tokens = tokenize("[list][*]one[*]two[/list]").unwrap();
//! let tree = build(tokens, &registry, &ParseOptions::default()).unwrap();
//! assert_eq!(tree.to_html(), "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n");
//! ```

use crate::descriptor::{DescriptorLookup, TagDescriptor, TagFlags};
use crate::tree::{NodeId, NodeKind, Tree};
use crate::{ParseOptions, Result, Token, TokenKind};
use std::sync::Arc;

const LOG_TARGET: &str = "bbmark::builder";

/// An open tag awaiting its close.
#[derive(Debug)]
struct Frame {
    node: NodeId,
    name: String,
    flags: TagFlags,
}

/// Incremental tree assembly engine.
pub struct TreeBuilder<'r> {
    lookup: &'r dyn DescriptorLookup,
    tree: Tree,
    stack: Vec<Frame>,
    root_paragraphs: bool,
    /// The next token, if a newline, is dropped.
    swallow_newline: bool,
}

impl<'r> TreeBuilder<'r> {
    pub fn new(lookup: &'r dyn DescriptorLookup, options: &ParseOptions) -> Self {
        TreeBuilder {
            lookup,
            tree: Tree::new(),
            stack: Vec::new(),
            root_paragraphs: options.root_paragraphs,
            swallow_newline: false,
        }
    }

    /// Names of the currently open tags, outermost first.
    pub fn open_tags(&self) -> impl Iterator<Item = &str> {
        self.stack.iter().map(|frame| frame.name.as_str())
    }

    fn insertion_parent(&self) -> NodeId {
        self.stack
            .last()
            .map_or_else(|| self.tree.root(), |frame| frame.node)
    }

    /// Feeds one token to the engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContractViolation`](crate::Error::ContractViolation) when
    /// the descriptor resolved for a tag has contradictory flags.
    pub fn push(&mut self, token: Token) -> Result<()> {
        let swallow = std::mem::take(&mut self.swallow_newline);

        if let Some(frame) = self.stack.last() {
            if !frame.flags.parse_embedded {
                self.push_verbatim(token);
                return Ok(());
            }
        }

        match token.kind {
            TokenKind::Data => {
                let parent = self.insertion_parent();
                self.tree.append(parent, NodeKind::Text(token.raw_text));
            }
            TokenKind::Newline => {
                let closed_swallows = self.close_on_newline();
                if swallow || closed_swallows {
                    log::trace!(target: LOG_TARGET, "swallowed trailing newline");
                    return Ok(());
                }
                let parent = self.insertion_parent();
                self.tree.append(parent, NodeKind::Newline);
            }
            TokenKind::OpenTag => self.open_element(token, false)?,
            TokenKind::SelfClosingTag => self.open_element(token, true)?,
            TokenKind::CloseTag => self.close_tag(token),
        }
        Ok(())
    }

    /// Closes every open tag and returns the finished tree.
    pub fn finish(mut self) -> Tree {
        if !self.stack.is_empty() {
            log::debug!(
                target: LOG_TARGET,
                "end of input with {} open tag(s), closing them",
                self.stack.len()
            );
        }
        self.close_down_to(0);
        if self.root_paragraphs {
            let root = self.tree.root();
            self.tree.make_paragraphs(root);
        }
        self.tree
    }

    fn resolve(&self, name: &str) -> Result<Option<Arc<dyn TagDescriptor>>> {
        let Some(descriptor) = self.lookup.lookup(name) else {
            return Ok(None);
        };
        descriptor.flags().check(name)?;
        Ok(Some(descriptor))
    }

    fn literal(&mut self, raw_text: String) {
        let parent = self.insertion_parent();
        self.tree.append(parent, NodeKind::Literal(raw_text));
    }

    fn open_element(&mut self, token: Token, self_closing: bool) -> Result<()> {
        let Token {
            name,
            attributes,
            raw_text,
            ..
        } = token;
        let name = name.unwrap_or_default();
        let Some(descriptor) = self.resolve(&name)? else {
            log::debug!(target: LOG_TARGET, "unknown tag {name:?}, kept as text");
            self.literal(raw_text);
            return Ok(());
        };
        let flags = descriptor.flags();

        if flags.close_inlines {
            self.close_inlines();
        }
        if flags.same_tag_closes {
            if let Some(index) = self.find_same_tag(&name) {
                log::trace!(target: LOG_TARGET, "[{name}] closes the previous [{name}]");
                self.close_down_to(index);
            }
        }

        let parent = self.insertion_parent();
        let node = self.tree.append_element(
            parent,
            &name,
            descriptor,
            attributes.unwrap_or_default(),
        );

        if self_closing || flags.standalone {
            self.swallow_newline = flags.swallow_trailing_newline;
        } else {
            self.stack.push(Frame { node, name, flags });
        }
        Ok(())
    }

    fn close_tag(&mut self, token: Token) {
        let found = self
            .stack
            .iter()
            .rposition(|frame| frame.name == token.name());
        match found {
            Some(index) => {
                let swallow = self.stack[index].flags.swallow_trailing_newline;
                self.close_down_to(index);
                self.swallow_newline = swallow;
            }
            None => {
                log::debug!(
                    target: LOG_TARGET,
                    "close tag {:?} matches no open tag, kept as text",
                    token.raw_text
                );
                self.literal(token.raw_text);
            }
        }
    }

    fn push_verbatim(&mut self, token: Token) {
        let Some(top) = self.stack.last() else {
            return;
        };
        if token.kind == TokenKind::CloseTag && token.name() == top.name {
            self.close_tag(token);
        } else {
            let node = top.node;
            self.tree.append_text(node, &token.raw_text);
        }
    }

    /// Index of the nearest open frame named `name`, looking through inline
    /// frames only.
    fn find_same_tag(&self, name: &str) -> Option<usize> {
        for (index, frame) in self.stack.iter().enumerate().rev() {
            if frame.name == name {
                return Some(index);
            }
            if !frame.flags.inline {
                return None;
            }
        }
        None
    }

    fn close_inlines(&mut self) {
        while self.stack.last().is_some_and(|frame| frame.flags.inline) {
            self.close_top();
        }
    }

    /// Closes the frames a newline terminates. Returns whether one of them
    /// swallows that newline.
    fn close_on_newline(&mut self) -> bool {
        let Some(index) = self
            .stack
            .iter()
            .position(|frame| frame.flags.newline_closes)
        else {
            return false;
        };
        let swallows = self.stack[index..]
            .iter()
            .any(|frame| frame.flags.newline_closes && frame.flags.swallow_trailing_newline);
        self.close_down_to(index);
        swallows
    }

    fn close_down_to(&mut self, index: usize) {
        while self.stack.len() > index {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        if let Some(frame) = self.stack.pop() {
            if frame.flags.make_paragraphs_here {
                self.tree.make_paragraphs(frame.node);
            }
        }
    }
}

/// Assembles a tree from a token stream.
///
/// # Errors
///
/// Returns [`Error::ContractViolation`](crate::Error::ContractViolation) when a
/// resolved descriptor has contradictory flags.
pub fn build<I>(tokens: I, lookup: &dyn DescriptorLookup, options: &ParseOptions) -> Result<Tree>
where
    I: IntoIterator<Item = Token>,
{
    let mut builder = TreeBuilder::new(lookup, options);
    for token in tokens {
        builder.push(token)?;
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tokenize, Error, NodeRef, TagRegistry};

    fn tree(text: &str) -> Tree {
        let registry = TagRegistry::with_defaults();
        build(tokenize(text).unwrap(), &registry, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_open_tags_tracking() {
        let registry = TagRegistry::with_defaults();
        let mut builder = TreeBuilder::new(&registry, &ParseOptions::default());
        for token in tokenize("[quote][b]x").unwrap() {
            builder.push(token).unwrap();
        }
        assert_eq!(builder.open_tags().collect::<Vec<_>>(), vec!["quote", "b"]);
        let tree = builder.finish();
        assert_eq!(tree.to_html(), "<blockquote>\n<p><strong>x</strong></p>\n</blockquote>\n");
    }

    #[test]
    fn test_close_inlines_before_block() {
        let tree = tree("[b]x[hr]y");
        let root = tree.root();
        let children = tree.children(root);
        assert_eq!(children.len(), 3);
        assert_eq!(tree.node(children[0]).name(), Some("b"));
        assert_eq!(tree.node(children[1]).name(), Some("hr"));
        assert_eq!(tree.node(children[2]).text(), Some("y"));
    }

    #[test]
    fn test_same_tag_search_stops_at_block() {
        let tree = tree("[*]a[list][*]b[/list]");
        let root = tree.root();
        let outer = tree.children(root)[0];
        assert_eq!(tree.node(outer).name(), Some("*"));
        let list = tree.children(outer)[1];
        assert_eq!(tree.node(list).name(), Some("list"));
        assert_eq!(tree.children(list).len(), 1);
    }

    #[test]
    fn test_verbatim_body() {
        let tree = tree("[code][b]x[/b]\n[/code]\nafter");
        let root = tree.root();
        let children = tree.children(root);
        assert_eq!(children.len(), 2);
        let code = children[0];
        assert_eq!(tree.children(code).len(), 1);
        assert_eq!(tree.node(tree.children(code)[0]).text(), Some("[b]x[/b]\n"));
        assert_eq!(tree.node(children[1]).text(), Some("after"));
    }

    #[test]
    fn test_swallow_only_one_newline() {
        let tree = tree("[hr]\n\nx");
        let kinds: Vec<_> = tree
            .children(tree.root())
            .iter()
            .map(|&id| format!("{:?}", tree.node(id).kind))
            .collect();
        assert_eq!(kinds, vec!["Element(\"hr\")", "Newline", "Text(\"x\")"]);
    }

    #[test]
    fn test_heading_closed_by_newline() {
        let tree = tree("[h1][b]Title\nbody");
        assert_eq!(tree.to_html(), "<h1><strong>Title</strong></h1>\nbody");
    }

    #[derive(Debug)]
    struct Broken;

    impl TagDescriptor for Broken {
        fn flags(&self) -> TagFlags {
            TagFlags::block()
                .with_standalone(true)
                .with_make_paragraphs_here(true)
        }

        fn render_html(&self, _node: &NodeRef<'_>, children: &str) -> String {
            children.to_string()
        }

        fn render_text(&self, _node: &NodeRef<'_>, children: &str) -> String {
            children.to_string()
        }
    }

    #[test]
    fn test_contract_violation_aborts() {
        let mut registry = TagRegistry::new();
        registry.register("broken", Arc::new(Broken)).unwrap();
        let result = build(
            tokenize("ok [broken] more").unwrap(),
            &registry,
            &ParseOptions::default(),
        );
        assert!(matches!(result, Err(Error::ContractViolation { .. })));
    }
}
