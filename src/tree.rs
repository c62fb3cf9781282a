//! Arena-backed document tree.
//!
//! Nodes live in a single `Vec` owned by the [`Tree`]. A parent owns its
//! children through an ordered list of [`NodeId`]s; the `parent` link of a
//! child is a plain index used for navigation only.
//!
//! Descriptors receive a borrowed [`NodeRef`] when rendering, which gives read
//! access to the node's name, attributes, parent and children.

use crate::descriptor::TagDescriptor;
use crate::render::{render, Target};
use crate::Attributes;
use std::fmt;
use std::sync::Arc;

/// Stable index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone)]
pub enum NodeKind {
    /// The document root.
    Root,
    /// A registered tag.
    Element {
        name: String,
        descriptor: Arc<dyn TagDescriptor>,
    },
    /// A paragraph synthesized by segmentation.
    Paragraph,
    Text(String),
    Newline,
    /// Source of an unknown or unmatched tag, kept as text.
    Literal(String),
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Root => f.write_str("Root"),
            NodeKind::Element { name, .. } => f.debug_tuple("Element").field(name).finish(),
            NodeKind::Paragraph => f.write_str("Paragraph"),
            NodeKind::Text(text) => f.debug_tuple("Text").field(text).finish(),
            NodeKind::Newline => f.write_str("Newline"),
            NodeKind::Literal(raw) => f.debug_tuple("Literal").field(raw).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub attributes: Attributes,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Node {
            kind,
            attributes: Attributes::new(),
            children: Vec::new(),
            parent,
        }
    }

    /// Tag name for elements, `None` for every other kind.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Descriptor for elements, `None` for every other kind.
    #[must_use]
    pub fn descriptor(&self) -> Option<&dyn TagDescriptor> {
        match &self.kind {
            NodeKind::Element { descriptor, .. } => Some(descriptor.as_ref()),
            _ => None,
        }
    }

    /// Text carried by text, newline and literal nodes.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) | NodeKind::Literal(text) => Some(text),
            NodeKind::Newline => Some("\n"),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_newline(&self) -> bool {
        matches!(self.kind, NodeKind::Newline)
    }

    /// Block-level elements and paragraphs.
    #[must_use]
    pub fn is_block(&self) -> bool {
        match &self.kind {
            NodeKind::Element { descriptor, .. } => !descriptor.flags().inline,
            NodeKind::Paragraph | NodeKind::Root => true,
            _ => false,
        }
    }
}

/// A parsed document.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        Tree {
            nodes: vec![Node::new(NodeKind::Root, None)],
        }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the node for `id`.
    ///
    /// Ids are only handed out by this tree, so they are always in bounds.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Appends a new node of `kind` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Appends a new element with its attributes.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        name: &str,
        descriptor: Arc<dyn TagDescriptor>,
        attributes: Attributes,
    ) -> NodeId {
        let id = self.append(
            parent,
            NodeKind::Element {
                name: name.to_string(),
                descriptor,
            },
        );
        self.nodes[id.0].attributes = attributes;
        id
    }

    /// Appends text, merging into the last child when it is already a text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeKind::Text(existing) = &mut self.nodes[last.0].kind {
                existing.push_str(text);
                return;
            }
        }
        self.append(parent, NodeKind::Text(text.to_string()));
    }

    /// Groups the children of `id` into paragraphs at blank lines.
    ///
    /// Two or more consecutive newline children end a paragraph; a single one
    /// stays inside it. Block-level children are never wrapped and end the
    /// current paragraph. Separator newlines are dropped from the tree.
    pub fn make_paragraphs(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        let mut regrouped = Vec::with_capacity(children.len());
        let mut current: Vec<NodeId> = Vec::new();
        let mut newlines: Vec<NodeId> = Vec::new();

        for child in children {
            let node = &self.nodes[child.0];
            if node.is_newline() {
                newlines.push(child);
            } else if node.is_block() {
                self.flush_paragraph(id, &mut current, &mut regrouped);
                newlines.clear();
                regrouped.push(child);
            } else {
                if newlines.len() >= 2 {
                    self.flush_paragraph(id, &mut current, &mut regrouped);
                } else if !current.is_empty() {
                    current.append(&mut newlines);
                }
                newlines.clear();
                current.push(child);
            }
        }
        self.flush_paragraph(id, &mut current, &mut regrouped);

        self.nodes[id.0].children = regrouped;
    }

    fn flush_paragraph(&mut self, parent: NodeId, current: &mut Vec<NodeId>, out: &mut Vec<NodeId>) {
        if current.is_empty() {
            return;
        }
        let paragraph = NodeId(self.nodes.len());
        let mut node = Node::new(NodeKind::Paragraph, Some(parent));
        for &child in current.iter() {
            self.nodes[child.0].parent = Some(paragraph);
        }
        node.children = std::mem::take(current);
        self.nodes.push(node);
        out.push(paragraph);
    }

    /// Renders the whole document as HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        render(self, self.root(), Target::Html)
    }

    /// Renders the whole document as plain text.
    #[must_use]
    pub fn to_text(&self) -> String {
        render(self, self.root(), Target::Text)
    }
}

/// Borrowed view of one node, handed to descriptors.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    #[must_use]
    pub fn node(&self) -> &'t Node {
        self.tree.node(self.id)
    }

    /// Tag name, or the empty string for non-element nodes.
    #[must_use]
    pub fn name(&self) -> &'t str {
        self.node().name().unwrap_or_default()
    }

    #[must_use]
    pub fn attributes(&self) -> &'t Attributes {
        &self.node().attributes
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.node().parent.map(|id| self.tree.get(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let tree = self.tree;
        self.node().children.iter().map(move |&id| tree.get(id))
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.node().kind)
            .finish()
    }
}
