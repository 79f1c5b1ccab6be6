//! The node inspection API

use std::fmt;
use std::ops::Range;

use rowan::{NodeOrToken, TextRange, TextSize};

use super::Tree;
use super::kind::{SyntaxElement, node_key, token_key};
use crate::base::Point;
use crate::table::SymbolId;

/// A node or token positioned inside a [`Tree`].
///
/// Nodes are cheap handles; the tree they belong to stays alive while any
/// node refers to it.
#[derive(Clone)]
pub struct Node {
    element: SyntaxElement,
    tree: Tree,
}

impl Node {
    pub(crate) fn new(element: SyntaxElement, tree: Tree) -> Self {
        Self { element, tree }
    }

    fn wrap(&self, element: SyntaxElement) -> Node {
        Node::new(element, self.tree.clone())
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn symbol(&self) -> SymbolId {
        self.element.kind()
    }

    /// Symbol name: a rule name, token name, or literal text
    pub fn kind(&self) -> &str {
        self.tree.language().symbol_name(self.symbol()).unwrap_or("")
    }

    pub fn is_named(&self) -> bool {
        self.tree.language().is_named(self.symbol())
    }

    pub fn is_extra(&self) -> bool {
        self.tree.language().is_extra(self.symbol())
    }

    pub fn is_error(&self) -> bool {
        self.symbol() == SymbolId::ERROR
    }

    pub fn is_token(&self) -> bool {
        self.element.as_token().is_some()
    }

    /// True when this node is or contains an ERROR
    pub fn has_error(&self) -> bool {
        match &self.element {
            NodeOrToken::Token(token) => token.kind() == SymbolId::ERROR,
            NodeOrToken::Node(node) => node
                .descendants_with_tokens()
                .any(|element| element.kind() == SymbolId::ERROR),
        }
    }

    pub fn text_range(&self) -> TextRange {
        self.element.text_range()
    }

    pub fn start_byte(&self) -> usize {
        u32::from(self.text_range().start()) as usize
    }

    pub fn end_byte(&self) -> usize {
        u32::from(self.text_range().end()) as usize
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.start_byte()..self.end_byte()
    }

    pub fn start_position(&self) -> Point {
        self.tree.line_index().point(self.start_byte())
    }

    pub fn end_position(&self) -> Point {
        self.tree.line_index().point(self.end_byte())
    }

    pub fn text(&self) -> String {
        match &self.element {
            NodeOrToken::Node(node) => node.text().to_string(),
            NodeOrToken::Token(token) => token.text().to_owned(),
        }
    }

    pub fn child_count(&self) -> usize {
        self.element
            .as_node()
            .map_or(0, |node| node.children_with_tokens().count())
    }

    pub fn children(&self) -> impl Iterator<Item = Node> + '_ {
        self.element
            .as_node()
            .into_iter()
            .flat_map(|node| node.children_with_tokens())
            .map(|element| self.wrap(element))
    }

    pub fn child(&self, index: usize) -> Option<Node> {
        self.children().nth(index)
    }

    pub fn named_children(&self) -> impl Iterator<Item = Node> + '_ {
        self.children().filter(Node::is_named)
    }

    pub fn named_child(&self, index: usize) -> Option<Node> {
        self.named_children().nth(index)
    }

    pub fn named_child_count(&self) -> usize {
        self.named_children().count()
    }

    pub fn parent(&self) -> Option<Node> {
        self.element
            .parent()
            .map(|parent| self.wrap(NodeOrToken::Node(parent)))
    }

    pub fn next_sibling(&self) -> Option<Node> {
        self.element
            .next_sibling_or_token()
            .map(|element| self.wrap(element))
    }

    pub fn prev_sibling(&self) -> Option<Node> {
        self.element
            .prev_sibling_or_token()
            .map(|element| self.wrap(element))
    }

    /// Smallest node or token covering `start..end`
    pub fn descendant_for_byte_range(&self, start: usize, end: usize) -> Option<Node> {
        let node = self.element.as_node()?;
        let range = TextRange::new(
            TextSize::try_from(start.min(end)).ok()?,
            TextSize::try_from(start.max(end)).ok()?,
        );
        if !node.text_range().contains_range(range) {
            return None;
        }
        Some(self.wrap(node.covering_element(range)))
    }

    /// Stable identity of the underlying shared subtree.
    ///
    /// Reused subtrees keep their id across reparses.
    pub fn id(&self) -> usize {
        match &self.element {
            NodeOrToken::Node(node) => node_key(&node.green()),
            NodeOrToken::Token(token) => token_key(token.green()),
        }
    }

    /// S-expression over named nodes, e.g. `(source_file (identifier))`
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        out.push('(');
        out.push_str(self.kind());
        for child in self.named_children() {
            out.push(' ');
            child.write_sexp(out);
        }
        out.push(')');
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}", self.kind(), self.byte_range())
    }
}
