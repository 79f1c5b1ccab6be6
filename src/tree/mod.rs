//! Immutable syntax trees.
//!
//! A [`Tree`] owns a rowan green tree plus the per-token and per-node
//! records that incremental reparsing consults. Subtrees are shared by
//! reference between successive versions of a document, so structurally
//! unchanged regions cost nothing to keep.

mod edit;
pub mod kind;
mod node;


use std::fmt;
use std::sync::Arc;

use rowan::{GreenNode, GreenToken, NodeOrToken};
use rustc_hash::FxHashMap;

pub use edit::{EditedTree, ReusableNode};
pub use kind::{SyntaxElement, SyntaxNode, SyntaxToken, TreeLanguage};
pub use node::Node;

use crate::base::{InputEdit, LineIndex};
use crate::language::Language;
use crate::parser::ParseStats;
use crate::table::{StateId, SymbolId};

/// One lexed token of the parsed text
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TokenRecord {
    /// Symbol after keyword resolution
    pub symbol: SymbolId,
    /// Symbol as scanned
    pub raw: SymbolId,
    pub start: usize,
    pub len: usize,
    pub green: GreenToken,
}

impl TokenRecord {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Recorded facts about a visible node, keyed by green node identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeInfo {
    /// Parser state on top of the stack when the node's first token was shifted
    pub state: StateId,
    pub has_error: bool,
    /// Lookahead the node was reduced on. `None` when a recovery sat
    /// between the node and that lookahead, so the decision rests on
    /// tokens past the next one.
    pub follow: Option<SymbolId>,
}

#[derive(Clone)]
pub struct Tree {
    data: Arc<TreeData>,
}

pub(crate) struct TreeData {
    pub language: Language,
    pub green: GreenNode,
    pub tokens: Vec<TokenRecord>,
    pub nodes: FxHashMap<usize, NodeInfo>,
    pub line_index: LineIndex,
    pub stats: ParseStats,
}

impl Tree {
    pub(crate) fn from_data(data: TreeData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    pub fn language(&self) -> &Language {
        &self.data.language
    }

    pub fn root_node(&self) -> Node {
        let root = SyntaxNode::new_root(self.data.green.clone());
        Node::new(NodeOrToken::Node(root), self.clone())
    }

    /// Length of the parsed text in bytes
    pub fn len(&self) -> usize {
        u32::from(self.data.green.text_len()) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The parsed text, reassembled from the tree's tokens
    pub fn text(&self) -> String {
        self.data.tokens.iter().map(|token| token.green.text()).collect()
    }

    pub fn has_error(&self) -> bool {
        self.root_node().has_error()
    }

    /// Outermost ERROR nodes and tokens, in document order
    pub fn error_nodes(&self) -> Vec<Node> {
        let root = SyntaxNode::new_root(self.data.green.clone());
        root.descendants_with_tokens()
            .filter(|element| element.kind() == SymbolId::ERROR)
            .filter(|element| {
                !element.parent().is_some_and(|parent| {
                    parent.ancestors().any(|ancestor| ancestor.kind() == SymbolId::ERROR)
                })
            })
            .map(|element| Node::new(element, self.clone()))
            .collect()
    }

    pub fn to_sexp(&self) -> String {
        self.root_node().to_sexp()
    }

    pub fn stats(&self) -> ParseStats {
        self.data.stats
    }

    pub fn token_count(&self) -> usize {
        self.data.tokens.len()
    }

    /// Record an edit against this tree for a later reparse
    pub fn edit(&self, edit: &InputEdit) -> EditedTree {
        EditedTree::new(self.clone(), edit)
    }

    pub(crate) fn green(&self) -> &GreenNode {
        &self.data.green
    }

    pub(crate) fn tokens(&self) -> &[TokenRecord] {
        &self.data.tokens
    }

    pub(crate) fn node_info(&self, key: usize) -> Option<NodeInfo> {
        self.data.nodes.get(&key).copied()
    }

    pub(crate) fn line_index(&self) -> &LineIndex {
        &self.data.line_index
    }
}

/// Structural equality: same shape, kinds, and text
impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.data.green == other.data.green
    }
}

impl Eq for Tree {}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("language", &self.data.language.name())
            .field("len", &self.len())
            .field("sexp", &self.to_sexp())
            .finish()
    }
}
