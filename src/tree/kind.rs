//! Rowan glue: symbols are the syntax kinds.

use rowan::{GreenNode, GreenNodeData, GreenToken, GreenTokenData, NodeOrToken};

use crate::table::SymbolId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TreeLanguage {}

impl rowan::Language for TreeLanguage {
    type Kind = SymbolId;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SymbolId(raw.0)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind.0)
    }
}

impl From<SymbolId> for rowan::SyntaxKind {
    fn from(symbol: SymbolId) -> Self {
        rowan::SyntaxKind(symbol.0)
    }
}

pub type SyntaxNode = rowan::SyntaxNode<TreeLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<TreeLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<TreeLanguage>;

pub(crate) type GreenElement = NodeOrToken<GreenNode, GreenToken>;

/// Identity of a shared green node: the address of its allocation
pub(crate) fn node_key(node: &GreenNodeData) -> usize {
    node as *const GreenNodeData as usize
}

pub(crate) fn token_key(token: &GreenTokenData) -> usize {
    token as *const GreenTokenData as usize
}

pub(crate) fn to_owned(element: NodeOrToken<&GreenNodeData, &GreenTokenData>) -> GreenElement {
    match element {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.to_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.to_owned()),
    }
}

pub(crate) fn element_kind(element: &GreenElement) -> SymbolId {
    let raw = match element {
        NodeOrToken::Node(node) => node.kind(),
        NodeOrToken::Token(token) => token.kind(),
    };
    SymbolId(raw.0)
}
