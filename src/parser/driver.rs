//! The LR driver.
//!
//! One [`ParseRun`] exists per parse call and owns all mutable state: the
//! token buffer, the stack, and the node records for the tree being built.

use rowan::{GreenNode, GreenToken, NodeOrToken};
use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use super::options::ParserOptions;
use super::reuse::ReuseCursor;
use super::stack::{Entry, Slot};
use super::stats::ParseStats;
use crate::base::LineIndex;
use crate::language::Language;
use crate::lexer::{Lexer, Token};
use crate::table::{Action, ParseTable, ProductionId, StateId, SymbolId};
use crate::tree::kind::{GreenElement, node_key, to_owned};
use crate::tree::{NodeInfo, TokenRecord, Tree, TreeData};

/// A token of the text being parsed
#[derive(Debug, Clone)]
pub(super) struct WorkToken {
    pub raw: SymbolId,
    pub symbol: SymbolId,
    pub start: usize,
    pub len: usize,
    /// Green token shared with the old tree, or built once shifted
    pub green: Option<GreenToken>,
}

impl WorkToken {
    pub fn scanned(token: Token) -> Self {
        Self {
            raw: token.symbol,
            symbol: token.symbol,
            start: token.start,
            len: token.len,
            green: None,
        }
    }

    /// A token of the old tree moved by `shift` bytes
    pub fn carried(record: &TokenRecord, shift: isize) -> Self {
        Self {
            raw: record.raw,
            symbol: record.symbol,
            start: (record.start as isize + shift) as usize,
            len: record.len,
            green: Some(record.green.clone()),
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    fn into_record(self, text: &str) -> TokenRecord {
        let green = match self.green {
            Some(green) if green.kind() == rowan::SyntaxKind::from(self.symbol) => green,
            _ => GreenToken::new(self.symbol.into(), &text[self.start..self.end()]),
        };
        TokenRecord {
            symbol: self.symbol,
            raw: self.raw,
            start: self.start,
            len: self.len,
            green,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Lookahead {
    pub symbol: SymbolId,
    /// Token index; equal to the token count at end of input
    pub index: usize,
}

/// Scan the whole text, checking for cancellation between tokens
pub(super) fn lex_all(
    language: &Language,
    text: &str,
    cancel: Option<&CancellationToken>,
) -> Option<Vec<WorkToken>> {
    let mut tokens = Vec::new();
    for token in Lexer::new(language, text, 0) {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return None;
        }
        tokens.push(WorkToken::scanned(token));
    }
    Some(tokens)
}

pub(super) struct ParseRun<'a> {
    pub language: &'a Language,
    pub text: &'a str,
    pub tokens: Vec<WorkToken>,
    pub stack: Vec<Entry>,
    pub pos: usize,
    pub lookahead: Option<Lookahead>,
    /// Symbol fixed for an upcoming token by a reused subtree
    pub pending_lookahead: Option<(usize, SymbolId)>,
    pub reuse: Option<ReuseCursor<'a>>,
    pub nodes: FxHashMap<usize, NodeInfo>,
    pub options: &'a ParserOptions,
    pub cancel: Option<&'a CancellationToken>,
    pub stats: ParseStats,
    /// Token index of the last recovery, to force progress on a repeat
    pub last_recovery: Option<usize>,
}

impl<'a> ParseRun<'a> {
    pub fn new(
        language: &'a Language,
        text: &'a str,
        tokens: Vec<WorkToken>,
        reuse: Option<ReuseCursor<'a>>,
        options: &'a ParserOptions,
        cancel: Option<&'a CancellationToken>,
        stats: ParseStats,
    ) -> Self {
        Self {
            language,
            text,
            tokens,
            stack: Vec::new(),
            pos: 0,
            lookahead: None,
            pending_lookahead: None,
            reuse,
            nodes: FxHashMap::default(),
            options,
            cancel,
            stats,
            last_recovery: None,
        }
    }

    pub fn table(&self) -> &'a ParseTable {
        self.language.table()
    }

    pub fn top_state(&self) -> StateId {
        self.stack.last().map_or(0, |entry| entry.state)
    }

    /// State exposed once the top `stack.len() - kept` entries are popped
    pub fn state_below(&self, kept: usize) -> StateId {
        match kept {
            0 => 0,
            n => self.stack[n - 1].state,
        }
    }

    /// Drive the automaton to completion. `None` means cancelled.
    pub fn run(mut self) -> Option<Tree> {
        loop {
            let lookahead = match self.lookahead {
                Some(lookahead) => lookahead,
                None => {
                    if self.cancel.is_some_and(CancellationToken::is_cancelled) {
                        trace!(position = self.pos, "parse cancelled");
                        return None;
                    }
                    self.shift_extras();
                    let lookahead = self.next_lookahead();
                    self.lookahead = Some(lookahead);
                    lookahead
                }
            };

            let state = self.top_state();
            match self.table().action(state, lookahead.symbol) {
                Action::Shift(next) => {
                    if !self.try_reuse(state, lookahead) {
                        self.shift(next, lookahead);
                    }
                }
                Action::Reduce(production) => self.reduce(production),
                Action::Accept => return Some(self.accept()),
                Action::Error => {
                    if !self.recover(lookahead) {
                        return Some(self.finish_unparsed());
                    }
                }
            }
        }
    }

    pub fn is_extra_token(&self, index: usize) -> bool {
        self.language.is_extra(self.tokens[index].raw)
    }

    /// Classify token `index` as if it were lexed with `state` on top
    pub fn resolve(&self, index: usize, state: StateId) -> SymbolId {
        let token = &self.tokens[index];
        self.language
            .resolve(state, token.raw, &self.text[token.start..token.end()])
    }

    /// Green token for `index` as `symbol`, shared with the old tree when
    /// it already has that kind
    pub fn green_token(&mut self, index: usize, symbol: SymbolId) -> GreenToken {
        let text = self.text;
        let token = &mut self.tokens[index];
        token.symbol = symbol;
        let kind = rowan::SyntaxKind::from(symbol);
        if let Some(green) = token.green.as_ref().filter(|green| green.kind() == kind) {
            self.stats.reused_tokens += 1;
            return green.clone();
        }
        let green = GreenToken::new(symbol.into(), &text[token.start..token.end()]);
        token.green = Some(green.clone());
        green
    }

    fn shift_extras(&mut self) {
        while self.pos < self.tokens.len() && self.is_extra_token(self.pos) {
            let raw = self.tokens[self.pos].raw;
            let green = self.green_token(self.pos, raw);
            let state = self.top_state();
            self.stack.push(Entry::extra(state, NodeOrToken::Token(green)));
            self.pos += 1;
        }
    }

    fn next_lookahead(&mut self) -> Lookahead {
        let index = self.pos;
        if index >= self.tokens.len() {
            return Lookahead {
                symbol: SymbolId::END,
                index: self.tokens.len(),
            };
        }
        let symbol = match self.pending_lookahead.take() {
            Some((pending, symbol)) if pending == index => symbol,
            _ => self.resolve(index, self.top_state()),
        };
        self.tokens[index].symbol = symbol;
        Lookahead { symbol, index }
    }

    fn shift(&mut self, next: StateId, lookahead: Lookahead) {
        let green = self.green_token(lookahead.index, lookahead.symbol);
        self.stack
            .push(Entry::element(next, NodeOrToken::Token(green)));
        self.pos = lookahead.index + 1;
        self.lookahead = None;
    }

    fn reduce(&mut self, production: ProductionId) {
        let Some(production) = self.table().production(production) else {
            warn!(production, "reduce by unknown production");
            return;
        };

        // Pop until the production's children are off the stack; extras in
        // between belong to the new node, extras above its last child stay
        // outside it.
        let mut first = self.stack.len();
        let mut counted = 0;
        while counted < production.rhs.len() && first > 0 {
            first -= 1;
            if !self.stack[first].extra {
                counted += 1;
            }
        }
        let mut popped = self.stack.split_off(first);
        let last_child = popped.iter().rposition(|entry| !entry.extra).map_or(0, |i| i + 1);
        let trailing = popped.split_off(last_child);

        // The state under the first child is the state its first token was
        // shifted from.
        let pre_state = self.top_state();
        let has_error = popped.iter().any(|entry| entry.has_error);
        let follow = if trailing.iter().any(|entry| entry.has_error) {
            None
        } else {
            self.lookahead.map(|lookahead| lookahead.symbol)
        };
        let mut popped = popped.into_iter();
        let mut children = popped.next().map(Entry::into_elements).unwrap_or_default();
        for entry in popped {
            entry.append_to(&mut children);
        }

        let lhs = production.lhs;
        let slot = if self.language.is_visible(lhs) {
            let node = GreenNode::new(lhs.into(), children);
            self.nodes.insert(
                node_key(&node),
                NodeInfo {
                    state: pre_state,
                    has_error,
                    follow,
                },
            );
            Slot::One(NodeOrToken::Node(node))
        } else {
            Slot::Many(children)
        };

        let next = self.table().goto(pre_state, lhs).unwrap_or_else(|| {
            warn!(state = pre_state, ?lhs, "missing goto");
            pre_state
        });
        self.stack.push(Entry {
            state: next,
            slot,
            extra: false,
            has_error,
        });
        for mut entry in trailing {
            entry.state = next;
            self.stack.push(entry);
        }
    }

    fn accept(mut self) -> Tree {
        let start = self.language.start_symbol();
        let mut children = Vec::new();
        for entry in std::mem::take(&mut self.stack) {
            let is_start = !entry.extra
                && entry
                    .as_node()
                    .is_some_and(|node| node.kind() == rowan::SyntaxKind::from(start));
            if is_start {
                if let Some(node) = entry.as_node() {
                    self.nodes.remove(&node_key(node));
                    children.extend(node.children().map(to_owned));
                }
            } else {
                entry.append_to(&mut children);
            }
        }
        let root = GreenNode::new(start.into(), children);
        self.into_tree(root)
    }

    /// End of input with no state able to continue: everything parsed so
    /// far goes under the root as is.
    pub fn finish_unparsed(mut self) -> Tree {
        let mut children = Vec::new();
        for entry in std::mem::take(&mut self.stack) {
            entry.append_to(&mut children);
        }
        let root = GreenNode::new(self.language.start_symbol().into(), children);
        self.into_tree(root)
    }

    fn into_tree(self, root: GreenNode) -> Tree {
        let text = self.text;
        let tokens: Vec<TokenRecord> = self
            .tokens
            .into_iter()
            .map(|token| token.into_record(text))
            .collect();
        Tree::from_data(TreeData {
            language: self.language.clone(),
            green: root,
            tokens,
            nodes: self.nodes,
            line_index: LineIndex::new(text),
            stats: self.stats,
        })
    }

    pub fn push_extra(&mut self, state: StateId, element: GreenElement) {
        self.stack.push(Entry::extra(state, element));
    }
}
