//! Incremental reparsing.
//!
//! Two layers of reuse:
//!
//! 1. Tokens. Old tokens that end far enough before the edit keep their
//!    green tokens; scanning restarts at the first token the edit could
//!    influence and stops as soon as a new token lines up with an old
//!    token boundary past the edit. Everything after that point is carried
//!    over, shifted by the edit's delta.
//! 2. Subtrees. When the parser is about to shift a token that starts an
//!    old node lying entirely in an unchanged region, the whole node is
//!    pushed instead, provided the parser is in the same state the old
//!    parse was in, the token classifies the same, and the token following
//!    the node is unchanged as well and was the lookahead the node was
//!    reduced on. LR parsing is deterministic, so the result is identical
//!    to a parse from scratch.

use rowan::{NodeOrToken, TextSize, TokenAtOffset};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::driver::{Lookahead, ParseRun, WorkToken};
use super::stack::Entry;
use super::stats::ParseStats;
use crate::base::InputEdit;
use crate::language::Language;
use crate::lexer::Lexer;
use crate::table::{StateId, SymbolId};
use crate::tree::kind::{SyntaxNode, node_key};
use crate::tree::{EditedTree, Tree};

/// How the new token buffer lines up with the old tree's tokens
pub(super) struct ReuseCursor<'a> {
    old: &'a Tree,
    root: SyntaxNode,
    edit: InputEdit,
    /// New tokens `..prefix_len` are old tokens `..prefix_len`
    prefix_len: usize,
    /// New tokens from `suffix_new` are old tokens from `suffix_old`
    suffix_old: usize,
    suffix_new: usize,
}

pub(super) struct Relexed<'a> {
    pub tokens: Vec<WorkToken>,
    pub cursor: ReuseCursor<'a>,
    pub stats: ParseStats,
}

/// Build the token buffer for `text` from the old tree and the edit.
/// `None` means cancelled.
pub(super) fn relex<'a>(
    language: &Language,
    edited: &'a EditedTree,
    text: &str,
    cancel: Option<&CancellationToken>,
) -> Option<Relexed<'a>> {
    let old = edited.old_tree();
    let edit = *edited.input_edit();
    let old_tokens = old.tokens();
    let lookahead = language.max_lookahead();

    let prefix_len = old_tokens.partition_point(|token| token.end() + lookahead <= edit.start_byte);
    let restart = old_tokens.get(prefix_len).map_or_else(
        || old_tokens.last().map_or(0, |token| token.end()),
        |token| token.start,
    );

    let mut tokens: Vec<WorkToken> = old_tokens[..prefix_len]
        .iter()
        .map(|record| WorkToken::carried(record, 0))
        .collect();
    let mut stats = ParseStats {
        carried_tokens: prefix_len,
        ..ParseStats::default()
    };

    let mut suffix = None;
    for token in Lexer::new(language, text, restart) {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return None;
        }
        // Past the edit, a token starting where an old token started (in
        // old coordinates) means the rest of the old tokens still hold.
        let resync = (token.start >= edit.new_end_byte)
            .then(|| token.start - edit.new_end_byte + edit.old_end_byte)
            .and_then(|old_start| {
                old_tokens
                    .binary_search_by_key(&old_start, |record| record.start)
                    .ok()
            })
            .filter(|&index| index >= prefix_len);
        if let Some(index) = resync {
            suffix = Some((index, tokens.len()));
            break;
        }
        tokens.push(WorkToken::scanned(token));
        stats.lexed_tokens += 1;
    }

    let (suffix_old, suffix_new) = match suffix {
        Some((suffix_old, suffix_new)) => {
            let delta = edit.delta();
            tokens.extend(
                old_tokens[suffix_old..]
                    .iter()
                    .map(|record| WorkToken::carried(record, delta)),
            );
            stats.carried_tokens += old_tokens.len() - suffix_old;
            (suffix_old, suffix_new)
        }
        // No resynchronization: the suffix is empty.
        None => (old_tokens.len(), tokens.len()),
    };

    debug!(
        relexed = stats.lexed_tokens,
        carried = stats.carried_tokens,
        restart,
        "relexed edited region"
    );

    Some(Relexed {
        tokens,
        cursor: ReuseCursor {
            old,
            root: SyntaxNode::new_root(old.green().clone()),
            edit,
            prefix_len,
            suffix_old,
            suffix_new,
        },
        stats,
    })
}

impl ReuseCursor<'_> {
    /// Old token index for a carried new token
    fn old_index(&self, new_index: usize) -> Option<usize> {
        if new_index < self.prefix_len {
            Some(new_index)
        } else if new_index >= self.suffix_new {
            Some(new_index - self.suffix_new + self.suffix_old)
        } else {
            None
        }
    }

    fn new_index(&self, old_index: usize) -> usize {
        if old_index < self.prefix_len {
            old_index
        } else {
            old_index - self.suffix_old + self.suffix_new
        }
    }

    /// Old nodes whose first token is `old_index`, outermost first
    fn nodes_starting_at(&self, old_index: usize) -> Vec<SyntaxNode> {
        let Ok(offset) = TextSize::try_from(self.old.tokens()[old_index].start) else {
            return Vec::new();
        };
        let token = match self.root.token_at_offset(offset) {
            TokenAtOffset::None => return Vec::new(),
            TokenAtOffset::Single(token) => token,
            TokenAtOffset::Between(_, right) => right,
        };
        let mut nodes: Vec<SyntaxNode> = token
            .parent_ancestors()
            .take_while(|node| node.text_range().start() == offset && node.parent().is_some())
            .collect();
        nodes.reverse();
        nodes
    }
}

impl ParseRun<'_> {
    /// Try to push an old subtree in place of shifting `lookahead` from `state`.
    pub(super) fn try_reuse(&mut self, state: StateId, lookahead: Lookahead) -> bool {
        let Some(cursor) = self.reuse.as_ref() else {
            return false;
        };
        if lookahead.index >= self.tokens.len() {
            return false;
        }
        let Some(old_index) = cursor.old_index(lookahead.index) else {
            return false;
        };
        let old = cursor.old;
        let old_tokens = old.tokens();
        if old_tokens[old_index].symbol != lookahead.symbol {
            return false;
        }
        let in_prefix = lookahead.index < cursor.prefix_len;

        let mut chosen = None;
        for node in cursor.nodes_starting_at(old_index) {
            let green = node.green().into_owned();
            let Some(info) = old.node_info(node_key(&green)) else {
                continue;
            };
            if info.has_error || info.state != state {
                continue;
            }
            let Some(follow_symbol) = info.follow else {
                continue;
            };
            let range = node.text_range();
            let (start, end) = (
                u32::from(range.start()) as usize,
                u32::from(range.end()) as usize,
            );
            if start == end || !cursor.edit.is_clear_of(start..end) {
                continue;
            }
            let Some(next) = self.table().goto(state, SymbolId(green.kind().0)) else {
                continue;
            };

            let end_index = old_tokens.partition_point(|token| token.start < end);
            let follow = (end_index..old_tokens.len())
                .find(|&index| !self.language.is_extra(old_tokens[index].raw))
                .unwrap_or(old_tokens.len());
            if in_prefix && follow >= cursor.prefix_len {
                continue;
            }

            let pending =
                (follow < old_tokens.len()).then(|| (cursor.new_index(follow), follow_symbol));
            chosen = Some((green, next, end_index - old_index, pending));
            break;
        }

        let Some((green, next, count, pending)) = chosen else {
            return false;
        };

        trace!(
            kind = ?green.kind(),
            tokens = count,
            at = lookahead.index,
            "reusing subtree"
        );
        self.copy_node_info(old, &green);
        self.stats.reused_nodes += 1;
        self.stats.reused_tokens += count;
        self.stack.push(Entry::element(next, NodeOrToken::Node(green)));
        self.pos = lookahead.index + count;
        self.lookahead = None;
        self.pending_lookahead = pending;
        true
    }

    /// Carry the old records of every visible node inside `green`
    fn copy_node_info(&mut self, old: &Tree, green: &rowan::GreenNodeData) {
        let mut pending = vec![green];
        while let Some(node) = pending.pop() {
            let key = node_key(node);
            if let Some(info) = old.node_info(key) {
                self.nodes.insert(key, info);
            }
            pending.extend(node.children().filter_map(NodeOrToken::into_node));
        }
    }
}
