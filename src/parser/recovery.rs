//! Error recovery.
//!
//! On a failed action the parser looks for the nearest way to continue:
//! for each of the next few tokens, and for each stack depth from the top
//! down, the first state with an action on that token wins. Everything
//! popped and skipped on the way is wrapped into a single ERROR node that
//! stays on the stack as an extra, so enclosing rules still complete.

use rowan::{GreenNode, NodeOrToken};
use tracing::debug;

use super::driver::{Lookahead, ParseRun};
use crate::table::{StateId, SymbolId};
use crate::tree::kind::GreenElement;

impl ParseRun<'_> {
    /// Returns false when nothing can be done at end of input.
    pub(super) fn recover(&mut self, lookahead: Lookahead) -> bool {
        let error_state = self.top_state();
        let at_end = lookahead.index >= self.tokens.len();
        // A second failure at the same token must consume it.
        let repeated = self.last_recovery == Some(lookahead.index);
        self.last_recovery = Some(lookahead.index);

        let candidates = self.recovery_candidates(lookahead.index);
        let skip_first = usize::from(repeated);
        for (distance, &index) in candidates.iter().enumerate().skip(skip_first) {
            for kept in (0..=self.stack.len()).rev() {
                if distance == 0 && kept == self.stack.len() {
                    continue;
                }
                let state = self.state_below(kept);
                let symbol = if index >= self.tokens.len() {
                    SymbolId::END
                } else {
                    self.resolve(index, state)
                };
                if !self.table().has_action(state, symbol) {
                    continue;
                }

                debug!(
                    error_state,
                    resume_state = state,
                    popped = self.stack.len() - kept,
                    skipped = distance,
                    "recovered from syntax error"
                );
                self.wrap_error(kept, lookahead, index, state, error_state);
                if index < self.tokens.len() {
                    self.tokens[index].symbol = symbol;
                }
                self.pos = index;
                self.pending_lookahead = None;
                self.lookahead = Some(Lookahead { symbol, index });
                self.stats.recoveries += 1;
                return true;
            }
        }

        if at_end {
            return false;
        }

        // Nothing resumes within reach: drop the lookahead alone.
        debug!(error_state, token = lookahead.index, "skipping unexpected token");
        let kept = self.stack.len();
        self.wrap_error(kept, lookahead, lookahead.index + 1, error_state, error_state);
        self.pos = lookahead.index + 1;
        self.pending_lookahead = None;
        self.lookahead = None;
        self.stats.recoveries += 1;
        true
    }

    /// The lookahead and the following non-extra tokens, ending with end of
    /// input when it is close enough
    fn recovery_candidates(&self, from: usize) -> Vec<usize> {
        let limit = self.options.max_recovery_lookahead;
        let mut candidates = Vec::new();
        let mut index = from;
        while candidates.len() <= limit {
            if index >= self.tokens.len() {
                candidates.push(self.tokens.len());
                break;
            }
            if !self.is_extra_token(index) {
                candidates.push(index);
            }
            index += 1;
        }
        candidates
    }

    /// Replace stack entries above `kept` and tokens `lookahead..resume`
    /// with one ERROR extra. Trailing trivia stays outside the error.
    fn wrap_error(
        &mut self,
        kept: usize,
        lookahead: Lookahead,
        resume: usize,
        state: StateId,
        error_state: StateId,
    ) {
        let mut items: Vec<(GreenElement, bool)> = Vec::new();
        for entry in self.stack.split_off(kept) {
            let extra = entry.extra;
            for element in entry.into_elements() {
                items.push((element, extra));
            }
        }

        let end = resume.min(self.tokens.len());
        for index in lookahead.index..end {
            let (symbol, extra) = if self.is_extra_token(index) {
                (self.tokens[index].raw, true)
            } else if index == lookahead.index {
                (lookahead.symbol, false)
            } else {
                (self.resolve(index, error_state), false)
            };
            let green = self.green_token(index, symbol);
            items.push((NodeOrToken::Token(green), extra));
        }

        // A lone unscannable token is already an ERROR element.
        let mut content = items.iter().filter(|(_, extra)| !extra);
        let lone_error = match (content.next(), content.next()) {
            (Some((NodeOrToken::Token(token), _)), None) => {
                token.kind() == rowan::SyntaxKind::from(SymbolId::ERROR)
            }
            _ => false,
        };
        if lone_error {
            for (element, _) in items {
                self.push_extra(state, element);
            }
            return;
        }

        let content = items.iter().rposition(|(_, extra)| !extra).map_or(0, |i| i + 1);
        let trailing = items.split_off(content);
        if !items.is_empty() {
            let error = GreenNode::new(
                SymbolId::ERROR.into(),
                items.into_iter().map(|(element, _)| element).collect::<Vec<_>>(),
            );
            self.push_extra(state, NodeOrToken::Node(error));
        }
        for (element, _) in trailing {
            self.push_extra(state, element);
        }
    }
}
