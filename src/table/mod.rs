//! Parse tables.
//!
//! The table is generated once per language from the flattened grammar and
//! is immutable afterwards. Actions are stored densely per
//! (state, terminal) and gotos per (state, nonterminal).

mod build;
mod set;
mod symbol;


pub(crate) use build::build_table;
pub use symbol::{SymbolId, SymbolInfo, SymbolTable};

use crate::grammar::Assoc;

pub type StateId = u32;
pub type ProductionId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Error,
    Shift(StateId),
    Reduce(ProductionId),
    Accept,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub lhs: SymbolId,
    pub rhs: Vec<SymbolId>,
    pub precedence: i32,
    pub associativity: Assoc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce { production: ProductionId },
    ReduceReduce { productions: Vec<ProductionId> },
}

/// A table cell with more than one candidate action, and how it was settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub state: StateId,
    pub lookahead: SymbolId,
    pub kind: ConflictKind,
    pub resolution: Action,
}

#[derive(Debug, Clone)]
pub struct ParseTable {
    symbols: SymbolTable,
    productions: Vec<Production>,
    actions: Vec<Action>,
    gotos: Vec<Option<StateId>>,
    state_count: usize,
    conflicts: Vec<Conflict>,
}

impl ParseTable {
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, id: ProductionId) -> Option<&Production> {
        self.productions.get(id as usize)
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Action for a terminal lookahead. Nonterminals and out-of-range ids
    /// have no action.
    pub fn action(&self, state: StateId, symbol: SymbolId) -> Action {
        let terminals = self.symbols.terminal_count();
        if symbol.index() >= terminals {
            return Action::Error;
        }
        self.actions
            .get(state as usize * terminals + symbol.index())
            .copied()
            .unwrap_or(Action::Error)
    }

    pub fn has_action(&self, state: StateId, symbol: SymbolId) -> bool {
        self.action(state, symbol) != Action::Error
    }

    pub fn goto(&self, state: StateId, symbol: SymbolId) -> Option<StateId> {
        if self.symbols.is_terminal(symbol) || symbol.index() >= self.symbols.len() {
            return None;
        }
        let nonterminals = self.symbols.nonterminal_count();
        self.gotos
            .get(state as usize * nonterminals + self.symbols.nonterminal_index(symbol))
            .copied()
            .flatten()
    }

    /// Terminals with an action in `state`, in symbol order
    pub fn expected(&self, state: StateId) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.symbols.terminal_count())
            .map(|index| SymbolId(index as u16))
            .filter(move |&symbol| self.has_action(state, symbol))
    }
}
