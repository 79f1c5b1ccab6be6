//! LALR(1) construction.
//!
//! States are LR(1) item sets merged by core: a goto target whose kernel
//! matches an existing state folds its lookaheads into that state, which
//! is revisited until no lookahead set grows.

use std::collections::{BTreeMap, VecDeque};

use rustc_hash::FxHashMap;
use tracing::debug;

use super::set::TerminalSet;
use super::{
    Action, Conflict, ConflictKind, ParseTable, Production, ProductionId, StateId, SymbolId,
    SymbolTable,
};
use crate::grammar::Assoc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Item {
    /// Index into the augmented production list; 0 is `S' := start`
    production: u32,
    dot: u32,
}

#[derive(Debug)]
struct State {
    kernel: Vec<Item>,
    lookaheads: Vec<TerminalSet>,
    transitions: Vec<(SymbolId, StateId)>,
}

struct Builder<'a> {
    symbols: &'a SymbolTable,
    productions: Vec<&'a Production>,
    augmented: Production,
    by_lhs: Vec<Vec<u32>>,
    nullable: Vec<bool>,
    first: Vec<TerminalSet>,
}

/// Highest precedence and earliest production among items shifting a terminal
#[derive(Debug, Clone, Copy)]
struct ShiftCandidate {
    target: StateId,
    precedence: i32,
    order: ProductionId,
}

pub(crate) fn build_table(
    symbols: SymbolTable,
    productions: Vec<Production>,
    start: SymbolId,
) -> ParseTable {
    let (states, conflicts, actions, gotos) = {
        let builder = Builder::new(&symbols, &productions, start);
        let states = builder.states();
        let (actions, gotos, conflicts) = builder.tables(&states);
        (states.len(), conflicts, actions, gotos)
    };

    debug!(
        states,
        productions = productions.len(),
        conflicts = conflicts.len(),
        "built parse table"
    );

    ParseTable {
        symbols,
        productions,
        actions,
        gotos,
        state_count: states,
        conflicts,
    }
}

impl<'a> Builder<'a> {
    fn new(symbols: &'a SymbolTable, productions: &'a [Production], start: SymbolId) -> Self {
        let augmented = Production {
            // One past the last symbol; never looked up in the goto table.
            lhs: SymbolId(symbols.len() as u16),
            rhs: vec![start],
            precedence: 0,
            associativity: Assoc::None,
        };
        let mut builder = Self {
            symbols,
            productions: productions.iter().collect(),
            augmented,
            by_lhs: vec![Vec::new(); symbols.len() + 1],
            nullable: vec![false; symbols.len() + 1],
            first: vec![TerminalSet::new(symbols.terminal_count()); symbols.len() + 1],
        };
        for (index, production) in productions.iter().enumerate() {
            builder.by_lhs[production.lhs.index()].push(index as u32 + 1);
        }
        builder.compute_first();
        builder
    }

    fn production(&self, index: u32) -> &Production {
        match index {
            0 => &self.augmented,
            n => self.productions[n as usize - 1],
        }
    }

    fn is_terminal(&self, symbol: SymbolId) -> bool {
        self.symbols.is_terminal(symbol)
    }

    fn compute_first(&mut self) {
        for terminal in 0..self.symbols.terminal_count() {
            self.first[terminal].insert(terminal);
        }
        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                let lhs = production.lhs.index();
                if !self.nullable[lhs] && production.rhs.iter().all(|s| self.nullable[s.index()]) {
                    self.nullable[lhs] = true;
                    changed = true;
                }
                for symbol in &production.rhs {
                    let first = self.first[symbol.index()].clone();
                    changed |= self.first[lhs].union_with(&first);
                    if !self.nullable[symbol.index()] {
                        break;
                    }
                }
            }
        }
    }

    /// FIRST(sequence · lookahead)
    fn first_of(&self, sequence: &[SymbolId], lookahead: &TerminalSet) -> TerminalSet {
        let mut out = TerminalSet::new(self.symbols.terminal_count());
        for symbol in sequence {
            out.union_with(&self.first[symbol.index()]);
            if !self.nullable[symbol.index()] {
                return out;
            }
        }
        out.union_with(lookahead);
        out
    }

    fn closure(&self, kernel: &[Item], lookaheads: &[TerminalSet]) -> Vec<(Item, TerminalSet)> {
        let mut items: Vec<(Item, TerminalSet)> = kernel
            .iter()
            .copied()
            .zip(lookaheads.iter().cloned())
            .collect();
        let mut index: FxHashMap<Item, usize> = kernel
            .iter()
            .enumerate()
            .map(|(position, &item)| (item, position))
            .collect();
        let mut pending: Vec<usize> = (0..items.len()).collect();

        while let Some(position) = pending.pop() {
            let (item, lookahead) = items[position].clone();
            let production = self.production(item.production);
            let Some(&next) = production.rhs.get(item.dot as usize) else {
                continue;
            };
            if self.is_terminal(next) {
                continue;
            }
            let follow = self.first_of(&production.rhs[item.dot as usize + 1..], &lookahead);
            for &candidate in &self.by_lhs[next.index()] {
                let new_item = Item {
                    production: candidate,
                    dot: 0,
                };
                match index.get(&new_item) {
                    Some(&existing) => {
                        if items[existing].1.union_with(&follow) {
                            pending.push(existing);
                        }
                    }
                    None => {
                        index.insert(new_item, items.len());
                        pending.push(items.len());
                        items.push((new_item, follow.clone()));
                    }
                }
            }
        }
        items
    }

    fn states(&self) -> Vec<State> {
        let mut initial = TerminalSet::new(self.symbols.terminal_count());
        initial.insert(SymbolId::END.index());

        let mut states = vec![State {
            kernel: vec![Item {
                production: 0,
                dot: 0,
            }],
            lookaheads: vec![initial],
            transitions: Vec::new(),
        }];
        let mut by_core: FxHashMap<Vec<Item>, StateId> = FxHashMap::default();
        by_core.insert(states[0].kernel.clone(), 0);
        let mut queue = VecDeque::from([0 as StateId]);
        let mut queued = vec![true];

        while let Some(state) = queue.pop_front() {
            queued[state as usize] = false;
            let items = self.closure(
                &states[state as usize].kernel,
                &states[state as usize].lookaheads,
            );

            let mut successors: BTreeMap<SymbolId, Vec<(Item, TerminalSet)>> = BTreeMap::new();
            for (item, lookahead) in items {
                let production = self.production(item.production);
                if let Some(&next) = production.rhs.get(item.dot as usize) {
                    let advanced = Item {
                        dot: item.dot + 1,
                        ..item
                    };
                    successors.entry(next).or_default().push((advanced, lookahead));
                }
            }

            let mut transitions = Vec::with_capacity(successors.len());
            for (symbol, mut kernel) in successors {
                kernel.sort_by_key(|(item, _)| *item);
                let (core, lookaheads): (Vec<Item>, Vec<TerminalSet>) = kernel.into_iter().unzip();
                let target = match by_core.get(&core) {
                    Some(&target) => {
                        let existing = &mut states[target as usize];
                        let mut grew = false;
                        for (current, incoming) in existing.lookaheads.iter_mut().zip(&lookaheads) {
                            grew |= current.union_with(incoming);
                        }
                        if grew && !queued[target as usize] {
                            queued[target as usize] = true;
                            queue.push_back(target);
                        }
                        target
                    }
                    None => {
                        let target = states.len() as StateId;
                        by_core.insert(core.clone(), target);
                        states.push(State {
                            kernel: core,
                            lookaheads,
                            transitions: Vec::new(),
                        });
                        queued.push(true);
                        queue.push_back(target);
                        target
                    }
                };
                transitions.push((symbol, target));
            }
            states[state as usize].transitions = transitions;
        }
        states
    }

    fn tables(
        &self,
        states: &[State],
    ) -> (Vec<Action>, Vec<Option<StateId>>, Vec<Conflict>) {
        let terminals = self.symbols.terminal_count();
        let nonterminals = self.symbols.nonterminal_count();
        let mut actions = vec![Action::Error; states.len() * terminals];
        let mut gotos = vec![None; states.len() * nonterminals];
        let mut conflicts = Vec::new();

        for (state_index, state) in states.iter().enumerate() {
            let state_id = state_index as StateId;
            let targets: FxHashMap<SymbolId, StateId> = state.transitions.iter().copied().collect();
            let mut shifts: BTreeMap<SymbolId, ShiftCandidate> = BTreeMap::new();
            let mut reduces: BTreeMap<SymbolId, Vec<ProductionId>> = BTreeMap::new();
            let mut accept = false;

            for (item, lookahead) in self.closure(&state.kernel, &state.lookaheads) {
                let production = self.production(item.production);
                match production.rhs.get(item.dot as usize) {
                    Some(&next) if self.is_terminal(next) => {
                        let Some(&target) = targets.get(&next) else {
                            continue;
                        };
                        let order = item.production.saturating_sub(1);
                        shifts
                            .entry(next)
                            .and_modify(|shift| {
                                shift.precedence = shift.precedence.max(production.precedence);
                                shift.order = shift.order.min(order);
                            })
                            .or_insert(ShiftCandidate {
                                target,
                                precedence: production.precedence,
                                order,
                            });
                    }
                    Some(_) => {}
                    None if item.production == 0 => {
                        accept |= lookahead.contains(SymbolId::END.index());
                    }
                    None => {
                        for terminal in lookahead.iter() {
                            let entry = reduces.entry(SymbolId(terminal as u16)).or_default();
                            if !entry.contains(&(item.production - 1)) {
                                entry.push(item.production - 1);
                            }
                        }
                    }
                }
            }

            if accept {
                actions[state_index * terminals + SymbolId::END.index()] = Action::Accept;
            }
            let mut lookaheads: Vec<SymbolId> = shifts.keys().chain(reduces.keys()).copied().collect();
            lookaheads.sort();
            lookaheads.dedup();
            for lookahead in lookaheads {
                if accept && lookahead == SymbolId::END {
                    continue;
                }
                let shift = shifts.get(&lookahead).copied();
                let candidates = reduces.get(&lookahead).map(Vec::as_slice).unwrap_or(&[]);
                let action = self.resolve(state_id, lookahead, shift, candidates, &mut conflicts);
                actions[state_index * terminals + lookahead.index()] = action;
            }

            for &(symbol, target) in &state.transitions {
                if !self.is_terminal(symbol) {
                    let column = self.symbols.nonterminal_index(symbol);
                    gotos[state_index * nonterminals + column] = Some(target);
                }
            }
        }

        (actions, gotos, conflicts)
    }

    /// Settle a table cell.
    ///
    /// Reduce/reduce picks the higher precedence, then the earlier
    /// production. Shift/reduce compares precedence first, then the
    /// reducing production's associativity, then declaration order.
    fn resolve(
        &self,
        state: StateId,
        lookahead: SymbolId,
        shift: Option<ShiftCandidate>,
        reduces: &[ProductionId],
        conflicts: &mut Vec<Conflict>,
    ) -> Action {
        let reduce = reduces.iter().copied().reduce(|best, candidate| {
            let (a, b) = (self.production(best + 1), self.production(candidate + 1));
            if b.precedence > a.precedence || (b.precedence == a.precedence && candidate < best) {
                candidate
            } else {
                best
            }
        });
        if reduces.len() > 1 {
            let resolution = match (shift, reduce) {
                (Some(_), _) | (None, None) => None,
                (None, Some(production)) => Some(Action::Reduce(production)),
            };
            if let Some(resolution) = resolution {
                debug!(state, ?lookahead, ?reduces, "reduce/reduce conflict");
                conflicts.push(Conflict {
                    state,
                    lookahead,
                    kind: ConflictKind::ReduceReduce {
                        productions: reduces.to_vec(),
                    },
                    resolution,
                });
            }
        }

        match (shift, reduce) {
            (None, None) => Action::Error,
            (Some(shift), None) => Action::Shift(shift.target),
            (None, Some(production)) => Action::Reduce(production),
            (Some(shift), Some(production)) => {
                let reducing = self.production(production + 1);
                let reduce_wins = if reducing.precedence != shift.precedence {
                    reducing.precedence > shift.precedence
                } else {
                    match reducing.associativity {
                        Assoc::Left => true,
                        Assoc::Right => false,
                        Assoc::None => production < shift.order,
                    }
                };
                let resolution = if reduce_wins {
                    Action::Reduce(production)
                } else {
                    Action::Shift(shift.target)
                };
                debug!(state, ?lookahead, production, ?resolution, "shift/reduce conflict");
                conflicts.push(Conflict {
                    state,
                    lookahead,
                    kind: ConflictKind::ShiftReduce { production },
                    resolution,
                });
                resolution
            }
        }
    }
}
