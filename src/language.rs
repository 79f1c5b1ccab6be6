//! Runtime language bundle.
//!
//! A [`Language`] couples a generated parse table with its scanner and
//! symbol metadata. It is immutable and cheap to clone; any number of
//! parsers may share one concurrently.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::debug;

use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::grammar::flatten::flatten;
use crate::lexer::Scanner;
use crate::table::{Conflict, ParseTable, StateId, SymbolId, SymbolInfo, build_table};

#[derive(Clone)]
pub struct Language {
    data: Arc<LanguageData>,
}

/// Shared language state. Opaque outside the crate; handed across the C
/// boundary by pointer.
pub struct LanguageData {
    name: SmolStr,
    table: ParseTable,
    scanner: Box<dyn Scanner>,
    scanner_symbols: Vec<SymbolId>,
    keywords: FxHashMap<SmolStr, SymbolId>,
    word: Option<SymbolId>,
    start: SymbolId,
}

impl Language {
    pub fn new(grammar: Grammar, scanner: impl Scanner + 'static) -> Result<Self, GrammarError> {
        let flat = flatten(&grammar, scanner.token_names())?;
        let start = flat.start;
        let table = build_table(flat.symbols, flat.productions, start);
        debug!(
            language = grammar.name(),
            symbols = table.symbols().len(),
            states = table.state_count(),
            "language ready"
        );
        Ok(Self {
            data: Arc::new(LanguageData {
                name: SmolStr::new(grammar.name()),
                table,
                scanner: Box::new(scanner),
                scanner_symbols: flat.scanner_symbols,
                keywords: flat.keywords.into_iter().collect(),
                word: flat.word,
                start,
            }),
        })
    }

    /// Rebuild a handle from a pointer produced by [`Language::as_ptr`].
    ///
    /// # Safety
    ///
    /// `ptr` must come from `as_ptr` on a language that is still alive.
    pub unsafe fn from_raw(ptr: *const LanguageData) -> Self {
        unsafe {
            Arc::increment_strong_count(ptr);
            Self {
                data: Arc::from_raw(ptr),
            }
        }
    }

    pub fn as_ptr(&self) -> *const LanguageData {
        Arc::as_ptr(&self.data)
    }

    /// True when both handles refer to the same language instance
    pub fn ptr_eq(&self, other: &Language) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn symbol_count(&self) -> usize {
        self.data.table.symbols().len()
    }

    pub fn state_count(&self) -> usize {
        self.data.table.state_count()
    }

    pub fn symbol_info(&self, symbol: SymbolId) -> Option<&SymbolInfo> {
        self.data.table.symbols().get(symbol)
    }

    pub fn symbol_name(&self, symbol: SymbolId) -> Option<&str> {
        self.symbol_info(symbol).map(|info| info.name.as_str())
    }

    pub fn symbol_for_name(&self, name: &str, named: bool) -> Option<SymbolId> {
        self.data.table.symbols().lookup(name, named)
    }

    pub fn is_named(&self, symbol: SymbolId) -> bool {
        self.symbol_info(symbol).is_some_and(SymbolInfo::is_named)
    }

    pub fn is_visible(&self, symbol: SymbolId) -> bool {
        self.symbol_info(symbol).is_some_and(|info| info.visible)
    }

    pub fn is_extra(&self, symbol: SymbolId) -> bool {
        self.symbol_info(symbol).is_some_and(|info| info.extra)
    }

    pub fn is_terminal(&self, symbol: SymbolId) -> bool {
        self.data.table.symbols().is_terminal(symbol)
    }

    pub fn start_symbol(&self) -> SymbolId {
        self.data.start
    }

    pub fn word_symbol(&self) -> Option<SymbolId> {
        self.data.word
    }

    pub fn conflicts(&self) -> &[Conflict] {
        self.data.table.conflicts()
    }

    pub fn table(&self) -> &ParseTable {
        &self.data.table
    }

    pub(crate) fn scanner(&self) -> &dyn Scanner {
        self.data.scanner.as_ref()
    }

    pub(crate) fn scanner_symbols(&self) -> &[SymbolId] {
        &self.data.scanner_symbols
    }

    pub fn max_lookahead(&self) -> usize {
        self.data.scanner.max_lookahead()
    }

    /// Classify a raw token in `state`.
    ///
    /// A word whose text is a keyword becomes the keyword when the state
    /// accepts the keyword, stays a word when only the word is accepted,
    /// and falls back to the keyword when neither is.
    pub(crate) fn resolve(&self, state: StateId, raw: SymbolId, text: &str) -> SymbolId {
        if Some(raw) != self.data.word {
            return raw;
        }
        let Some(&keyword) = self.data.keywords.get(text) else {
            return raw;
        };
        let table = &self.data.table;
        if table.has_action(state, keyword) || !table.has_action(state, raw) {
            keyword
        } else {
            raw
        }
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.data.name)
            .field("symbols", &self.symbol_count())
            .field("states", &self.state_count())
            .finish()
    }
}
