//! Symbol identifiers and metadata

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// Dense symbol index.
///
/// Layout: `0` is end-of-input, `1` is ERROR, then terminals (scanner
/// tokens followed by keywords), then nonterminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(pub u16);

impl SymbolId {
    pub const END: SymbolId = SymbolId(0);
    pub const ERROR: SymbolId = SymbolId(1);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolInfo {
    pub name: SmolStr,
    pub terminal: bool,
    /// Named symbols appear in s-expressions and `named_children`
    pub named: bool,
    /// Hidden nonterminals are spliced into their parent
    pub visible: bool,
    pub extra: bool,
    pub keyword: bool,
}

impl SymbolInfo {
    pub(crate) fn terminal(name: &str, named: bool) -> Self {
        Self {
            name: SmolStr::new(name),
            terminal: true,
            named,
            visible: !name.starts_with('_'),
            extra: false,
            keyword: false,
        }
    }

    pub(crate) fn nonterminal(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            terminal: false,
            named: true,
            visible: !name.starts_with('_'),
            extra: false,
            keyword: false,
        }
    }

    /// Shown in s-expressions and counted by `named_children`
    pub fn is_named(&self) -> bool {
        self.named && self.visible
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    infos: Vec<SymbolInfo>,
    by_name: FxHashMap<(SmolStr, bool), SymbolId>,
    terminal_count: usize,
}

impl SymbolTable {
    pub(crate) fn push(&mut self, info: SymbolInfo) -> SymbolId {
        let id = SymbolId(self.infos.len() as u16);
        if info.terminal {
            debug_assert_eq!(self.terminal_count, self.infos.len());
            self.terminal_count += 1;
        }
        self.by_name
            .entry((info.name.clone(), info.is_named()))
            .or_insert(id);
        self.infos.push(info);
        id
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub fn terminal_count(&self) -> usize {
        self.terminal_count
    }

    pub fn nonterminal_count(&self) -> usize {
        self.infos.len() - self.terminal_count
    }

    pub fn is_terminal(&self, id: SymbolId) -> bool {
        id.index() < self.terminal_count
    }

    /// Position of a nonterminal within the nonterminal range
    pub(crate) fn nonterminal_index(&self, id: SymbolId) -> usize {
        id.index() - self.terminal_count
    }

    pub fn get(&self, id: SymbolId) -> Option<&SymbolInfo> {
        self.infos.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: SymbolId) -> Option<&mut SymbolInfo> {
        self.infos.get_mut(id.index())
    }

    /// Look a symbol up by name and named-ness
    pub fn lookup(&self, name: &str, named: bool) -> Option<SymbolId> {
        self.by_name.get(&(SmolStr::new(name), named)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &SymbolInfo)> {
        self.infos
            .iter()
            .enumerate()
            .map(|(index, info)| (SymbolId(index as u16), info))
    }
}
