//! Lowering rule trees into flat productions.
//!
//! Every rule becomes a set of alternatives, each a plain symbol sequence
//! with an optional precedence. `choice` and `optional` multiply
//! alternatives, `repeat1` introduces a hidden left-recursive helper, and
//! `repeat` is `optional(repeat1(..))`.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::{SmolStr, format_smolstr};

use super::{Assoc, Grammar, Rule};
use crate::error::GrammarError;
use crate::table::{Production, SymbolId, SymbolInfo, SymbolTable};

/// A grammar resolved against a scanner's token names
#[derive(Debug, Clone)]
pub(crate) struct FlatGrammar {
    pub symbols: SymbolTable,
    pub productions: Vec<Production>,
    pub start: SymbolId,
    pub word: Option<SymbolId>,
    pub keywords: Vec<(SmolStr, SymbolId)>,
    /// Symbol for each scanner token index
    pub scanner_symbols: Vec<SymbolId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Alternative {
    symbols: Vec<SymbolId>,
    prec: Option<(i32, Assoc)>,
}

struct Flattener<'g> {
    symbols: SymbolTable,
    rules: FxHashMap<&'g str, SymbolId>,
    terminals: FxHashMap<SmolStr, SymbolId>,
    productions: Vec<Production>,
    current: &'g str,
    repeat_count: usize,
}

pub(crate) fn flatten(
    grammar: &Grammar,
    scanner_names: &[&str],
) -> Result<FlatGrammar, GrammarError> {
    let start_name = grammar
        .start_rule()
        .ok_or_else(|| GrammarError::NoRules(grammar.name().to_string()))?;

    let mut literals: Vec<&SmolStr> = Vec::new();
    for (_, rule) in grammar.rules() {
        rule.for_each_literal(&mut |text| {
            if !literals.contains(&text) {
                literals.push(text);
            }
        });
    }

    let mut symbols = SymbolTable::default();
    symbols.push(SymbolInfo {
        visible: false,
        ..SymbolInfo::terminal("$end", false)
    });
    symbols.push(SymbolInfo::terminal("ERROR", true));

    // Scanner tokens, in scanner order.
    let mut terminals: FxHashMap<SmolStr, SymbolId> = FxHashMap::default();
    let mut scanner_symbols = Vec::with_capacity(scanner_names.len());
    for &name in scanner_names {
        if terminals.contains_key(name) {
            return Err(GrammarError::DuplicateToken(name.to_string()));
        }
        let named = is_word(name) && !literals.iter().any(|text| text.as_str() == name);
        let id = symbols.push(SymbolInfo::terminal(name, named));
        terminals.insert(SmolStr::new(name), id);
        scanner_symbols.push(id);
    }

    // Literals the scanner does not produce become keywords.
    let mut keywords = Vec::new();
    for text in literals {
        if terminals.contains_key(text) {
            continue;
        }
        if !is_word(text) {
            return Err(GrammarError::UnscannableTerminal(text.to_string()));
        }
        let id = symbols.push(SymbolInfo {
            keyword: true,
            ..SymbolInfo::terminal(text, false)
        });
        terminals.insert(text.clone(), id);
        keywords.push((text.clone(), id));
    }

    let word = match grammar.word() {
        Some(name) => match terminals.get(name) {
            Some(&id) if scanner_names.contains(&name) => Some(id),
            _ => return Err(GrammarError::UnknownWord(name.to_string())),
        },
        None => None,
    };
    if let (None, Some((keyword, _))) = (word, keywords.first()) {
        return Err(GrammarError::KeywordWithoutWord(keyword.to_string()));
    }

    for extra in grammar.extras() {
        let id = match terminals.get(extra) {
            Some(&id) if scanner_names.contains(&extra.as_str()) => id,
            _ => return Err(GrammarError::UnknownExtra(extra.to_string())),
        };
        if let Some(info) = symbols.get_mut(id) {
            info.extra = true;
        }
    }

    let mut rules = FxHashMap::default();
    for (name, _) in grammar.rules() {
        rules.insert(name, symbols.push(SymbolInfo::nonterminal(name)));
    }
    let start = rules[start_name];
    if start_name.starts_with('_') {
        return Err(GrammarError::HiddenStartRule(start_name.to_string()));
    }

    let mut flattener = Flattener {
        symbols,
        rules,
        terminals,
        productions: Vec::new(),
        current: start_name,
        repeat_count: 0,
    };
    for (name, rule) in grammar.rules() {
        flattener.current = name;
        let lhs = flattener.rules[name];
        let alternatives = flattener.lower(rule)?;
        flattener.emit(lhs, alternatives);
    }

    if flattener.symbols.len() > u16::MAX as usize {
        return Err(GrammarError::TooManySymbols(flattener.symbols.len()));
    }

    Ok(FlatGrammar {
        symbols: flattener.symbols,
        productions: flattener.productions,
        start,
        word,
        keywords,
        scanner_symbols,
    })
}

impl Flattener<'_> {
    fn lower(&mut self, rule: &Rule) -> Result<Vec<Alternative>, GrammarError> {
        match rule {
            Rule::Blank => Ok(vec![Alternative::default()]),
            Rule::String(text) => {
                let id = self.terminals[text];
                Ok(vec![Alternative::single(id)])
            }
            Rule::Symbol(name) => {
                let id = self
                    .rules
                    .get(name.as_str())
                    .or_else(|| self.terminals.get(name))
                    .copied()
                    .ok_or_else(|| GrammarError::UndefinedSymbol {
                        rule: self.current.to_string(),
                        name: name.to_string(),
                    })?;
                Ok(vec![Alternative::single(id)])
            }
            Rule::Seq(members) => {
                let mut product = vec![Alternative::default()];
                for member in members {
                    let lowered = self.lower(member)?;
                    let mut next = Vec::with_capacity(product.len() * lowered.len());
                    for head in &product {
                        for tail in &lowered {
                            let mut symbols = head.symbols.clone();
                            symbols.extend_from_slice(&tail.symbols);
                            next.push(Alternative {
                                symbols,
                                prec: head.prec.or(tail.prec),
                            });
                        }
                    }
                    product = next;
                }
                Ok(product)
            }
            Rule::Choice(options) => {
                let mut alternatives: Vec<Alternative> = Vec::new();
                for option in options {
                    for alternative in self.lower(option)? {
                        if !alternatives.contains(&alternative) {
                            alternatives.push(alternative);
                        }
                    }
                }
                Ok(alternatives)
            }
            Rule::Repeat1(content) => self.lower_repeat1(content),
            Rule::Repeat(content) => {
                let mut alternatives = self.lower_repeat1(content)?;
                alternatives.push(Alternative::default());
                Ok(alternatives)
            }
            Rule::Prec {
                value,
                assoc,
                content,
            } => {
                let mut alternatives = self.lower(content)?;
                for alternative in &mut alternatives {
                    alternative.prec.get_or_insert((*value, *assoc));
                }
                Ok(alternatives)
            }
        }
    }

    /// `helper := helper item | item`, returned as a reference to `helper`
    fn lower_repeat1(&mut self, content: &Rule) -> Result<Vec<Alternative>, GrammarError> {
        let item = self.lower(content)?;
        let helper = self.repeat_helper();
        let mut alternatives = Vec::with_capacity(item.len() * 2);
        for alternative in &item {
            let mut symbols = vec![helper];
            symbols.extend_from_slice(&alternative.symbols);
            alternatives.push(Alternative {
                symbols,
                prec: alternative.prec,
            });
        }
        alternatives.extend(item);
        self.emit(helper, alternatives);
        Ok(vec![Alternative::single(helper)])
    }

    fn repeat_helper(&mut self) -> SymbolId {
        self.repeat_count += 1;
        let name = format_smolstr!("_{}_repeat{}", self.current, self.repeat_count);
        self.symbols.push(SymbolInfo {
            named: false,
            ..SymbolInfo::nonterminal(&name)
        })
    }

    fn emit(&mut self, lhs: SymbolId, alternatives: Vec<Alternative>) {
        let mut seen: FxHashSet<Vec<SymbolId>> = FxHashSet::default();
        for alternative in alternatives {
            if !seen.insert(alternative.symbols.clone()) {
                continue;
            }
            let (precedence, associativity) = alternative.prec.unwrap_or((0, Assoc::None));
            self.productions.push(Production {
                lhs,
                rhs: alternative.symbols,
                precedence,
                associativity,
            });
        }
    }
}

impl Alternative {
    fn single(id: SymbolId) -> Self {
        Self {
            symbols: vec![id],
            prec: None,
        }
    }
}

/// Identifier-shaped text: candidates for keywords and named tokens
pub(crate) fn is_word(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {
            chars.all(unicode_ident::is_xid_continue)
        }
        _ => false,
    }
}
