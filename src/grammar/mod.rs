//! Grammar definitions.
//!
//! A [`Grammar`] is an ordered set of named rules plus the names of the
//! extra (trivia) tokens and the optional word token used for keyword
//! extraction. The first rule is the start rule.
//!
//! Naming conventions:
//! - rules whose names start with `_` are hidden and their children are
//!   spliced into the parent node;
//! - `sym(name)` refers to a rule when one is defined with that name and
//!   to a scanner token otherwise;
//! - `string(text)` is an anonymous terminal. When no scanner token has
//!   that name it must look like a word and becomes a keyword, recognized
//!   by re-classifying the word token.

pub(crate) mod flatten;
pub mod rules;


use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::error::GrammarError;
pub use rules::{Assoc, Rule};

#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    name: SmolStr,
    rules: IndexMap<SmolStr, Rule>,
    extras: Vec<SmolStr>,
    word: Option<SmolStr>,
}

impl Grammar {
    pub fn builder(name: &str) -> GrammarBuilder {
        GrammarBuilder {
            name: SmolStr::new(name),
            rules: IndexMap::new(),
            extras: Vec::new(),
            word: None,
            duplicate: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn start_rule(&self) -> Option<&str> {
        self.rules.keys().next().map(SmolStr::as_str)
    }

    pub fn extras(&self) -> &[SmolStr] {
        &self.extras
    }

    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }
}

/// Fluent grammar construction
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    name: SmolStr,
    rules: IndexMap<SmolStr, Rule>,
    extras: Vec<SmolStr>,
    word: Option<SmolStr>,
    duplicate: Option<SmolStr>,
}

impl GrammarBuilder {
    pub fn rule(mut self, name: &str, rule: Rule) -> Self {
        let name = SmolStr::new(name);
        if self.rules.contains_key(&name) && self.duplicate.is_none() {
            self.duplicate = Some(name.clone());
        }
        self.rules.insert(name, rule);
        self
    }

    pub fn extras<'a>(mut self, extras: impl IntoIterator<Item = &'a str>) -> Self {
        self.extras.extend(extras.into_iter().map(SmolStr::new));
        self
    }

    pub fn word(mut self, word: &str) -> Self {
        self.word = Some(SmolStr::new(word));
        self
    }

    pub fn build(self) -> Result<Grammar, GrammarError> {
        if let Some(name) = self.duplicate {
            return Err(GrammarError::DuplicateRule(name.to_string()));
        }
        if self.rules.is_empty() {
            return Err(GrammarError::NoRules(self.name.to_string()));
        }
        Ok(Grammar {
            name: self.name,
            rules: self.rules,
            extras: self.extras,
            word: self.word,
        })
    }
}
