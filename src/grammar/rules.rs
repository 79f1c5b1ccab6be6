//! Rule combinators.
//!
//! Grammars are written as trees of [`Rule`] values built with the free
//! functions in this module:
//!
//! ```
//! use bluesitter::grammar::rules::{choice, prec_left, seq, string, sym};
//!
//! let sum = prec_left(1, seq([sym("_expression"), string("+"), sym("_expression")]));
//! let expression = choice([sum, sym("identifier")]);
//! # let _ = expression;
//! ```

use smol_str::SmolStr;

/// Associativity attached to a precedence annotation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Assoc {
    #[default]
    None,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Matches the empty string
    Blank,
    /// An anonymous terminal spelled exactly like this
    String(SmolStr),
    /// A rule name, or a scanner token name
    Symbol(SmolStr),
    Seq(Vec<Rule>),
    Choice(Vec<Rule>),
    /// Zero or more
    Repeat(Box<Rule>),
    /// One or more
    Repeat1(Box<Rule>),
    Prec {
        value: i32,
        assoc: Assoc,
        content: Box<Rule>,
    },
}

pub fn blank() -> Rule {
    Rule::Blank
}

pub fn string(text: &str) -> Rule {
    Rule::String(SmolStr::new(text))
}

pub fn sym(name: &str) -> Rule {
    Rule::Symbol(SmolStr::new(name))
}

pub fn seq(rules: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Seq(rules.into_iter().collect())
}

pub fn choice(rules: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Choice(rules.into_iter().collect())
}

pub fn optional(rule: Rule) -> Rule {
    Rule::Choice(vec![rule, Rule::Blank])
}

pub fn repeat(rule: Rule) -> Rule {
    Rule::Repeat(Box::new(rule))
}

pub fn repeat1(rule: Rule) -> Rule {
    Rule::Repeat1(Box::new(rule))
}

/// `rule (',' rule)*`
pub fn comma_sep1(rule: Rule) -> Rule {
    seq([rule.clone(), repeat(seq([string(","), rule]))])
}

pub fn prec(value: i32, rule: Rule) -> Rule {
    Rule::Prec {
        value,
        assoc: Assoc::None,
        content: Box::new(rule),
    }
}

pub fn prec_left(value: i32, rule: Rule) -> Rule {
    Rule::Prec {
        value,
        assoc: Assoc::Left,
        content: Box::new(rule),
    }
}

pub fn prec_right(value: i32, rule: Rule) -> Rule {
    Rule::Prec {
        value,
        assoc: Assoc::Right,
        content: Box::new(rule),
    }
}

impl Rule {
    /// Visit every anonymous literal in declaration order
    pub(crate) fn for_each_literal<'r>(&'r self, f: &mut impl FnMut(&'r SmolStr)) {
        match self {
            Rule::Blank | Rule::Symbol(_) => {}
            Rule::String(text) => f(text),
            Rule::Seq(rules) | Rule::Choice(rules) => {
                for rule in rules {
                    rule.for_each_literal(f);
                }
            }
            Rule::Repeat(content) | Rule::Repeat1(content) | Rule::Prec { content, .. } => {
                content.for_each_literal(f)
            }
        }
    }
}
