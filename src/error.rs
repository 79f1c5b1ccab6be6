//! Errors raised while turning a grammar into a language.
//!
//! Parsing itself never fails: malformed input is represented by ERROR
//! nodes in the tree. Only grammar construction is fallible.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("grammar `{0}` defines no rules")]
    NoRules(String),

    #[error("rule `{rule}` references undefined symbol `{name}`")]
    UndefinedSymbol { rule: String, name: String },

    #[error("start rule `{0}` is hidden; the root rule must be visible")]
    HiddenStartRule(String),

    #[error("extra `{0}` is not a token produced by the scanner")]
    UnknownExtra(String),

    #[error("word token `{0}` is not produced by the scanner")]
    UnknownWord(String),

    #[error("keyword `{0}` needs a word token to be recognized")]
    KeywordWithoutWord(String),

    #[error("literal `{0}` is neither produced by the scanner nor a keyword")]
    UnscannableTerminal(String),

    #[error("scanner token `{0}` is declared more than once")]
    DuplicateToken(String),

    #[error("rule `{0}` is defined more than once")]
    DuplicateRule(String),

    #[error("grammar needs {0} symbols; at most {max} fit in a symbol id", max = u16::MAX)]
    TooManySymbols(usize),
}
