//! Parsing.
//!
//! [`Parser`] runs a language's LR automaton over a text and always yields
//! a tree: syntax errors become ERROR nodes rather than failures. Given an
//! [`EditedTree`], unchanged tokens and subtrees of the old tree are
//! reused, and the result is the same tree a fresh parse would build.

mod driver;
mod options;
mod recovery;
mod reuse;
mod stack;
mod stats;


use rayon::prelude::*;
use std::borrow::Cow;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use options::ParserOptions;
pub use stats::ParseStats;

use driver::{ParseRun, lex_all};
use reuse::relex;

use crate::language::Language;
use crate::tree::{EditedTree, Tree};

/// A parser bound to one language.
///
/// Parsers are lightweight; each call builds its own parse state, so a
/// parser can be used from several threads at once.
#[derive(Debug, Clone)]
pub struct Parser {
    language: Language,
    options: ParserOptions,
}

impl Parser {
    pub fn new(language: &Language) -> Self {
        Self::with_options(language, ParserOptions::default())
    }

    pub fn with_options(language: &Language, options: ParserOptions) -> Self {
        Self {
            language: language.clone(),
            options,
        }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn set_language(&mut self, language: &Language) {
        self.language = language.clone();
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ParserOptions) {
        self.options = options;
    }

    /// Parse `text`, reusing `old` when it is given
    pub fn parse(&self, text: &str, old: Option<&EditedTree>) -> Tree {
        match self.run(text, old, None) {
            Some(tree) => tree,
            None => unreachable!("parsing without a cancellation token always completes"),
        }
    }

    /// Parse `text`, returning `None` once `cancel` is signalled.
    ///
    /// Cancellation is observed between tokens.
    pub fn parse_with_cancel(
        &self,
        text: &str,
        old: Option<&EditedTree>,
        cancel: &CancellationToken,
    ) -> Option<Tree> {
        self.run(text, old, Some(cancel))
    }

    /// Parse raw bytes. Invalid UTF-8 sequences are replaced with U+FFFD
    /// before parsing.
    pub fn parse_bytes(&self, bytes: &[u8], old: Option<&EditedTree>) -> Tree {
        let text = String::from_utf8_lossy(bytes);
        if let Cow::Owned(_) = text {
            warn!(len = bytes.len(), "input is not valid UTF-8; parsing a lossy copy");
        }
        self.parse(&text, old)
    }

    fn run(
        &self,
        text: &str,
        old: Option<&EditedTree>,
        cancel: Option<&CancellationToken>,
    ) -> Option<Tree> {
        let old = old.filter(|edited| self.can_reuse(edited, text));

        let run = match old {
            Some(edited) => {
                let relexed = relex(&self.language, edited, text, cancel)?;
                ParseRun::new(
                    &self.language,
                    text,
                    relexed.tokens,
                    Some(relexed.cursor),
                    &self.options,
                    cancel,
                    relexed.stats,
                )
            }
            None => {
                let tokens = lex_all(&self.language, text, cancel)?;
                let stats = ParseStats {
                    lexed_tokens: tokens.len(),
                    ..ParseStats::default()
                };
                ParseRun::new(&self.language, text, tokens, None, &self.options, cancel, stats)
            }
        };

        let tree = run.run()?;
        debug!(
            language = self.language.name(),
            len = text.len(),
            stats = ?tree.stats(),
            "parsed"
        );
        Some(tree)
    }

    fn can_reuse(&self, edited: &EditedTree, text: &str) -> bool {
        if !self.options.incremental {
            return false;
        }
        if !edited.old_tree().language().ptr_eq(&self.language) {
            warn!("old tree belongs to another language; parsing from scratch");
            return false;
        }
        if edited.new_len() != text.len() {
            warn!(
                expected = edited.new_len(),
                actual = text.len(),
                "edit does not match the new text; parsing from scratch"
            );
            return false;
        }
        true
    }
}

/// Parse `text` from scratch
pub fn parse(language: &Language, text: &str) -> Tree {
    Parser::new(language).parse(text, None)
}

/// Parse the new version of an edited tree's text
pub fn reparse(edited: &EditedTree, text: &str) -> Tree {
    Parser::new(edited.old_tree().language()).parse(text, Some(edited))
}

/// Parse independent texts in parallel
pub fn parse_batch<S>(language: &Language, texts: &[S]) -> Vec<Tree>
where
    S: AsRef<str> + Sync,
{
    texts
        .par_iter()
        .map(|text| parse(language, text.as_ref()))
        .collect()
}
