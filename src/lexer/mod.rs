//! Lexing.
//!
//! A [`Scanner`] turns text into raw tokens without parser context; every
//! byte of the input belongs to exactly one token, and bytes the scanner
//! cannot match come back as single ERROR tokens. Keyword
//! re-classification happens later, in the parser, where the current
//! state is known.

mod logos_scanner;


use std::ops::Range;

pub use logos_scanner::{LexicalToken, LogosScanner};

use crate::language::Language;
use crate::table::SymbolId;

/// A scanner match, indexed by the scanner's own token numbering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedToken {
    /// `None` for unmatched input
    pub index: Option<usize>,
    pub span: Range<usize>,
}

pub trait Scanner: Send + Sync {
    /// Token names, indexed by [`ScannedToken::index`]
    fn token_names(&self) -> &'static [&'static str];

    /// Maximum number of bytes the scanner may examine past the end of a
    /// token before committing to it. Changes closer than this to a token
    /// can alter how it is scanned.
    fn max_lookahead(&self) -> usize;

    fn scan<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = ScannedToken> + 'a>;
}

/// A token with its raw symbol and byte position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub symbol: SymbolId,
    pub start: usize,
    pub len: usize,
}

impl Token {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Lexer wrapping a language's scanner, starting at any char boundary
pub struct Lexer<'a> {
    inner: Box<dyn Iterator<Item = ScannedToken> + 'a>,
    symbols: &'a [SymbolId],
    base: usize,
    offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(language: &'a Language, text: &'a str, offset: usize) -> Self {
        let mut base = offset.min(text.len());
        while !text.is_char_boundary(base) {
            base -= 1;
        }
        Self {
            inner: language.scanner().scan(&text[base..]),
            symbols: language.scanner_symbols(),
            base,
            offset: base,
        }
    }

    /// Byte offset just past the last token produced
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let scanned = self.inner.next()?;
        let start = self.base + scanned.span.start;
        let len = scanned.span.len();
        self.offset = start + len;

        let symbol = scanned
            .index
            .and_then(|index| self.symbols.get(index).copied())
            .unwrap_or(SymbolId::ERROR);

        Some(Token { symbol, start, len })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize<'a>(language: &'a Language, text: &'a str) -> Vec<Token> {
    Lexer::new(language, text, 0).collect()
}
