//! Logos-backed scanners

use std::marker::PhantomData;

use logos::Logos;

use super::{ScannedToken, Scanner};

/// A logos token enum whose variants map onto grammar token names.
pub trait LexicalToken: Copy + 'static {
    /// Grammar-facing names, indexed by [`LexicalToken::index`]
    const NAMES: &'static [&'static str];

    fn index(self) -> usize;
}

/// [`Scanner`] over any [`LexicalToken`] logos enum
pub struct LogosScanner<T> {
    max_lookahead: usize,
    marker: PhantomData<fn() -> T>,
}

impl<T> LogosScanner<T> {
    pub const fn new(max_lookahead: usize) -> Self {
        Self {
            max_lookahead,
            marker: PhantomData,
        }
    }
}

impl<T> Scanner for LogosScanner<T>
where
    T: LexicalToken + for<'s> Logos<'s, Source = str, Extras = ()>,
{
    fn token_names(&self) -> &'static [&'static str] {
        T::NAMES
    }

    fn max_lookahead(&self) -> usize {
        self.max_lookahead
    }

    fn scan<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = ScannedToken> + 'a> {
        Box::new(
            T::lexer(text)
                .spanned()
                .map(|(result, span)| ScannedToken {
                    index: result.ok().map(T::index),
                    span,
                }),
        )
    }
}
