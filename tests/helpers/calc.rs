//! A small expression language: blocks of binary expressions.

use bluesitter::Language;
use bluesitter::grammar::Grammar;
use bluesitter::grammar::rules::*;
use bluesitter::lexer::{LexicalToken, LogosScanner};
use logos::Logos;
use once_cell::sync::Lazy;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcToken {
    #[regex(r"[ \t\n]+")]
    Whitespace,
    #[regex(r"[a-z]+")]
    Identifier,
    #[regex(r"[0-9]+")]
    Number,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
}

impl LexicalToken for CalcToken {
    const NAMES: &'static [&'static str] =
        &["_whitespace", "identifier", "number", "+", "-", "*", "{", "}"];

    fn index(self) -> usize {
        self as usize
    }
}

pub fn grammar() -> Grammar {
    Grammar::builder("calc")
        .extras(["_whitespace"])
        .rule("source_file", repeat(sym("_item")))
        .rule("_item", choice([sym("block"), sym("_expression")]))
        .rule(
            "block",
            seq([string("{"), repeat(sym("_item")), string("}")]),
        )
        .rule(
            "_expression",
            choice([sym("binary_expression"), sym("identifier"), sym("number")]),
        )
        .rule(
            "binary_expression",
            choice([
                prec_left(
                    1,
                    seq([
                        sym("_expression"),
                        choice([string("+"), string("-")]),
                        sym("_expression"),
                    ]),
                ),
                prec_left(
                    2,
                    seq([sym("_expression"), string("*"), sym("_expression")]),
                ),
            ]),
        )
        .build()
        .unwrap()
}

static CALC: Lazy<Language> =
    Lazy::new(|| Language::new(grammar(), LogosScanner::<CalcToken>::new(1)).unwrap());

pub fn calc() -> Language {
    CALC.clone()
}
