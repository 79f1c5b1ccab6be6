//! Bluespec tokens

use logos::{Lexer, Logos};

use crate::lexer::{LexicalToken, LogosScanner};

/// Bytes read past a token before settling on it: `8` in `8'h` must see
/// the digit after `h`.
const MAX_LOOKAHEAD: usize = 3;

pub(super) fn scanner() -> LogosScanner<BsvToken> {
    LogosScanner::new(MAX_LOOKAHEAD)
}

/// Raw BSV tokens. Variant order matches [`BsvToken::NAMES`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BsvToken {
    // Trivia
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,
    #[regex(r"//[^\n]*")]
    #[token("/*", block_comment)]
    Comment,

    // Names and literals
    #[regex(r"[a-z_][a-zA-Z0-9_$]*")]
    Ident,
    #[regex(r"[A-Z][a-zA-Z0-9_$]*")]
    UpperIdent,
    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_$]*")]
    SystemIdent,
    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"([0-9][0-9_]*)?'[dDhHoObB][0-9a-fA-FxXzZ_]+")]
    #[regex(r"'[01]")]
    IntLiteral,
    #[regex(r"[0-9][0-9_]*\.[0-9_]+([eE][+-]?[0-9_]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+")]
    RealLiteral,
    #[token("\"", string_literal)]
    StringLiteral,

    // Punctuation
    #[token("(*")]
    AttrOpen,
    #[token("*)")]
    AttrClose,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("..")]
    DotDot,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token("#")]
    Hash,
    #[token("=")]
    Assign,
    #[token("<-")]
    LArrow,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~^")]
    TildeCaret,
    #[token("^~")]
    CaretTilde,
    #[token("~&")]
    TildeAmp,
    #[token("~|")]
    TildePipe,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
}

impl LexicalToken for BsvToken {
    const NAMES: &'static [&'static str] = &[
        "_whitespace",
        "comment",
        "identifier",
        "Identifier",
        "system_identifier",
        "int_literal",
        "real_literal",
        "string_literal",
        "(*",
        "*)",
        "(",
        ")",
        "[",
        "]",
        "{",
        "}",
        ";",
        ",",
        ".",
        "..",
        "::",
        ":",
        "#",
        "=",
        "<-",
        "<=",
        ">=",
        "<",
        ">",
        "==",
        "!=",
        "+",
        "-",
        "*",
        "/",
        "%",
        "<<",
        ">>",
        "&&",
        "||",
        "&",
        "|",
        "^",
        "~^",
        "^~",
        "~&",
        "~|",
        "~",
        "!",
        "?",
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Runs to the closing `*/`, or to the end of input when there is none
fn block_comment(lexer: &mut Lexer<'_, BsvToken>) -> bool {
    let rest = lexer.remainder();
    let len = rest.find("*/").map_or(rest.len(), |end| end + 2);
    lexer.bump(len);
    true
}

/// Runs to the closing quote. An unterminated string stops at the end of
/// its line.
fn string_literal(lexer: &mut Lexer<'_, BsvToken>) -> bool {
    let rest = lexer.remainder().as_bytes();
    let mut len = rest.len();
    let mut escaped = false;
    for (index, &byte) in rest.iter().enumerate() {
        match byte {
            b'\n' => {
                len = index;
                break;
            }
            b'"' if !escaped => {
                len = index + 1;
                break;
            }
            b'\\' if !escaped => escaped = true,
            _ => escaped = false,
        }
    }
    lexer.bump(len);
    true
}
