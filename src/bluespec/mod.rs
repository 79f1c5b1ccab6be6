//! The Bluespec SystemVerilog language.
//!
//! The table is generated once per process on first use and shared by every
//! handle [`language`] returns. Foreign bindings reach the same instance
//! through the `tree_sitter_bluespec` symbol.

mod grammar;
mod scanner;


use std::sync::LazyLock;

pub use scanner::BsvToken;

use crate::language::{Language, LanguageData};

static LANGUAGE: LazyLock<Language> = LazyLock::new(|| {
    let grammar = grammar::grammar().expect("built-in Bluespec grammar is well formed");
    Language::new(grammar, scanner::scanner()).expect("built-in Bluespec grammar is well formed")
});

/// The Bluespec language. Every call returns a handle to the same table.
pub fn language() -> Language {
    LANGUAGE.clone()
}

/// Opaque pointer to the Bluespec language definition.
///
/// The pointee lives for the rest of the process. Convert it back with
/// [`Language::from_raw`].
#[unsafe(no_mangle)]
pub extern "C" fn tree_sitter_bluespec() -> *const LanguageData {
    LANGUAGE.as_ptr()
}
