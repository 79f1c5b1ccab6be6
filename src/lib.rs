//! # bluesitter
//!
//! Incremental, error-tolerant, table-driven LR parsing engine with a
//! compiled-in Bluespec SystemVerilog grammar.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! bluespec  → Compiled-in Bluespec language and the C accessor
//!   ↓
//! parser    → LR driver, error recovery, incremental reuse
//!   ↓
//! tree      → Immutable syntax trees, nodes, edited trees
//!   ↓
//! language  → Grammar + parse table + scanner bundle
//!   ↓
//! lexer     → Scanner abstraction over logos
//!   ↓
//! table     → Symbols, LALR(1) construction, conflict resolution
//!   ↓
//! grammar   → Rule DSL and flattening into productions
//!   ↓
//! base      → Primitives (Point, LineIndex, InputEdit, TextRange)
//! ```

// ============================================================================
// MODULES (dependency order: base → grammar → table → lexer → language → tree → parser → bluespec)
// ============================================================================

/// Foundation types: points, line index, input edits
pub mod base;

/// Grammar construction errors
pub mod error;

/// Rule DSL and grammar flattening
pub mod grammar;

/// Symbol tables and LALR(1) parse tables
pub mod table;

/// Scanner trait and the logos adapter
pub mod lexer;

/// Runtime language bundle
pub mod language;

/// Syntax trees and the node inspection API
pub mod tree;

/// Parsing, recovery, and incremental reparsing
pub mod parser;

/// The compiled-in Bluespec language
pub mod bluespec;

// Re-export foundation types
pub use base::{InputEdit, LineIndex, Point, TextRange, TextSize};
pub use error::GrammarError;
pub use language::{Language, LanguageData};
pub use parser::{ParseStats, Parser, ParserOptions, parse, parse_batch, reparse};
pub use table::SymbolId;
pub use tree::{EditedTree, Node, ReusableNode, Tree};
