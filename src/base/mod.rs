//! Foundation types for the parsing engine.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`Point`], [`LineIndex`] - Row/column conversion
//! - [`InputEdit`] - Text edit descriptions and their composition
//!
//! This module has NO dependencies on other bluesitter modules.

mod edit;
mod position;


pub use edit::InputEdit;
pub use position::{LineIndex, Point};

// Re-export text-size types for convenience
pub use text_size::{self, TextRange, TextSize};
