//! Parser options

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Reuse unchanged tokens and subtrees when an edited tree is supplied
    pub incremental: bool,
    /// How many upcoming tokens error recovery may skip while looking for a
    /// state that can resume
    pub max_recovery_lookahead: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            incremental: true,
            max_recovery_lookahead: 64,
        }
    }
}

impl ParserOptions {
    /// Options that always reparse from scratch
    pub fn full() -> Self {
        Self {
            incremental: false,
            ..Self::default()
        }
    }
}
