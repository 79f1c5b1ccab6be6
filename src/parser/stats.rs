/// Counters describing how a tree was produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Tokens produced by running the scanner for this parse
    pub lexed_tokens: usize,
    /// Tokens carried over from the old tree without rescanning
    pub carried_tokens: usize,
    /// Green tokens shared with the old tree
    pub reused_tokens: usize,
    /// Subtrees pushed whole from the old tree
    pub reused_nodes: usize,
    /// Error recoveries performed
    pub recoveries: usize,
}

impl ParseStats {
    /// Share of tokens that did not need rescanning
    pub fn carry_rate(&self) -> f64 {
        let total = self.lexed_tokens + self.carried_tokens;
        if total == 0 {
            0.0
        } else {
            self.carried_tokens as f64 / total as f64
        }
    }
}
