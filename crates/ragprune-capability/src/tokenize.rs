//! Token counting.

use ragprune_core::Tokenizer;

/// Character-count token approximation: `ceil(chars / 4)`.
///
/// This is the standard fallback when no real tokenizer is wired in; four
/// characters per token tracks English prose closely enough for sizing
/// chunks.
pub struct HeuristicTokenizer;

impl HeuristicTokenizer {
    /// Create a new heuristic tokenizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeuristicTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for HeuristicTokenizer {
    fn id(&self) -> &str {
        "heuristic"
    }

    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count().div_ceil(4)
    }
}
