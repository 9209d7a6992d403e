//! Deterministic relevance scorers.
//!
//! [`KeywordScorer`] is the offline default: it scores a text by the fraction
//! of distinct query terms it contains. That is crude next to an embedding
//! model, but it is deterministic, dependency-free and monotone in lexical
//! overlap, which is what the pruning tests need.

use async_trait::async_trait;
use ragprune_core::{CapabilityError, RelevanceScorer};
use std::collections::HashSet;

/// Lexical query-term overlap scorer.
///
/// The score is `|query terms ∩ text terms| / |query terms|`, always in
/// `[0, 1]`. Terms are lowercased alphanumeric words.
pub struct KeywordScorer;

impl KeywordScorer {
    /// Create a new keyword scorer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn terms(text: &str) -> HashSet<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect()
    }
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelevanceScorer for KeywordScorer {
    fn model_id(&self) -> &str {
        "keyword-overlap"
    }

    async fn score(&self, query: &str, text: &str) -> Result<f32, CapabilityError> {
        let query_terms = Self::terms(query);
        if query_terms.is_empty() {
            return Ok(0.0);
        }

        let text_terms = Self::terms(text);
        let matched = query_terms.intersection(&text_terms).count();
        Ok(matched as f32 / query_terms.len() as f32)
    }
}

/// Scorer returning a constant score for every input.
pub struct NoopScorer {
    score: f32,
}

impl NoopScorer {
    /// Create a scorer that always returns `1.0`.
    #[must_use]
    pub fn new() -> Self {
        Self { score: 1.0 }
    }

    /// Create a scorer that always returns `score`.
    #[must_use]
    pub fn with_score(score: f32) -> Self {
        Self { score }
    }
}

impl Default for NoopScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelevanceScorer for NoopScorer {
    fn model_id(&self) -> &str {
        "noop"
    }

    async fn score(&self, _query: &str, _text: &str) -> Result<f32, CapabilityError> {
        Ok(self.score)
    }
}
