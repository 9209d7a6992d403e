//! Deterministic generative-compression stand-ins.

use async_trait::async_trait;
use ragprune_core::{CapabilityError, Compressor};
use std::collections::HashSet;

/// Extractive compressor: keeps only sentences that share a term with the
/// query.
///
/// This mirrors what an LLM chain extractor does, without the model call:
/// sentences with no lexical connection to the query are dropped. If nothing
/// survives, the original text is returned unchanged rather than emptied.
pub struct ExtractiveCompressor;

impl ExtractiveCompressor {
    /// Create a new extractive compressor.
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

impl Default for ExtractiveCompressor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Compressor for ExtractiveCompressor {
    fn model_id(&self) -> &str {
        "extractive"
    }

    async fn compress(&self, query: &str, text: &str) -> Result<String, CapabilityError> {
        let query_terms = Self::terms(query);
        if query_terms.is_empty() {
            return Ok(text.to_string());
        }

        let kept: Vec<&str> = text
            .split_inclusive(['.', '!', '?'])
            .filter(|sentence| {
                let sentence_terms = Self::terms(sentence);
                !query_terms.is_disjoint(&sentence_terms)
            })
            .collect();

        if kept.is_empty() {
            return Ok(text.to_string());
        }

        Ok(kept.join(" ").split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

/// Identity compressor.
pub struct NoopCompressor;

impl NoopCompressor {
    /// Create a new no-op compressor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoopCompressor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Compressor for NoopCompressor {
    fn model_id(&self) -> &str {
        "noop"
    }

    async fn compress(&self, _query: &str, text: &str) -> Result<String, CapabilityError> {
        Ok(text.to_string())
    }
}
