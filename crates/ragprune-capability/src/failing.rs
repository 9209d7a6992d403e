//! Capabilities that always fail, for exercising partial-result fallbacks.

use async_trait::async_trait;
use ragprune_core::{CapabilityError, Compressor, RelevanceScorer};

/// Scorer whose every call fails.
pub struct FailingScorer;

#[async_trait]
impl RelevanceScorer for FailingScorer {
    fn model_id(&self) -> &str {
        "failing"
    }

    async fn score(&self, _query: &str, _text: &str) -> Result<f32, CapabilityError> {
        Err(CapabilityError::Failed("scorer unavailable".to_string()))
    }
}

/// Compressor whose every call fails.
pub struct FailingCompressor;

#[async_trait]
impl Compressor for FailingCompressor {
    fn model_id(&self) -> &str {
        "failing"
    }

    async fn compress(&self, _query: &str, _text: &str) -> Result<String, CapabilityError> {
        Err(CapabilityError::Failed("compressor unavailable".to_string()))
    }
}
