//! Pruning configuration.

use ragprune_core::{Metadata, PruneError};
use serde::{Deserialize, Serialize};

/// Configuration for one pruning run.
///
/// The `use_*` flags select which stages a `hybrid` run executes; single-stage
/// methods ignore them. Every field has a default, so partial serialized
/// configs deserialize cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PruningConfig {
    /// Exact-match metadata filters; an empty map filters nothing
    pub metadata_filters: Metadata,
    /// Whether an item must match all filters (`true`) or any one (`false`)
    pub require_all_filters: bool,
    /// Minimum relevance score an item must reach, in `[0, 1]`
    pub similarity_threshold: f32,
    /// Optional cap on survivors after the relevance stage
    pub top_k: Option<usize>,
    /// Run the metadata stage in a hybrid prune
    pub use_metadata_filter: bool,
    /// Run the relevance stage in a hybrid prune
    pub use_relevance_filter: bool,
    /// Run the compression stage in a hybrid prune
    pub use_llm_compression: bool,
}

impl Default for PruningConfig {
    fn default() -> Self {
        Self {
            metadata_filters: Metadata::new(),
            require_all_filters: true,
            similarity_threshold: 0.7,
            top_k: None,
            use_metadata_filter: true,
            use_relevance_filter: true,
            use_llm_compression: false,
        }
    }
}

impl PruningConfig {
    /// Loose threshold, generous cap, no compression. For latency-sensitive
    /// paths.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            similarity_threshold: 0.5,
            top_k: Some(20),
            use_llm_compression: false,
            ..Self::default()
        }
    }

    /// The default trade-off.
    #[must_use]
    pub fn balanced() -> Self {
        Self {
            similarity_threshold: 0.7,
            top_k: Some(10),
            use_llm_compression: false,
            ..Self::default()
        }
    }

    /// Tight threshold, small cap, compression on. For token-constrained
    /// prompts.
    #[must_use]
    pub fn high_quality() -> Self {
        Self {
            similarity_threshold: 0.8,
            top_k: Some(5),
            use_llm_compression: true,
            ..Self::default()
        }
    }

    /// Validate the configuration before a run.
    pub fn validate(&self) -> Result<(), PruneError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(PruneError::InvalidParameter(format!(
                "similarity_threshold ({}) must be within [0, 1]",
                self.similarity_threshold
            )));
        }
        if self.top_k == Some(0) {
            return Err(PruneError::InvalidParameter(
                "top_k must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
