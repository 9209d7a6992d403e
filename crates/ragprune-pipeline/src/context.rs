//! The context-aware chunking pipeline.

use ragprune_chunker::ChunkProducer;
use ragprune_core::{ChunkingMethod, ChunkingResult, Error, MethodType, ParsedDocument, PruningMethod};
use ragprune_engine::{pruning_stats, PruningConfig, PruningEngine};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// Configuration for one context-aware chunking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextChunkingConfig {
    /// The chunking method to run
    pub method: ChunkingMethod,
    /// Whether to prune the produced chunks against the query
    pub enable_pruning: bool,
    /// The pruning method to apply when pruning is enabled
    pub pruning_method: PruningMethod,
    /// Pruning stage configuration
    pub pruning: PruningConfig,
}

impl Default for ContextChunkingConfig {
    fn default() -> Self {
        Self {
            method: ChunkingMethod::of_type(MethodType::Recursive),
            enable_pruning: true,
            pruning_method: PruningMethod::Hybrid,
            pruning: PruningConfig::default(),
        }
    }
}

/// Chunks a document, then prunes the chunks against a query.
///
/// Pruning annotations land on the surviving chunks' metadata and the run
/// summary lands on the result metadata. A run that prunes every chunk away
/// is a valid outcome, not an error.
pub struct ContextAwareChunker {
    producer: ChunkProducer,
    engine: PruningEngine,
}

impl ContextAwareChunker {
    pub fn new(producer: ChunkProducer, engine: PruningEngine) -> Self {
        Self { producer, engine }
    }

    /// Chunk `document` and, when enabled, prune the chunks against `query`.
    pub async fn chunk(
        &self,
        document: &ParsedDocument,
        config: &ContextChunkingConfig,
        query: &str,
    ) -> Result<ChunkingResult, Error> {
        let mut result = self.producer.produce(document, &config.method).await?;

        if !config.enable_pruning || result.chunks.is_empty() {
            result
                .metadata
                .insert("enable_pruning".to_string(), json!(false));
            return Ok(result);
        }

        let pruned = self
            .engine
            .prune(
                std::mem::take(&mut result.chunks),
                query,
                config.pruning_method,
                &config.pruning,
            )
            .await?;

        debug!(
            original = pruned.original_count,
            surviving = pruned.pruned_count,
            partial = pruned.partial,
            "context-aware chunking complete"
        );

        result.metadata.insert("enable_pruning".to_string(), json!(true));
        result.metadata.insert(
            "pruning_method".to_string(),
            json!(config.pruning_method.as_str()),
        );
        result.metadata.insert(
            "compression_ratio".to_string(),
            json!(pruned.compression_ratio),
        );
        result
            .metadata
            .insert("pruning".to_string(), json!(pruning_stats(&pruned)));
        if pruned.partial {
            result.metadata.insert("pruning_partial".to_string(), json!(true));
        }

        result.processing_time += pruned.processing_time;
        result.chunks = pruned.items;
        result.total_chunks = result.chunks.len();
        Ok(result)
    }
}
