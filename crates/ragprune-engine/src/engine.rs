//! The pruning engine.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ragprune_core::{
    CapabilityError, Compressor, ContextItem, Metadata, PruneError, PruningMethod, PruningResult,
    PruningStep, RelevanceScorer,
};
use serde_json::json;
use tracing::{debug, warn};

use crate::PruningConfig;

const DEFAULT_CAPABILITY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
enum Stage {
    Metadata,
    Relevance,
    Compression,
}

impl Stage {
    fn name(self) -> &'static str {
        match self {
            Self::Metadata => "metadata_filter",
            Self::Relevance => "relevance_filter",
            Self::Compression => "llm_compression",
        }
    }
}

/// Prunes context items against a query through one or more stages.
///
/// The engine is best-effort with respect to its capabilities: when the
/// scorer or compressor fails mid-run, pruning stops at the last completed
/// stage and the result is returned with `partial` set instead of an error.
/// Only configuration problems fail a prune.
pub struct PruningEngine {
    scorer: Arc<dyn RelevanceScorer>,
    compressor: Arc<dyn Compressor>,
    timeout: Duration,
}

impl PruningEngine {
    pub fn new(scorer: Arc<dyn RelevanceScorer>, compressor: Arc<dyn Compressor>) -> Self {
        Self {
            scorer,
            compressor,
            timeout: DEFAULT_CAPABILITY_TIMEOUT,
        }
    }

    /// Override the per-call capability timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Prune `items` against `query` with the given method.
    ///
    /// Surviving items keep their original relative order. An empty input
    /// yields an empty result with a compression ratio of `1.0`.
    pub async fn prune<T: ContextItem>(
        &self,
        items: Vec<T>,
        query: &str,
        method: PruningMethod,
        config: &PruningConfig,
    ) -> Result<PruningResult<T>, PruneError> {
        config.validate()?;

        let started = Instant::now();
        let original_count = items.len();
        let mut metadata = Metadata::new();
        metadata.insert("query".to_string(), json!(query));
        metadata.insert("scorer".to_string(), json!(self.scorer.model_id()));

        let mut items = items;
        let mut steps: Vec<PruningStep> = Vec::new();
        let mut partial = false;

        for stage in stages_for(method, config) {
            let before = items.len();
            match stage {
                Stage::Metadata => {
                    items = metadata_stage(
                        items,
                        &config.metadata_filters,
                        config.require_all_filters,
                    );
                }
                Stage::Relevance => {
                    match self.relevance_stage(&mut items, query, config, &mut metadata).await {
                        Ok(()) => {}
                        Err(e) => {
                            warn!(error = %e, stage = stage.name(), "capability failed, returning partial result");
                            partial = true;
                            break;
                        }
                    }
                }
                Stage::Compression => match self.compression_stage(&mut items, query).await {
                    Ok(()) => {}
                    Err(e) => {
                        warn!(error = %e, stage = stage.name(), "capability failed, returning partial result");
                        partial = true;
                        break;
                    }
                },
            }
            steps.push(PruningStep {
                step: stage.name().to_string(),
                original_count: before,
                pruned_count: items.len(),
            });
        }

        let pruned_count = items.len();
        let compression_ratio = if original_count == 0 {
            1.0
        } else {
            pruned_count as f64 / original_count as f64
        };
        let processing_time = started.elapsed().as_secs_f64();

        debug!(
            method = %method,
            original = original_count,
            pruned = pruned_count,
            partial,
            "prune complete"
        );

        Ok(PruningResult {
            items,
            original_count,
            pruned_count,
            compression_ratio,
            processing_time,
            method,
            steps,
            partial,
            metadata,
        })
    }

    /// Score every item, annotate it, then apply threshold and `top_k`.
    ///
    /// Fails without touching `items` membership; annotations written before
    /// a failure are harmless.
    async fn relevance_stage<T: ContextItem>(
        &self,
        items: &mut Vec<T>,
        query: &str,
        config: &PruningConfig,
        metadata: &mut Metadata,
    ) -> Result<(), CapabilityError> {
        let mut scores = Vec::with_capacity(items.len());
        for item in items.iter() {
            let score = self.call_scorer(query, item.content()).await?;
            scores.push(score);
        }

        for (item, &score) in items.iter_mut().zip(&scores) {
            item.annotate("relevance_score", json!(score));
        }
        metadata.insert("relevance_scores".to_string(), json!(scores));
        metadata.insert(
            "similarity_threshold".to_string(),
            json!(config.similarity_threshold),
        );

        let mut keep: Vec<usize> = (0..items.len())
            .filter(|&i| scores[i] >= config.similarity_threshold)
            .collect();

        if let Some(k) = config.top_k {
            if keep.len() > k {
                // Highest score wins, original position breaks ties.
                keep.sort_by(|&a, &b| {
                    scores[b]
                        .partial_cmp(&scores[a])
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.cmp(&b))
                });
                keep.truncate(k);
                keep.sort_unstable();
            }
        }

        let mut index = 0;
        items.retain(|_| {
            let kept = keep.binary_search(&index).is_ok();
            index += 1;
            kept
        });
        Ok(())
    }

    /// Rewrite every item to its query-relevant core.
    ///
    /// All compressions are computed before any item is modified, so a
    /// failure leaves the items exactly as the previous stage produced them.
    async fn compression_stage<T: ContextItem>(
        &self,
        items: &mut [T],
        query: &str,
    ) -> Result<(), CapabilityError> {
        let mut compressed = Vec::with_capacity(items.len());
        for item in items.iter() {
            compressed.push(self.call_compressor(query, item.content()).await?);
        }
        for (item, content) in items.iter_mut().zip(compressed) {
            item.set_content(content);
            item.annotate("compressed", json!(true));
        }
        Ok(())
    }

    async fn call_scorer(&self, query: &str, text: &str) -> Result<f32, CapabilityError> {
        tokio::time::timeout(self.timeout, self.scorer.score(query, text))
            .await
            .map_err(|_| CapabilityError::Timeout(self.timeout.as_millis() as u64))?
    }

    async fn call_compressor(&self, query: &str, text: &str) -> Result<String, CapabilityError> {
        tokio::time::timeout(self.timeout, self.compressor.compress(query, text))
            .await
            .map_err(|_| CapabilityError::Timeout(self.timeout.as_millis() as u64))?
    }
}

fn stages_for(method: PruningMethod, config: &PruningConfig) -> Vec<Stage> {
    match method {
        PruningMethod::MetadataFilter => vec![Stage::Metadata],
        PruningMethod::RelevanceFilter => vec![Stage::Relevance],
        PruningMethod::LlmCompression => vec![Stage::Compression],
        PruningMethod::Hybrid => {
            let mut stages = Vec::new();
            if config.use_metadata_filter {
                stages.push(Stage::Metadata);
            }
            if config.use_relevance_filter {
                stages.push(Stage::Relevance);
            }
            if config.use_llm_compression {
                stages.push(Stage::Compression);
            }
            stages
        }
    }
}

/// Keep items whose metadata matches the filters exactly.
///
/// An empty filter map keeps everything; a missing key never matches.
fn metadata_stage<T: ContextItem>(
    items: Vec<T>,
    filters: &Metadata,
    require_all: bool,
) -> Vec<T> {
    if filters.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| {
            let matches = |(key, value): (&String, &serde_json::Value)| {
                item.metadata().get(key) == Some(value)
            };
            if require_all {
                filters.iter().all(matches)
            } else {
                filters.iter().any(matches)
            }
        })
        .collect()
}

/// Summary statistics for a pruning result, suitable for logs and UIs.
pub fn pruning_stats<T>(result: &PruningResult<T>) -> Metadata {
    let mut stats = Metadata::new();
    stats.insert("method".to_string(), json!(result.method.as_str()));
    stats.insert("original_count".to_string(), json!(result.original_count));
    stats.insert("pruned_count".to_string(), json!(result.pruned_count));
    stats.insert(
        "compression_ratio".to_string(),
        json!(result.compression_ratio),
    );
    stats.insert(
        "reduction".to_string(),
        json!(format!("{:.1}% reduction", result.reduction() * 100.0)),
    );
    stats.insert("steps".to_string(), json!(result.steps.len()));
    stats.insert("partial".to_string(), json!(result.partial));
    stats.insert(
        "processing_time".to_string(),
        json!(result.processing_time),
    );
    stats
}
