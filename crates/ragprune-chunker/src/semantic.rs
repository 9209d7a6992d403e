//! Semantic-boundary splitting.

use std::sync::Arc;

use async_trait::async_trait;
use ragprune_core::{
    ChunkError, ChunkPiece, ChunkStrategy, MethodType, ParamMap, ParsedDocument, RelevanceScorer,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::params::parse_params;
use crate::segment::{build_piece, split_sentences, Segment};

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SemanticParams {
    semantic_threshold: f32,
    min_chunk_size: usize,
    max_chunk_size: usize,
}

impl Default for SemanticParams {
    fn default() -> Self {
        Self {
            semantic_threshold: 0.7,
            min_chunk_size: 500,
            max_chunk_size: 10000,
        }
    }
}

/// Cuts chunks at topic shifts: adjacent sentences are compared through the
/// injected [`RelevanceScorer`], and a similarity below `semantic_threshold`
/// marks a boundary. Chunks only close at a boundary once they reach
/// `min_chunk_size` characters, and are force-closed at `max_chunk_size`.
///
/// If the scorer fails mid-run the strategy degrades to size-only cuts for
/// the remainder of the document instead of failing the whole split.
pub struct SemanticStrategy {
    scorer: Arc<dyn RelevanceScorer>,
}

impl SemanticStrategy {
    pub fn new(scorer: Arc<dyn RelevanceScorer>) -> Self {
        Self { scorer }
    }
}

#[async_trait]
impl ChunkStrategy for SemanticStrategy {
    fn name(&self) -> &str {
        "semantic"
    }

    fn method_type(&self) -> MethodType {
        MethodType::Semantic
    }

    async fn split(
        &self,
        document: &ParsedDocument,
        params: &ParamMap,
    ) -> Result<Vec<ChunkPiece>, ChunkError> {
        let params: SemanticParams = parse_params(params)?;
        if !(0.0..=1.0).contains(&params.semantic_threshold) {
            return Err(ChunkError::InvalidParameter(format!(
                "semantic_threshold ({}) must be within [0, 1]",
                params.semantic_threshold
            )));
        }
        if params.max_chunk_size == 0 || params.min_chunk_size > params.max_chunk_size {
            return Err(ChunkError::InvalidParameter(format!(
                "min_chunk_size ({}) must not exceed max_chunk_size ({})",
                params.min_chunk_size, params.max_chunk_size
            )));
        }

        let mut sentences = Vec::new();
        for (idx, element) in document.elements.iter().enumerate() {
            for (start, end) in split_sentences(&element.content) {
                let weight = element.content[start..end].chars().count();
                sentences.push(Segment {
                    element_idx: idx,
                    start,
                    end,
                    weight,
                });
            }
        }

        let mut pieces: Vec<ChunkPiece> = Vec::new();
        let mut window: Vec<Segment> = Vec::new();
        let mut window_weight = 0usize;
        let mut scoring_ok = true;

        let mut flush = |window: &mut Vec<Segment>, weight: &mut usize, boundary: &str| {
            if window.is_empty() {
                return;
            }
            let mut piece = build_piece(&document.elements, window);
            piece
                .metadata
                .insert("chunking_method".to_string(), serde_json::json!("semantic"));
            piece
                .metadata
                .insert("sentence_count".to_string(), serde_json::json!(window.len()));
            piece
                .metadata
                .insert("boundary_type".to_string(), serde_json::json!(boundary));
            pieces.push(piece);
            window.clear();
            *weight = 0;
        };

        for sentence in sentences {
            if !window.is_empty() {
                // Force-close before the window can outgrow its cap, but never
                // emit a chunk below the minimum; an undersized window keeps
                // growing even past the cap rather than closing short.
                if window_weight >= params.min_chunk_size
                    && window_weight + sentence.weight > params.max_chunk_size
                {
                    flush(&mut window, &mut window_weight, "size_limit");
                } else if scoring_ok {
                    let prev_text = window[window.len() - 1]
                        .text(&document.elements)
                        .to_string();
                    let next_text = sentence.text(&document.elements);
                    match self.scorer.score(&prev_text, next_text).await {
                        Ok(similarity) => {
                            if similarity < params.semantic_threshold
                                && window_weight >= params.min_chunk_size
                            {
                                flush(&mut window, &mut window_weight, "semantic");
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "similarity scoring failed, falling back to size-only boundaries");
                            scoring_ok = false;
                        }
                    }
                }
            }
            window_weight += sentence.weight;
            window.push(sentence);
        }
        flush(&mut window, &mut window_weight, "end_of_document");

        debug!(
            pieces = pieces.len(),
            degraded = !scoring_ok,
            "semantic split complete"
        );
        Ok(pieces)
    }
}
