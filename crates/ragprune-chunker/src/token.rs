//! Token-budget splitting.

use std::sync::Arc;

use async_trait::async_trait;
use ragprune_core::{
    ChunkError, ChunkPiece, ChunkStrategy, MethodType, ParamMap, ParsedDocument, Tokenizer,
};
use serde::Deserialize;
use tracing::debug;

use crate::params::{parse_params, validate_window};
use crate::segment::{pack_segments, split_words, Segment};

#[derive(Debug, Deserialize)]
#[serde(default)]
struct TokenParams {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TokenParams {
    fn default() -> Self {
        Self {
            chunk_size: 5000,
            chunk_overlap: 500,
        }
    }
}

/// Packs whitespace-delimited words into windows bounded by a token budget
/// rather than a character budget. Token counts come from the injected
/// [`Tokenizer`], whose id is recorded on every produced piece.
pub struct TokenStrategy {
    tokenizer: Arc<dyn Tokenizer>,
}

impl TokenStrategy {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { tokenizer }
    }
}

#[async_trait]
impl ChunkStrategy for TokenStrategy {
    fn name(&self) -> &str {
        "token"
    }

    fn method_type(&self) -> MethodType {
        MethodType::Token
    }

    async fn split(
        &self,
        document: &ParsedDocument,
        params: &ParamMap,
    ) -> Result<Vec<ChunkPiece>, ChunkError> {
        let params: TokenParams = parse_params(params)?;
        validate_window(params.chunk_size, params.chunk_overlap)?;

        let mut segments = Vec::new();
        for (idx, element) in document.elements.iter().enumerate() {
            for (start, end) in split_words(&element.content) {
                // A word costs at least one token so the packer always advances.
                let weight = self
                    .tokenizer
                    .count_tokens(&element.content[start..end])
                    .max(1);
                segments.push(Segment {
                    element_idx: idx,
                    start,
                    end,
                    weight,
                });
            }
        }

        let mut pieces =
            pack_segments(&document.elements, &segments, params.chunk_size, params.chunk_overlap);
        for piece in &mut pieces {
            piece.metadata.insert(
                "tokenizer".to_string(),
                serde_json::json!(self.tokenizer.id()),
            );
        }

        debug!(
            words = segments.len(),
            pieces = pieces.len(),
            tokenizer = self.tokenizer.id(),
            "token split complete"
        );
        Ok(pieces)
    }
}
