//! Recursive character splitting.

use async_trait::async_trait;
use ragprune_core::{ChunkError, ChunkPiece, ChunkStrategy, MethodType, ParamMap, ParsedDocument};
use serde::Deserialize;
use tracing::debug;

use crate::params::{parse_params, validate_window};
use crate::segment::{pack_segments, split_recursive, Segment};

fn default_separators() -> Vec<String> {
    ["\n\n", "\n", " ", ""].iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RecursiveParams {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl Default for RecursiveParams {
    fn default() -> Self {
        Self {
            chunk_size: 5000,
            chunk_overlap: 500,
            separators: default_separators(),
        }
    }
}

/// Splits on a priority-ordered separator list, recursing into finer
/// separators until every fragment fits the window, then packs fragments
/// back together up to `chunk_size` characters with `chunk_overlap` carried
/// between windows.
#[derive(Debug, Default)]
pub struct RecursiveStrategy;

#[async_trait]
impl ChunkStrategy for RecursiveStrategy {
    fn name(&self) -> &str {
        "recursive"
    }

    fn method_type(&self) -> MethodType {
        MethodType::Recursive
    }

    async fn split(
        &self,
        document: &ParsedDocument,
        params: &ParamMap,
    ) -> Result<Vec<ChunkPiece>, ChunkError> {
        let params: RecursiveParams = parse_params(params)?;
        validate_window(params.chunk_size, params.chunk_overlap)?;

        let mut segments = Vec::new();
        for (idx, element) in document.elements.iter().enumerate() {
            for (start, end) in split_recursive(&element.content, &params.separators, params.chunk_size)
            {
                let weight = element.content[start..end].chars().count();
                segments.push(Segment {
                    element_idx: idx,
                    start,
                    end,
                    weight,
                });
            }
        }

        let pieces = pack_segments(&document.elements, &segments, params.chunk_size, params.chunk_overlap);
        debug!(
            segments = segments.len(),
            pieces = pieces.len(),
            chunk_size = params.chunk_size,
            "recursive split complete"
        );
        Ok(pieces)
    }
}
