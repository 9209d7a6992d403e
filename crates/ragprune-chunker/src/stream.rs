//! Element-stream splitting for externally parsed documents.

use async_trait::async_trait;
use ragprune_core::{
    ChunkError, ChunkPiece, ChunkStrategy, ElementType, MethodType, ParamMap, ParsedDocument,
};
use serde::Deserialize;
use tracing::debug;

use crate::params::{parse_params, validate_window};
use crate::segment::{pack_segments, split_recursive, Segment};

#[derive(Debug, Deserialize)]
#[serde(default)]
struct StreamParams {
    chunk_size: usize,
    chunk_overlap: usize,
    include_page_breaks: bool,
}

impl Default for StreamParams {
    fn default() -> Self {
        Self {
            chunk_size: 5000,
            chunk_overlap: 500,
            include_page_breaks: false,
        }
    }
}

/// Packs a parsed element stream directly into windows, trusting the
/// upstream parser's element boundaries. Oversized elements are pre-split on
/// whitespace so no single element can blow the window.
///
/// Backs both externally parsed method types, which differ only in the
/// parser that produced the stream.
pub struct ElementStreamStrategy {
    method: MethodType,
}

impl ElementStreamStrategy {
    pub fn new(method: MethodType) -> Self {
        Self { method }
    }
}

#[async_trait]
impl ChunkStrategy for ElementStreamStrategy {
    fn name(&self) -> &str {
        self.method.as_str()
    }

    fn method_type(&self) -> MethodType {
        self.method
    }

    async fn split(
        &self,
        document: &ParsedDocument,
        params: &ParamMap,
    ) -> Result<Vec<ChunkPiece>, ChunkError> {
        let params: StreamParams = parse_params(params)?;
        validate_window(params.chunk_size, params.chunk_overlap)?;

        let seps: Vec<String> = ["\n\n", "\n", " ", ""].iter().map(|s| s.to_string()).collect();
        let mut segments = Vec::new();
        for (idx, element) in document.elements.iter().enumerate() {
            if element.element_type == ElementType::PageBreak && !params.include_page_breaks {
                continue;
            }
            if element.content.chars().count() <= params.chunk_size {
                segments.push(Segment {
                    element_idx: idx,
                    start: 0,
                    end: element.content.len(),
                    weight: element.content.chars().count(),
                });
            } else {
                for (start, end) in split_recursive(&element.content, &seps, params.chunk_size) {
                    let weight = element.content[start..end].chars().count();
                    segments.push(Segment {
                        element_idx: idx,
                        start,
                        end,
                        weight,
                    });
                }
            }
        }

        let pieces = pack_segments(&document.elements, &segments, params.chunk_size, params.chunk_overlap);
        debug!(
            method = %self.method,
            elements = document.elements.len(),
            pieces = pieces.len(),
            "element stream split complete"
        );
        Ok(pieces)
    }
}
