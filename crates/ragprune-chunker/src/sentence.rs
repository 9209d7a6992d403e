//! Sentence-boundary splitting.

use async_trait::async_trait;
use ragprune_core::{ChunkError, ChunkPiece, ChunkStrategy, MethodType, ParamMap, ParsedDocument};
use serde::Deserialize;
use tracing::debug;

use crate::params::{parse_params, validate_window};
use crate::segment::{pack_segments, split_sentences_with, Segment};

fn default_sentence_separators() -> Vec<String> {
    [".", "!", "?"].iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SentenceParams {
    chunk_size: usize,
    chunk_overlap: usize,
    sentence_separators: Vec<String>,
}

impl Default for SentenceParams {
    fn default() -> Self {
        Self {
            chunk_size: 5000,
            chunk_overlap: 500,
            sentence_separators: default_sentence_separators(),
        }
    }
}

/// Splits element content at sentence boundaries and packs whole sentences
/// into windows of at most `chunk_size` characters. Sentences are never cut;
/// a single sentence longer than the window becomes its own chunk.
#[derive(Debug, Default)]
pub struct SentenceStrategy;

#[async_trait]
impl ChunkStrategy for SentenceStrategy {
    fn name(&self) -> &str {
        "sentence"
    }

    fn method_type(&self) -> MethodType {
        MethodType::Sentence
    }

    async fn split(
        &self,
        document: &ParsedDocument,
        params: &ParamMap,
    ) -> Result<Vec<ChunkPiece>, ChunkError> {
        let params: SentenceParams = parse_params(params)?;
        validate_window(params.chunk_size, params.chunk_overlap)?;

        let terminators: Vec<char> = params
            .sentence_separators
            .iter()
            .filter_map(|s| s.chars().next())
            .collect();
        if terminators.is_empty() {
            return Err(ChunkError::InvalidParameter(
                "sentence_separators must not be empty".to_string(),
            ));
        }

        let mut segments = Vec::new();
        for (idx, element) in document.elements.iter().enumerate() {
            for (start, end) in split_sentences_with(&element.content, &terminators) {
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
            sentences = segments.len(),
            pieces = pieces.len(),
            "sentence split complete"
        );
        Ok(pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragprune_core::{ElementType, StructuralElement};

    fn doc(text: &str) -> ParsedDocument {
        ParsedDocument::new(
            text,
            vec![StructuralElement::new(text, ElementType::Text, 0, text.len())],
        )
    }

    fn params(size: usize, overlap: usize) -> ParamMap {
        let mut map = ParamMap::new();
        map.insert("chunk_size".to_string(), serde_json::json!(size));
        map.insert("chunk_overlap".to_string(), serde_json::json!(overlap));
        map
    }

    #[tokio::test]
    async fn test_sentences_are_never_cut() {
        let text = "Alpha beta gamma. Delta epsilon zeta. Eta theta iota.";
        let pieces = SentenceStrategy.split(&doc(text), &params(25, 0)).await.unwrap();
        assert!(pieces.len() > 1);
        for piece in &pieces {
            assert!(piece.content.ends_with('.'));
        }
    }

    #[tokio::test]
    async fn test_oversized_sentence_stands_alone() {
        let text = "Short one. This single sentence is far longer than the whole window budget allows.";
        let pieces = SentenceStrategy.split(&doc(text), &params(20, 0)).await.unwrap();
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].content, "Short one.");
    }

    #[tokio::test]
    async fn test_custom_separators() {
        let text = "first; second; third";
        let mut map = params(10, 0);
        map.insert("sentence_separators".to_string(), serde_json::json!([";"]));
        let pieces = SentenceStrategy.split(&doc(text), &map).await.unwrap();
        assert!(pieces.len() >= 2);
    }

    #[tokio::test]
    async fn test_empty_separators_rejected() {
        let mut map = ParamMap::new();
        map.insert("sentence_separators".to_string(), serde_json::json!([]));
        let err = SentenceStrategy.split(&doc("x."), &map).await.unwrap_err();
        assert!(matches!(err, ChunkError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_whole_document_fits_one_piece() {
        let text = "One. Two. Three.";
        let pieces = SentenceStrategy.split(&doc(text), &params(5000, 500)).await.unwrap();
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].content, text);
    }
}
