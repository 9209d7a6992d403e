//! Chunk production.

use std::sync::Arc;
use std::time::Instant;

use ragprune_core::{
    Chunk, ChunkError, ChunkingMethod, ChunkingResult, Metadata, ParsedDocument, Tokenizer,
};
use tracing::debug;
use uuid::Uuid;

use crate::StrategyRegistry;

/// Orchestrates one chunking run: resolve the strategy, split the document,
/// and finalize raw pieces into [`Chunk`]s with identity, index, token count
/// and inherited document metadata.
pub struct ChunkProducer {
    registry: StrategyRegistry,
    tokenizer: Arc<dyn Tokenizer>,
}

impl ChunkProducer {
    pub fn new(registry: StrategyRegistry, tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            registry,
            tokenizer,
        }
    }

    /// Produce chunks for a document using the given method.
    ///
    /// An empty document yields an empty result; only configuration problems
    /// and strategy failures are errors.
    pub async fn produce(
        &self,
        document: &ParsedDocument,
        method: &ChunkingMethod,
    ) -> Result<ChunkingResult, ChunkError> {
        if !method.is_active {
            return Err(ChunkError::InvalidParameter(format!(
                "chunking method '{}' is inactive",
                method.name
            )));
        }

        let run_metadata = self.run_metadata(document, method);
        if document.elements.is_empty() {
            debug!(method = %method.method_type, "empty document, producing no chunks");
            return Ok(ChunkingResult::empty(run_metadata));
        }

        let started = Instant::now();
        let strategy = self.registry.resolve(method.method_type)?;
        let pieces = strategy.split(document, &method.parameters).await?;

        let chunks: Vec<Chunk> = pieces
            .into_iter()
            .enumerate()
            .map(|(index, piece)| {
                let mut metadata = document.metadata.clone();
                metadata.extend(piece.metadata);
                metadata
                    .entry("chunking_method".to_string())
                    .or_insert_with(|| serde_json::json!(method.method_type.as_str()));

                Chunk {
                    id: Uuid::new_v4(),
                    token_count: self.tokenizer.count_tokens(&piece.content),
                    content: piece.content,
                    chunk_type: piece.chunk_type,
                    chunk_index: index as u32,
                    start_position: piece.start_position,
                    end_position: piece.end_position,
                    metadata,
                }
            })
            .collect();

        let processing_time = started.elapsed().as_secs_f64();
        debug!(
            method = %method.method_type,
            chunks = chunks.len(),
            elapsed_s = processing_time,
            "chunking run complete"
        );

        Ok(ChunkingResult {
            total_chunks: chunks.len(),
            chunks,
            processing_time,
            metadata: run_metadata,
        })
    }

    fn run_metadata(&self, document: &ParsedDocument, method: &ChunkingMethod) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("chunking_method".to_string(), serde_json::json!(method.name));
        metadata.insert(
            "method_type".to_string(),
            serde_json::json!(method.method_type.as_str()),
        );
        metadata.insert(
            "tokenizer".to_string(),
            serde_json::json!(self.tokenizer.id()),
        );
        metadata.insert(
            "document_elements".to_string(),
            serde_json::json!(document.elements.len()),
        );
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragprune_capability::{HeuristicTokenizer, KeywordScorer};
    use ragprune_core::{ElementType, MethodType, StructuralElement};
    use serde_json::json;

    fn producer() -> ChunkProducer {
        let registry = StrategyRegistry::with_defaults(
            Arc::new(HeuristicTokenizer),
            Arc::new(KeywordScorer),
        );
        ChunkProducer::new(registry, Arc::new(HeuristicTokenizer))
    }

    fn doc(text: &str) -> ParsedDocument {
        ParsedDocument::new(
            text,
            vec![StructuralElement::new(text, ElementType::Text, 0, text.len())],
        )
    }

    #[tokio::test]
    async fn test_produce_assigns_identity_and_index() {
        let text = "word ".repeat(30);
        let mut method = ChunkingMethod::of_type(MethodType::Recursive);
        method
            .parameters
            .insert("chunk_size".to_string(), json!(40));
        method
            .parameters
            .insert("chunk_overlap".to_string(), json!(0));

        let result = producer().produce(&doc(text.trim()), &method).await.unwrap();
        assert!(result.total_chunks > 1);
        assert_eq!(result.total_chunks, result.chunks.len());
        for (i, chunk) in result.chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i as u32);
            assert!(chunk.token_count > 0);
            assert!(!chunk.content.is_empty());
        }
        let ids: std::collections::HashSet<_> = result.chunks.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), result.chunks.len());
    }

    #[tokio::test]
    async fn test_document_metadata_inherited() {
        let mut document = doc("Some policy text here.");
        document
            .metadata
            .insert("document_type".to_string(), json!("policy"));

        let method = ChunkingMethod::of_type(MethodType::Sentence);
        let result = producer().produce(&document, &method).await.unwrap();
        assert_eq!(result.chunks[0].metadata["document_type"], json!("policy"));
        assert_eq!(result.chunks[0].metadata["chunking_method"], json!("sentence"));
    }

    #[tokio::test]
    async fn test_strategy_metadata_wins_over_document() {
        let document = doc("First topic sentence. Unrelated topic next.");
        let method = ChunkingMethod::of_type(MethodType::Semantic);
        let result = producer().produce(&document, &method).await.unwrap();
        // Semantic pieces carry their own chunking_method annotation.
        assert_eq!(result.chunks[0].metadata["chunking_method"], json!("semantic"));
    }

    #[tokio::test]
    async fn test_produce_is_repeatable() {
        let text = "First sentence here. Second sentence here. Third sentence here.";
        let mut method = ChunkingMethod::of_type(MethodType::Sentence);
        method
            .parameters
            .insert("chunk_size".to_string(), json!(45));
        method
            .parameters
            .insert("chunk_overlap".to_string(), json!(0));

        let producer = producer();
        let first = producer.produce(&doc(text), &method).await.unwrap();
        let second = producer.produce(&doc(text), &method).await.unwrap();

        // Identity differs per run; content, order and spans do not.
        assert_eq!(first.total_chunks, second.total_chunks);
        for (a, b) in first.chunks.iter().zip(&second.chunks) {
            assert_eq!(a.content, b.content);
            assert_eq!(a.chunk_type, b.chunk_type);
            assert_eq!(a.start_position, b.start_position);
            assert_eq!(a.end_position, b.end_position);
            assert_eq!(a.token_count, b.token_count);
        }
    }

    #[tokio::test]
    async fn test_empty_document_is_not_an_error() {
        let document = ParsedDocument::new(String::new(), Vec::new());
        let method = ChunkingMethod::of_type(MethodType::Recursive);
        let result = producer().produce(&document, &method).await.unwrap();
        assert_eq!(result.total_chunks, 0);
        assert_eq!(result.metadata["method_type"], json!("recursive"));
    }

    #[tokio::test]
    async fn test_inactive_method_rejected() {
        let mut method = ChunkingMethod::of_type(MethodType::Recursive);
        method.is_active = false;
        let err = producer().produce(&doc("text"), &method).await.unwrap_err();
        assert!(matches!(err, ChunkError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_run_metadata_records_tokenizer() {
        let method = ChunkingMethod::of_type(MethodType::Token);
        let result = producer().produce(&doc("a few words"), &method).await.unwrap();
        assert_eq!(result.metadata["tokenizer"], json!("heuristic"));
        assert_eq!(result.metadata["document_elements"], json!(1));
    }
}
