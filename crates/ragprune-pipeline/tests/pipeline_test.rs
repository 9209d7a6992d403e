//! End-to-end tests over a small corpus of realistic documents.

use std::sync::Arc;

use ragprune_capability::{
    ExtractiveCompressor, FailingCompressor, FailingScorer, HeuristicTokenizer, KeywordScorer,
};
use ragprune_chunker::{ChunkProducer, StrategyRegistry};
use ragprune_core::{
    Document, ElementType, Metadata, MethodType, ParsedDocument, PruningMethod, StructuralElement,
};
use ragprune_engine::{PruningConfig, PruningEngine};
use ragprune_pipeline::{ContextAwareChunker, ContextChunkingConfig, MethodCatalog};
use serde_json::json;

fn producer() -> ChunkProducer {
    let registry =
        StrategyRegistry::with_defaults(Arc::new(HeuristicTokenizer), Arc::new(KeywordScorer));
    ChunkProducer::new(registry, Arc::new(HeuristicTokenizer))
}

fn engine() -> PruningEngine {
    PruningEngine::new(Arc::new(KeywordScorer), Arc::new(ExtractiveCompressor))
}

fn chunker() -> ContextAwareChunker {
    ContextAwareChunker::new(producer(), engine())
}

/// A parsed annual report with the element variety the strategies care about.
fn sample_report() -> ParsedDocument {
    let mut offset = 0;
    let mut elements = Vec::new();
    let mut push = |content: &str, element_type: ElementType| {
        elements.push(StructuralElement::new(
            content,
            element_type,
            offset,
            offset + content.len(),
        ));
        offset += content.len() + 2;
    };

    push("Annual Report 2025", ElementType::Header);
    push(
        "Financial performance improved across every segment. Revenue grew twelve percent \
         on subscription strength and services demand stayed firm.",
        ElementType::Text,
    );
    push("Consolidated Balance Sheet", ElementType::Header);
    push(
        "Total assets reached $48.2M while liabilities held at $11.9M. Equity improved accordingly.",
        ElementType::Text,
    );
    push(
        "Assets | 48.2 | 41.0\nLiabilities | 11.9 | 12.3\nEquity | 36.3 | 28.7",
        ElementType::Table,
    );
    push("", ElementType::PageBreak);
    push("Outlook", ElementType::Header);
    push(
        "Management expects continued growth. Hiring will concentrate on the services division.",
        ElementType::Text,
    );

    let mut metadata = Metadata::new();
    metadata.insert("document_type".to_string(), json!("financial_report"));
    ParsedDocument::new(String::new(), elements).with_metadata(metadata)
}

/// Five documents of distinct types with graded relevance to a financial query.
fn corpus() -> Vec<Document> {
    let mk = |content: &str, doc_type: &str| {
        let mut metadata = Metadata::new();
        metadata.insert("document_type".to_string(), json!(doc_type));
        Document::new(content, metadata)
    };
    vec![
        mk(
            "Financial performance improved and revenue grew twelve percent this year.",
            "financial_report",
        ),
        mk(
            "Financial approvals require manager sign off and performance reviews run twice yearly.",
            "policy",
        ),
        mk("The deployment pipeline builds container images nightly.", "technical"),
        mk("Brand awareness campaigns reached two million viewers.", "marketing"),
        mk("The agreement includes a mutual indemnification clause.", "legal"),
    ]
}

const QUERY: &str = "financial performance and revenue";

// ============================================================================
// Chunking
// ============================================================================

#[tokio::test]
async fn test_every_catalog_method_chunks_the_report() {
    let catalog = MethodCatalog::builtin();
    let producer = producer();
    let document = sample_report();

    for method_type in MethodType::ALL {
        let method = catalog.get_by_type(method_type).unwrap();
        let result = producer.produce(&document, method).await.unwrap();

        assert!(result.total_chunks > 0, "{method_type} produced no chunks");
        assert_eq!(result.total_chunks, result.chunks.len());
        for (i, chunk) in result.chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i as u32);
            assert!(!chunk.content.is_empty());
            assert!(chunk.token_count > 0);
            assert!(chunk.end_position >= chunk.start_position);
            assert_eq!(chunk.metadata["document_type"], json!("financial_report"));
        }
    }
}

#[tokio::test]
async fn test_empty_document_is_empty_for_every_method() {
    let catalog = MethodCatalog::builtin();
    let producer = producer();
    let document = ParsedDocument::new(String::new(), Vec::new());

    for method_type in MethodType::ALL {
        let method = catalog.get_by_type(method_type).unwrap();
        let result = producer.produce(&document, method).await.unwrap();
        assert_eq!(result.total_chunks, 0, "{method_type} invented chunks");
    }
}

#[tokio::test]
async fn test_financial_method_keeps_the_table_whole() {
    let catalog = MethodCatalog::builtin();
    let method = catalog.get_by_type(MethodType::Financial).unwrap();
    let result = producer().produce(&sample_report(), method).await.unwrap();

    let tables: Vec<_> = result
        .chunks
        .iter()
        .filter(|c| c.metadata.get("chunking_method") == Some(&json!("financial_table")))
        .collect();
    assert_eq!(tables.len(), 1);
    assert!(tables[0].content.contains("Liabilities"));
    assert_eq!(tables[0].metadata["section_type"], json!("balance_sheet"));
}

// ============================================================================
// Pruning
// ============================================================================

#[tokio::test]
async fn test_tighter_threshold_keeps_strictly_fewer() {
    let engine = engine();

    let loose = PruningConfig {
        similarity_threshold: 0.6,
        ..PruningConfig::default()
    };
    let tight = PruningConfig {
        similarity_threshold: 0.8,
        ..PruningConfig::default()
    };

    let kept_loose = engine
        .prune(corpus(), QUERY, PruningMethod::RelevanceFilter, &loose)
        .await
        .unwrap();
    let kept_tight = engine
        .prune(corpus(), QUERY, PruningMethod::RelevanceFilter, &tight)
        .await
        .unwrap();

    // The policy document shares three of four query terms, the report all four.
    assert_eq!(kept_loose.pruned_count, 2);
    assert_eq!(kept_tight.pruned_count, 1);
    assert_eq!(
        kept_tight.items[0].metadata["document_type"],
        json!("financial_report")
    );
}

#[tokio::test]
async fn test_top_k_caps_and_preserves_order() {
    let config = PruningConfig {
        similarity_threshold: 0.0,
        top_k: Some(3),
        ..PruningConfig::default()
    };
    let result = engine()
        .prune(corpus(), QUERY, PruningMethod::RelevanceFilter, &config)
        .await
        .unwrap();

    assert_eq!(result.pruned_count, 3);
    let positions: Vec<&str> = result
        .items
        .iter()
        .map(|d| d.metadata["document_type"].as_str().unwrap())
        .collect();
    // Survivors come back in corpus order, not score order.
    assert_eq!(positions[0], "financial_report");
    assert_eq!(positions[1], "policy");
}

#[tokio::test]
async fn test_hybrid_step_counts_chain() {
    let mut filters = Metadata::new();
    filters.insert("document_type".to_string(), json!("financial_report"));
    let config = PruningConfig {
        metadata_filters: filters,
        similarity_threshold: 0.5,
        use_llm_compression: true,
        ..PruningConfig::default()
    };

    let result = engine()
        .prune(corpus(), QUERY, PruningMethod::Hybrid, &config)
        .await
        .unwrap();

    assert_eq!(result.steps.len(), 3);
    assert_eq!(result.steps[0].original_count, 5);
    for pair in result.steps.windows(2) {
        assert_eq!(pair[0].pruned_count, pair[1].original_count);
    }
    assert_eq!(result.pruned_count, result.steps.last().unwrap().pruned_count);
    assert!(!result.partial);
}

#[tokio::test]
async fn test_failing_scorer_yields_partial_not_error() {
    let engine = PruningEngine::new(Arc::new(FailingScorer), Arc::new(ExtractiveCompressor));
    let result = engine
        .prune(corpus(), QUERY, PruningMethod::Hybrid, &PruningConfig::default())
        .await
        .unwrap();

    assert!(result.partial);
    // The metadata stage (empty filters) ran; relevance did not.
    assert_eq!(result.steps.len(), 1);
    assert_eq!(result.steps[0].step, "metadata_filter");
    assert_eq!(result.pruned_count, 5);
}

#[tokio::test]
async fn test_failing_compressor_keeps_filtered_set() {
    let engine = PruningEngine::new(Arc::new(KeywordScorer), Arc::new(FailingCompressor));
    let config = PruningConfig {
        similarity_threshold: 0.6,
        use_llm_compression: true,
        ..PruningConfig::default()
    };
    let result = engine
        .prune(corpus(), QUERY, PruningMethod::Hybrid, &config)
        .await
        .unwrap();

    assert!(result.partial);
    assert_eq!(result.pruned_count, 2);
    for item in &result.items {
        assert!(item.metadata.get("compressed").is_none());
    }
}

// ============================================================================
// Context-aware chunking
// ============================================================================

#[tokio::test]
async fn test_chunk_then_prune_end_to_end() {
    let catalog = MethodCatalog::builtin();
    let mut method = catalog.get_by_type(MethodType::Sentence).unwrap().clone();
    method.parameters.insert("chunk_size".to_string(), json!(80));
    method.parameters.insert("chunk_overlap".to_string(), json!(0));

    let config = ContextChunkingConfig {
        method,
        enable_pruning: true,
        pruning_method: PruningMethod::RelevanceFilter,
        pruning: PruningConfig {
            similarity_threshold: 0.4,
            ..PruningConfig::default()
        },
    };

    let result = chunker()
        .chunk(&sample_report(), &config, QUERY)
        .await
        .unwrap();

    assert!(result.total_chunks > 0);
    assert_eq!(result.metadata["enable_pruning"], json!(true));
    assert!(result.metadata["compression_ratio"].as_f64().unwrap() <= 1.0);
    for chunk in &result.chunks {
        assert!(chunk.metadata["relevance_score"].as_f64().unwrap() >= 0.4);
    }
}

#[tokio::test]
async fn test_high_quality_preset_compresses_survivors() {
    let config = ContextChunkingConfig {
        method: MethodCatalog::builtin()
            .get_by_type(MethodType::Recursive)
            .unwrap()
            .clone(),
        enable_pruning: true,
        pruning_method: PruningMethod::Hybrid,
        pruning: PruningConfig {
            similarity_threshold: 0.4,
            ..PruningConfig::high_quality()
        },
    };

    let result = chunker()
        .chunk(&sample_report(), &config, QUERY)
        .await
        .unwrap();

    for chunk in &result.chunks {
        assert_eq!(chunk.metadata["compressed"], json!(true));
    }
}

#[tokio::test]
async fn test_partial_pruning_surfaces_in_run_metadata() {
    let registry =
        StrategyRegistry::with_defaults(Arc::new(HeuristicTokenizer), Arc::new(KeywordScorer));
    let producer = ChunkProducer::new(registry, Arc::new(HeuristicTokenizer));
    let engine = PruningEngine::new(Arc::new(FailingScorer), Arc::new(ExtractiveCompressor));
    let chunker = ContextAwareChunker::new(producer, engine);

    let config = ContextChunkingConfig {
        pruning_method: PruningMethod::RelevanceFilter,
        ..ContextChunkingConfig::default()
    };
    let result = chunker
        .chunk(&sample_report(), &config, QUERY)
        .await
        .unwrap();

    // Chunks survive untouched and the run is flagged.
    assert!(result.total_chunks > 0);
    assert_eq!(result.metadata["pruning_partial"], json!(true));
}
