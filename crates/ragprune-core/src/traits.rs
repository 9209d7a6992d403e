//! Core traits for ragprune components.
//!
//! Two families live here:
//!
//! - **Capabilities** ([`RelevanceScorer`], [`Compressor`], [`Tokenizer`]):
//!   injected external operations the pipeline consumes but does not
//!   implement. Failures are returned as [`CapabilityError`] values so the
//!   engine's control flow stays branch-based.
//! - **Seams** ([`ChunkStrategy`], [`ContextItem`]): the pluggable strategy
//!   contract and the "has content and metadata" capability the pruning
//!   engine is polymorphic over.

use async_trait::async_trait;

use crate::error::{CapabilityError, ChunkError};
use crate::types::{ChunkPiece, MethodType, Metadata, ParamMap, ParsedDocument};

// ============================================================================
// Capabilities
// ============================================================================

/// Semantic similarity scoring between a query and a text.
///
/// Implementations must return scores in `[0, 1]` and honor the caller's
/// deadline; the pruning engine additionally bounds each call with its own
/// timeout.
#[async_trait]
pub trait RelevanceScorer: Send + Sync {
    /// Identifier of the underlying model, used for cache keying.
    fn model_id(&self) -> &str;

    /// Score the relevance of `text` to `query`.
    async fn score(&self, query: &str, text: &str) -> Result<f32, CapabilityError>;
}

/// Generative compression of a text with respect to a query.
#[async_trait]
pub trait Compressor: Send + Sync {
    /// Identifier of the underlying model.
    fn model_id(&self) -> &str;

    /// Compress `text`, keeping only what is relevant to `query`.
    async fn compress(&self, query: &str, text: &str) -> Result<String, CapabilityError>;
}

/// Token counting for a declared tokenizer.
///
/// Counting is pure and infallible; every chunk's `token_count` must be
/// reproducible from its content through the producer's tokenizer.
pub trait Tokenizer: Send + Sync {
    /// Tokenizer identifier (e.g. `"cl100k_base"`, `"heuristic"`).
    fn id(&self) -> &str;

    /// Number of tokens in `text`.
    fn count_tokens(&self, text: &str) -> usize;
}

// ============================================================================
// Chunking strategy
// ============================================================================

/// A chunking strategy: split a parsed document into an ordered piece
/// sequence.
///
/// Strategies validate their own parameters (`chunk_overlap >= chunk_size` is
/// a configuration error) and never emit an empty piece. A document with no
/// elements yields an empty sequence, not an error.
#[async_trait]
pub trait ChunkStrategy: Send + Sync {
    /// Strategy name, matching `method_type().as_str()`.
    fn name(&self) -> &str;

    /// The method type this strategy implements.
    fn method_type(&self) -> MethodType;

    /// Split the document according to `params`.
    ///
    /// Unknown parameter keys are ignored; missing keys use the strategy's
    /// documented defaults.
    async fn split(
        &self,
        document: &ParsedDocument,
        params: &ParamMap,
    ) -> Result<Vec<ChunkPiece>, ChunkError>;
}

impl std::fmt::Debug for dyn ChunkStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkStrategy")
            .field("name", &self.name())
            .finish()
    }
}

// ============================================================================
// Context items
// ============================================================================

/// Anything the pruning engine can filter, score and compress.
///
/// Implemented by `Chunk` and `Document`; the engine is generic over this
/// capability rather than over concrete item types.
pub trait ContextItem: Clone + Send + Sync {
    /// The item's text content.
    fn content(&self) -> &str;

    /// The item's metadata.
    fn metadata(&self) -> &Metadata;

    /// Replace the item's content (used by generative compression).
    fn set_content(&mut self, content: String);

    /// Attach a pruning annotation.
    fn annotate(&mut self, key: &str, value: serde_json::Value);
}
