//! Core types for ragprune.
//!
//! This module contains all shared data structures used across ragprune:
//!
//! ## Structural Document Model
//! - [`StructuralElement`]: one typed element with a positional span
//! - [`ParsedDocument`]: ordered element sequence produced by an external parser
//! - [`Document`]: a bare `(content, metadata)` item for standalone pruning
//!
//! ## Chunking
//! - [`Chunk`]: a bounded text fragment with type and token count
//! - [`ChunkPiece`]: strategy output before the producer finalizes it
//! - [`ChunkingResult`]: chunks plus aggregate stats
//! - [`ChunkingMethod`] / [`MethodType`]: strategy configuration records
//!
//! ## Pruning
//! - [`PruningResult`]: surviving items plus compression metrics
//! - [`PruningStep`]: one auditable entry in the pipeline step trace
//! - [`PruningMethod`]: the supported pruning methods

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{ChunkError, PruneError};

/// Free-form metadata attached to documents, chunks and results.
pub type Metadata = HashMap<String, serde_json::Value>;

/// Strategy parameter mapping, as stored on a [`ChunkingMethod`].
pub type ParamMap = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// Structural Document Model
// ============================================================================

/// Type of a parsed document element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Header,
    Text,
    Table,
    List,
    Figure,
    PageBreak,
}

impl ElementType {
    /// Stable string form, used in metadata and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Text => "text",
            Self::Table => "table",
            Self::List => "list",
            Self::Figure => "figure",
            Self::PageBreak => "page_break",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed element of a parsed document.
///
/// Spans are offsets into the source document; elements are immutable once
/// produced by the parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralElement {
    /// Element text content
    pub content: String,
    /// Element type classification
    pub element_type: ElementType,
    /// Start offset in the source document
    pub start_position: usize,
    /// End offset in the source document (`>= start_position`)
    pub end_position: usize,
}

impl StructuralElement {
    /// Create a new element.
    #[must_use]
    pub fn new(
        content: impl Into<String>,
        element_type: ElementType,
        start_position: usize,
        end_position: usize,
    ) -> Self {
        Self {
            content: content.into(),
            element_type,
            start_position,
            end_position,
        }
    }
}

/// A fully parsed document: full text plus its ordered element sequence.
///
/// Owned by the caller; the chunking core only reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Full document text
    pub content: String,
    /// Elements in document order, spans non-decreasing
    pub elements: Vec<StructuralElement>,
    /// Document-level metadata, inherited by every produced chunk
    pub metadata: Metadata,
}

impl ParsedDocument {
    /// Create a document from its parts.
    #[must_use]
    pub fn new(content: impl Into<String>, elements: Vec<StructuralElement>) -> Self {
        Self {
            content: content.into(),
            elements,
            metadata: Metadata::new(),
        }
    }

    /// Attach document-level metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// All elements of a specific type, in document order.
    pub fn elements_by_type(&self, element_type: ElementType) -> Vec<&StructuralElement> {
        self.elements
            .iter()
            .filter(|e| e.element_type == element_type)
            .collect()
    }
}

/// A bare scorable text item for standalone pruning over raw documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document content
    pub content: String,
    /// Document metadata
    pub metadata: Metadata,
}

impl Document {
    /// Create a document with metadata.
    #[must_use]
    pub fn new(content: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}

// ============================================================================
// Chunks
// ============================================================================

/// Type of a chunk, derived from its contributing elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    Text,
    Header,
    /// A header bound to its descendant content
    #[serde(rename = "header+text")]
    HeaderText,
    Table,
    List,
    Mixed,
}

impl ChunkType {
    /// Stable string form, used in metadata and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Header => "header",
            Self::HeaderText => "header+text",
            Self::Table => "table",
            Self::List => "list",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bounded text fragment produced from a document.
///
/// Chunks are produced fresh per run and never mutated afterwards, except to
/// attach pruning annotations to `metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk identifier
    pub id: Uuid,
    /// Chunk content, never empty
    pub content: String,
    /// Type derived from contributing elements
    pub chunk_type: ChunkType,
    /// Position in the produced sequence (0-indexed)
    pub chunk_index: u32,
    /// Start offset in the source document
    pub start_position: usize,
    /// End offset in the source document
    pub end_position: usize,
    /// Token count per the producer's declared tokenizer
    pub token_count: usize,
    /// Provenance and pruning annotations
    pub metadata: Metadata,
}

/// Strategy output before the producer assigns identity, index, token count
/// and inherited document metadata.
#[derive(Debug, Clone)]
pub struct ChunkPiece {
    /// Chunk content
    pub content: String,
    /// Type derived from contributing elements
    pub chunk_type: ChunkType,
    /// Start offset in the source document
    pub start_position: usize,
    /// End offset in the source document
    pub end_position: usize,
    /// Strategy-specific metadata
    pub metadata: Metadata,
}

/// Result of one chunking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingResult {
    /// Produced chunks, in document order
    pub chunks: Vec<Chunk>,
    /// Always equals `chunks.len()`
    pub total_chunks: usize,
    /// Wall-clock seconds spent producing (and optionally pruning) chunks
    pub processing_time: f64,
    /// Run-level metadata (method, tokenizer, pruning stats when invoked)
    pub metadata: Metadata,
}

impl ChunkingResult {
    /// An empty result; "no content" is a valid degenerate outcome, not a fault.
    #[must_use]
    pub fn empty(metadata: Metadata) -> Self {
        Self {
            chunks: Vec::new(),
            total_chunks: 0,
            processing_time: 0.0,
            metadata,
        }
    }
}

// ============================================================================
// Chunking configuration
// ============================================================================

/// The fixed catalogue of chunking strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodType {
    Unstructured,
    Llamaparse,
    Hierarchical,
    Semantic,
    Financial,
    Recursive,
    Sentence,
    Token,
}

impl MethodType {
    /// Every supported method type, in catalogue order.
    pub const ALL: [MethodType; 8] = [
        MethodType::Unstructured,
        MethodType::Llamaparse,
        MethodType::Hierarchical,
        MethodType::Semantic,
        MethodType::Financial,
        MethodType::Recursive,
        MethodType::Sentence,
        MethodType::Token,
    ];

    /// Stable string form, used in configuration records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unstructured => "unstructured",
            Self::Llamaparse => "llamaparse",
            Self::Hierarchical => "hierarchical",
            Self::Semantic => "semantic",
            Self::Financial => "financial",
            Self::Recursive => "recursive",
            Self::Sentence => "sentence",
            Self::Token => "token",
        }
    }
}

impl fmt::Display for MethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodType {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ChunkError::UnknownMethod(s.to_string()))
    }
}

/// A named chunking strategy configuration record.
///
/// This is configuration data, not behavior; behavior is selected by
/// `method_type` through the strategy registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingMethod {
    /// Human-readable name
    pub name: String,
    /// Strategy selector
    pub method_type: MethodType,
    /// What this method is for
    pub description: String,
    /// Strategy parameters; unknown keys are ignored, missing keys use defaults
    pub parameters: ParamMap,
    /// Whether the method is available for selection
    pub is_active: bool,
}

impl ChunkingMethod {
    /// A method with default parameters for the given type.
    #[must_use]
    pub fn of_type(method_type: MethodType) -> Self {
        Self {
            name: method_type.as_str().to_string(),
            method_type,
            description: String::new(),
            parameters: ParamMap::new(),
            is_active: true,
        }
    }
}

// ============================================================================
// Pruning
// ============================================================================

/// The supported pruning methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PruningMethod {
    MetadataFilter,
    RelevanceFilter,
    LlmCompression,
    Hybrid,
}

impl PruningMethod {
    /// Stable string form, used in step traces and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MetadataFilter => "metadata_filter",
            Self::RelevanceFilter => "relevance_filter",
            Self::LlmCompression => "llm_compression",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for PruningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PruningMethod {
    type Err = PruneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metadata_filter" => Ok(Self::MetadataFilter),
            "relevance_filter" => Ok(Self::RelevanceFilter),
            "llm_compression" => Ok(Self::LlmCompression),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(PruneError::UnknownMethod(other.to_string())),
        }
    }
}

/// One auditable entry in a pruning pipeline's step trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruningStep {
    /// Stage name
    pub step: String,
    /// Item count entering the stage
    pub original_count: usize,
    /// Item count surviving the stage
    pub pruned_count: usize,
}

/// Result of one pruning operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruningResult<T> {
    /// Surviving items, in original relative order
    pub items: Vec<T>,
    /// Item count before pruning
    pub original_count: usize,
    /// Item count after pruning (`<= original_count`)
    pub pruned_count: usize,
    /// Surviving fraction: `pruned_count / original_count`, `1.0` for empty input
    pub compression_ratio: f64,
    /// Wall-clock seconds spent pruning
    pub processing_time: f64,
    /// The method that produced this result
    pub method: PruningMethod,
    /// Ordered step trace, one entry per executed stage
    pub steps: Vec<PruningStep>,
    /// True when a capability failure cut the pipeline short
    pub partial: bool,
    /// Method-specific metadata (query, thresholds, scores)
    pub metadata: Metadata,
}

impl<T> PruningResult<T> {
    /// The reduction fraction, `1.0 - compression_ratio`.
    #[must_use]
    pub fn reduction(&self) -> f64 {
        1.0 - self.compression_ratio
    }
}

// ============================================================================
// Context items
// ============================================================================

use crate::traits::ContextItem;

impl ContextItem for Chunk {
    fn content(&self) -> &str {
        &self.content
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn set_content(&mut self, content: String) {
        self.content = content;
    }

    fn annotate(&mut self, key: &str, value: serde_json::Value) {
        self.metadata.insert(key.to_string(), value);
    }
}

impl ContextItem for Document {
    fn content(&self) -> &str {
        &self.content
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn set_content(&mut self, content: String) {
        self.content = content;
    }

    fn annotate(&mut self, key: &str, value: serde_json::Value) {
        self.metadata.insert(key.to_string(), value);
    }
}
