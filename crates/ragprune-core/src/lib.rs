//! # ragprune-core
//!
//! Core types and traits for the ragprune document chunking and
//! context-pruning pipeline.
//!
//! This crate provides the foundational abstractions used throughout ragprune:
//!
//! - **Structural Document Model**: [`ParsedDocument`] and [`StructuralElement`],
//!   the immutable element sequence produced by an external parser
//! - **Chunking**: [`ChunkStrategy`] trait plus the [`Chunk`] / [`ChunkingResult`]
//!   records emitted by the chunk producer
//! - **Pruning**: [`ContextItem`] trait plus the [`PruningResult`] record emitted
//!   by the pruning engine
//! - **Capabilities**: [`RelevanceScorer`], [`Compressor`] and [`Tokenizer`],
//!   the injected external operations the pipeline consumes but never implements
//!
//! ## Architecture
//!
//! ```text
//! ParsedDocument → ChunkStrategy → Chunk* → (optional) pruning → Chunk*
//!                                              ↑
//!                       Document* ────────────┘ (standalone pruning)
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ParsedDocument`] | Ordered sequence of typed elements with spans |
//! | [`Chunk`] | A bounded text fragment with type and token count |
//! | [`ChunkingMethod`] | Named strategy configuration record |
//! | [`ChunkingResult`] | Chunks plus aggregate stats for one run |
//! | [`PruningResult`] | Surviving items plus compression metrics and step trace |
//!
//! ## Related Crates
//!
//! - `ragprune-chunker`: strategy registry and chunk producer
//! - `ragprune-engine`: context pruning engine
//! - `ragprune-capability`: injectable scorer/compressor/tokenizer implementations
//! - `ragprune-pipeline`: context-aware chunker composition and method catalog

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CapabilityError, ChunkError, Error, PruneError, Result};
pub use traits::*;
pub use types::*;
