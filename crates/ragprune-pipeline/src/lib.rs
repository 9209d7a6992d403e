//! Context-aware chunking: chunk production followed by query pruning.
//!
//! [`ContextAwareChunker`] glues the strategy-driven chunk producer to the
//! pruning engine, so a caller with a document and a query gets back only the
//! chunks worth putting in front of a model. [`MethodCatalog`] carries the
//! built-in chunking method configurations.

pub mod catalog;
pub mod context;

pub use catalog::{MethodCatalog, CATALOG_VERSION};
pub use context::{ContextAwareChunker, ContextChunkingConfig};
