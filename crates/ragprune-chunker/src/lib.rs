//! Document chunking strategies for ragprune.
//!
//! Each strategy implements the `ChunkStrategy` trait from `ragprune-core`
//! with one splitting algorithm; the [`StrategyRegistry`] maps the closed
//! `MethodType` catalogue onto strategy instances, and the [`ChunkProducer`]
//! orchestrates a run: resolve, validate parameters, split, finalize chunks.

pub mod financial;
pub mod hierarchical;
pub mod producer;
pub mod recursive;
pub mod registry;
pub mod semantic;
pub mod sentence;
pub mod stream;
pub mod token;

mod params;
mod segment;

pub use financial::FinancialStrategy;
pub use hierarchical::HierarchicalStrategy;
pub use producer::ChunkProducer;
pub use recursive::RecursiveStrategy;
pub use registry::StrategyRegistry;
pub use semantic::SemanticStrategy;
pub use sentence::SentenceStrategy;
pub use stream::ElementStreamStrategy;
pub use token::TokenStrategy;
