//! # ragprune-capability
//!
//! Injectable capability implementations for the ragprune pipeline.
//!
//! The chunking and pruning cores consume capabilities (relevance scoring,
//! generative compression, token counting) through the traits in
//! `ragprune-core`; this crate ships deterministic, offline implementations
//! of each, suitable as defaults and for testing:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`KeywordScorer`] | Lexical query-term overlap, deterministic and offline |
//! | [`NoopScorer`] | Constant score, for wiring tests |
//! | [`ExtractiveCompressor`] | Keeps sentences sharing a term with the query |
//! | [`NoopCompressor`] | Identity compression |
//! | [`HeuristicTokenizer`] | `ceil(chars / 4)` approximation |
//! | [`ScoreCache`] | Hash-keyed cache wrapping any [`RelevanceScorer`] |
//! | [`FailingScorer`] / [`FailingCompressor`] | Always fail, for partial-result tests |
//!
//! Model-backed implementations (sentence-transformer embeddings, LLM
//! extraction) live with the calling service; everything here is pure CPU.
//!
//! [`RelevanceScorer`]: ragprune_core::RelevanceScorer

pub mod cache;
pub mod compress;
pub mod failing;
pub mod score;
pub mod tokenize;

pub use cache::{CacheStats, ScoreCache};
pub use compress::{ExtractiveCompressor, NoopCompressor};
pub use failing::{FailingCompressor, FailingScorer};
pub use score::{KeywordScorer, NoopScorer};
pub use tokenize::HeuristicTokenizer;
