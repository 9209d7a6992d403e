//! Context pruning for ragprune.
//!
//! The [`PruningEngine`] reduces a list of context items against a query
//! before they reach a generation model. Four methods are supported:
//!
//! | Method             | What it does                                        |
//! |--------------------|-----------------------------------------------------|
//! | `metadata_filter`  | Keep items whose metadata matches exact filters     |
//! | `relevance_filter` | Keep items scoring above a similarity threshold     |
//! | `llm_compression`  | Rewrite surviving items to their query-relevant core|
//! | `hybrid`           | The above in sequence, each stage individually togglable |
//!
//! Capability failures never fail a prune outright: the engine returns the
//! best result it reached and marks it partial.

pub mod config;
pub mod engine;

pub use config::PruningConfig;
pub use engine::{pruning_stats, PruningEngine};
