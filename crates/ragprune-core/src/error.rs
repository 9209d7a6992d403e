//! Error types for ragprune.

use thiserror::Error;

/// Main error type for ragprune operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Chunking failed
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkError),

    /// Pruning failed
    #[error("pruning error: {0}")]
    Pruning(#[from] PruneError),

    /// A capability call failed
    #[error("capability error: {0}")]
    Capability(#[from] CapabilityError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Chunking errors.
///
/// Configuration errors are raised immediately; an empty document is a valid
/// degenerate input and never produces an error.
#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unknown chunking method: {0}")]
    UnknownMethod(String),

    #[error("chunking failed: {0}")]
    Failed(String),
}

/// Pruning errors.
///
/// Only configuration problems surface here. Capability failures during a
/// pruning stage are absorbed into a partial result instead.
#[derive(Error, Debug)]
pub enum PruneError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unknown pruning method: {0}")]
    UnknownMethod(String),
}

/// Failures returned by capability implementations (scorer, compressor).
///
/// These are returned, not thrown: callers branch on them, which is what lets
/// the pruning engine fall back to a best-effort partial result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("capability call failed: {0}")]
    Failed(String),

    #[error("capability call timed out after {0} ms")]
    Timeout(u64),
}

/// Result type alias for ragprune operations.
pub type Result<T> = std::result::Result<T, Error>;
