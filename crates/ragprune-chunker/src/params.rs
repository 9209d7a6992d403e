//! Strategy parameter handling.

use ragprune_core::{ChunkError, ParamMap};
use serde::de::DeserializeOwned;

/// Deserialize a typed parameter struct from a raw parameter map.
///
/// Unknown keys are ignored; missing keys fall back to the struct's serde
/// defaults. Type mismatches are configuration errors.
pub(crate) fn parse_params<P: DeserializeOwned>(params: &ParamMap) -> Result<P, ChunkError> {
    serde_json::from_value(serde_json::Value::Object(params.clone()))
        .map_err(|e| ChunkError::InvalidParameter(e.to_string()))
}

/// Validate a size/overlap window.
///
/// Every windowed strategy treats `chunk_overlap >= chunk_size` as a
/// configuration error: such a window could never advance.
pub(crate) fn validate_window(chunk_size: usize, chunk_overlap: usize) -> Result<(), ChunkError> {
    if chunk_size == 0 {
        return Err(ChunkError::InvalidParameter(
            "chunk_size must be greater than zero".to_string(),
        ));
    }
    if chunk_overlap >= chunk_size {
        return Err(ChunkError::InvalidParameter(format!(
            "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
        )));
    }
    Ok(())
}
