//! Error types for grid mesh generation.

use thiserror::Error;

/// Result type alias using MeshError.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors that can occur while validating inputs or building a mesh.
///
/// Every variant is detected before any output buffer is written, so a
/// failed build never leaves a partially assembled mesh behind.
#[derive(Debug, Error)]
pub enum MeshError {
    // === Input Errors ===
    #[error(
        "property array has {property_len} values, expected {node_count} (one per node) \
         or {cell_count} (one per cell)"
    )]
    ShapeMismatch {
        property_len: usize,
        node_count: usize,
        cell_count: usize,
    },

    #[error("height array has {height_len} values, expected {node_count} (one per node)")]
    HeightShapeMismatch { height_len: usize, node_count: usize },

    #[error("grid must have at least 2 nodes along each axis, got {nx} x {ny}")]
    EmptyGrid { nx: usize, ny: usize },

    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // === Worker Pool Errors ===
    #[error("mesh worker pool has been shut down")]
    PoolClosed,

    #[error("mesh worker failed: {0}")]
    WorkerFailed(String),
}

impl MeshError {
    /// Create an InvalidFrame error.
    pub fn invalid_frame(msg: impl Into<String>) -> Self {
        Self::InvalidFrame(msg.into())
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a WorkerFailed error.
    pub fn worker_failed(msg: impl Into<String>) -> Self {
        Self::WorkerFailed(msg.into())
    }

    /// Whether the error was caused by the caller's inputs rather than by
    /// the execution environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            MeshError::ShapeMismatch { .. }
                | MeshError::HeightShapeMismatch { .. }
                | MeshError::EmptyGrid { .. }
                | MeshError::InvalidFrame(_)
                | MeshError::InvalidConfig(_)
        )
    }
}

impl From<serde_json::Error> for MeshError {
    fn from(err: serde_json::Error) -> Self {
        MeshError::InvalidFrame(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let err = MeshError::ShapeMismatch {
            property_len: 5,
            node_count: 4,
            cell_count: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("5 values"));
        assert!(msg.contains("expected 4"));
        assert!(msg.contains("or 1"));
    }

    #[test]
    fn test_input_error_classification() {
        assert!(MeshError::EmptyGrid { nx: 1, ny: 3 }.is_input_error());
        assert!(MeshError::invalid_frame("dx must be > 0").is_input_error());
        assert!(!MeshError::PoolClosed.is_input_error());
        assert!(!MeshError::worker_failed("panic").is_input_error());
    }
}
