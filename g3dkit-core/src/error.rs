//! Error types for g3dkit

use thiserror::Error;

/// Main error type for g3dkit model validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("mesh {mesh}: index count {index_count} is not a multiple of 3")]
    IncompleteTriangles { mesh: usize, index_count: usize },

    #[error("mesh {mesh}: index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: usize,
        position: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("mesh {mesh}: has {found} frames, expected {expected}")]
    FrameCountMismatch {
        mesh: usize,
        expected: usize,
        found: usize,
    },
}

/// Result type alias for g3dkit operations
pub type Result<T> = std::result::Result<T, Error>;
