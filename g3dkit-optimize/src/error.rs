//! Error types for optimization passes

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptimizeError {
    #[error("dedup report maps {found} vertices but the mesh has {expected}")]
    MappingMismatch { expected: usize, found: usize },

    #[error("vertex {vertex} maps to {target}, which is not a surviving vertex")]
    NonCanonicalTarget { vertex: usize, target: usize },
}

pub type Result<T> = std::result::Result<T, OptimizeError>;
