//! Error types for G3D decoding, encoding and file access

use std::path::PathBuf;
use thiserror::Error;

/// The bytes are not a G3D file this codec understands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("bad magic {found:?}, expected \"G3D\"")]
    BadMagic { found: [u8; 3] },

    #[error("unsupported G3D version {0}")]
    UnsupportedVersion(u8),

    #[error("mesh subtype {0} is not a morph mesh")]
    NotMorphMesh(u8),
}

/// Errors that can occur while decoding a G3D buffer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("truncated input: {field} at byte {offset} needs {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        field: &'static str,
        needed: usize,
        available: usize,
    },

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

    #[error("Invalid data: {0}")]
    Invalid(String),
}

impl From<g3dkit_core::Error> for DecodeError {
    fn from(e: g3dkit_core::Error) -> Self {
        use g3dkit_core::Error;
        match e {
            Error::IncompleteTriangles { mesh, index_count } => {
                DecodeError::IncompleteTriangles { mesh, index_count }
            }
            Error::IndexOutOfRange {
                mesh,
                position,
                index,
                vertex_count,
            } => DecodeError::IndexOutOfRange {
                mesh,
                position,
                index,
                vertex_count,
            },
            Error::FrameCountMismatch {
                mesh,
                expected,
                found,
            } => DecodeError::FrameCountMismatch {
                mesh,
                expected,
                found,
            },
            Error::InvalidData(message) => DecodeError::Invalid(message),
        }
    }
}

/// Errors that can occur while encoding a model
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("mesh {mesh}: texture name in slot {slot} is {len} bytes, the limit is 64")]
    TextureNameTooLong { mesh: usize, slot: usize, len: usize },

    #[error("mesh {mesh}: name is {len} bytes, the limit is 64")]
    MeshNameTooLong { mesh: usize, len: usize },

    #[error("{count} meshes do not fit the mesh count field (limit {limit})")]
    TooManyMeshes { count: usize, limit: usize },

    #[error("mesh {mesh}: {reason}")]
    InconsistentMesh { mesh: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when reading or writing model files
#[derive(Error, Debug)]
pub enum IoError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("{}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
