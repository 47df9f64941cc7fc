//! Core data structures for g3dkit
//!
//! This crate provides the in-memory shape of a G3D model: models, meshes,
//! animation frames, fixed-width names, texture slots and the texture
//! registry used while loading models from disk.

pub mod point;
pub mod name;
pub mod mesh;
pub mod model;
pub mod traits;
pub mod texture;
pub mod error;

pub use point::*;
pub use name::*;
pub use mesh::*;
pub use model::*;
pub use traits::*;
pub use texture::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
