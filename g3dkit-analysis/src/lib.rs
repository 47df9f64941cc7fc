//! # g3dkit analysis
//!
//! Analysis passes over morph-animated meshes.
//!
//! The rigidity analysis partitions a mesh's triangles into rigid bodies whose
//! geometry never deforms across the animation, which is what a compressor
//! needs to replace per-frame vertex data with one transform per frame. The
//! mutability scan is the cheaper per-frame view of the same question.

pub mod rigidity;
pub mod mutability;

// Re-export commonly used items
pub use rigidity::*;
pub use mutability::*;
