//! Mesh optimization passes for G3D models
//!
//! This crate provides passes that shrink a model without changing how it
//! renders:
//! - Joining meshes that share textures, flags and animation length
//! - Detecting and removing duplicate vertices

pub mod join;
pub mod dedup;
pub mod error;

pub use join::*;
pub use dedup::*;
pub use error::*;

use g3dkit_core::Model;

/// A pass that rewrites a model in place
pub trait ModelOptimizer {
    /// What the pass reports about the work it did
    type Summary;

    fn optimize(&self, model: &mut Model) -> Self::Summary;
}
