//! Model container and model-wide invariants

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::point::*;
use crate::traits::{Bounded, Bounds};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// G3D format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
    V3,
    V4,
}

impl Version {
    /// Parse the version byte of a file header
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            3 => Some(Version::V3),
            4 => Some(Version::V4),
            _ => None,
        }
    }

    /// The version byte written to a file header
    pub fn as_byte(self) -> u8 {
        match self {
            Version::V3 => 3,
            Version::V4 => 4,
        }
    }
}

/// Translation and uniform scale that centre a model and fit it in a unit view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Framing {
    pub translation: Vector3f,
    pub scale: f32,
}

/// A G3D model: an ordered list of meshes sharing one animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub version: Version,
    pub meshes: Vec<Mesh>,
    /// Bytes found after the last mesh record, written back verbatim
    pub trailing: Vec<u8>,
}

impl Model {
    /// Create an empty model
    pub fn new(version: Version) -> Self {
        Self {
            version,
            meshes: Vec::new(),
            trailing: Vec::new(),
        }
    }

    /// Create a model from meshes
    pub fn from_meshes(version: Version, meshes: Vec<Mesh>) -> Self {
        Self {
            version,
            meshes,
            trailing: Vec::new(),
        }
    }

    /// Get the number of meshes
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Animation frame count shared by all meshes, `None` for an empty model
    pub fn frame_count(&self) -> Option<usize> {
        self.meshes.first().map(Mesh::frame_count)
    }

    /// Total vertex slots per frame across all meshes
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertex_count).sum()
    }

    /// Total indices across all meshes
    pub fn index_count(&self) -> usize {
        self.meshes.iter().map(Mesh::index_count).sum()
    }

    /// Check that every mesh has the same number of frames as the first
    pub fn check_frame_counts(&self) -> Result<()> {
        let Some(expected) = self.frame_count() else {
            return Ok(());
        };
        for (mesh, m) in self.meshes.iter().enumerate().skip(1) {
            if m.frame_count() != expected {
                return Err(Error::FrameCountMismatch {
                    mesh,
                    expected,
                    found: m.frame_count(),
                });
            }
        }
        Ok(())
    }

    /// Check every mesh and the model-wide frame count invariant
    pub fn validate(&self) -> Result<()> {
        for (i, mesh) in self.meshes.iter().enumerate() {
            mesh.validate(i)?;
        }
        self.check_frame_counts()
    }

    /// Distinct texture names referenced by the model, in first-use order
    pub fn texture_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for mesh in &self.meshes {
            for (_, name) in mesh.textures.iter() {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
        }
        names
    }

    /// Rename every texture reference equal to `old`.
    ///
    /// Returns the number of meshes that changed.
    pub fn rename_texture(&mut self, old: &str, new: &str) -> usize {
        let mut changed = 0;
        for mesh in &mut self.meshes {
            let mut touched = false;
            for (_, name) in mesh.textures.iter_mut() {
                if name.as_str() == old {
                    name.set(new);
                    touched = true;
                }
            }
            if touched {
                tracing::info!("renaming {} to {} in {:?}", old, new, mesh.display_name());
                changed += 1;
            }
        }
        changed
    }

    /// Centring translation and `2 / diagonal` scale over every frame.
    ///
    /// Returns `None` if the model has no vertices. A model collapsed onto a
    /// single point keeps a scale of 1.
    pub fn framing(&self) -> Option<Framing> {
        let bounds = self.bounds()?;
        let diagonal = bounds.diagonal();
        let scale = if diagonal > 0.0 { 2.0 / diagonal } else { 1.0 };
        Some(Framing {
            translation: -bounds.center().coords,
            scale,
        })
    }

    /// One line for the model and one per mesh
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "G3D v{} has {} meshes",
            self.version.as_byte(),
            self.meshes.len()
        );
        for mesh in &self.meshes {
            let _ = writeln!(
                out,
                "\t{} has {} frames, {} vertices and {} indices",
                mesh.display_name(),
                mesh.frame_count(),
                mesh.vertex_count,
                mesh.index_count()
            );
        }
        out
    }
}

impl Bounded for Model {
    fn bounds(&self) -> Option<Bounds> {
        self.meshes
            .iter()
            .filter_map(Bounded::bounds)
            .reduce(|a, b| a.union(&b))
    }
}
