//! Joining compatible meshes
//!
//! Meshes that share their textures, rendering flags and animation length can
//! be drawn as one. Each group of compatible meshes is folded left to right
//! into a running base mesh; when the next mesh would push the base past the
//! 16-bit index ceiling of the runtime, it becomes the new base instead.

use crate::ModelOptimizer;
use g3dkit_core::{Mesh, MeshFlags, Model};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Highest vertex index a 16-bit index buffer can address
pub const MAX_INDEX_16: u32 = 0xFFFF;

/// Configuration for joining meshes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOptions {
    /// Ceiling on a joined mesh's index count and highest vertex index
    pub max_index: u32,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            max_index: MAX_INDEX_16,
        }
    }
}

impl JoinOptions {
    pub fn with_max_index(mut self, max_index: u32) -> Self {
        self.max_index = max_index;
        self
    }
}

/// What a join pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSummary {
    pub meshes_before: usize,
    pub meshes_after: usize,
    /// Meshes absorbed into an earlier mesh
    pub merged: usize,
    /// Compatible meshes left separate because of the index ceiling
    pub split_at_limit: usize,
}

/// Everything two meshes must agree on to be joined
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct JoinKey {
    textures: Vec<(usize, String)>,
    frame_count: usize,
    flags: MeshFlags,
    tex_coord_frames: usize,
}

impl JoinKey {
    fn of(mesh: &Mesh) -> Self {
        Self {
            textures: mesh
                .textures
                .iter()
                .map(|(slot, name)| (slot, name.as_str().to_owned()))
                .collect(),
            frame_count: mesh.frame_count(),
            flags: mesh.flags,
            tex_coord_frames: mesh.tex_coords.len(),
        }
    }
}

/// Whether `candidate` can be appended to `base` without crossing the ceiling
fn fits(base: &Mesh, candidate: &Mesh, options: &JoinOptions) -> bool {
    let limit = options.max_index as usize;
    base.index_count() + candidate.index_count() <= limit
        && base.vertex_count + candidate.vertex_count <= limit + 1
}

/// Append `candidate`'s geometry to `base`, offsetting its indices
fn absorb(base: &mut Mesh, candidate: Mesh) {
    let offset = base.vertex_count as u32;
    for (frame, other) in base.frames.iter_mut().zip(candidate.frames) {
        frame.vertices.extend(other.vertices);
        frame.normals.extend(other.normals);
    }
    for (coords, other) in base.tex_coords.iter_mut().zip(candidate.tex_coords) {
        coords.extend(other);
    }
    base.indices.extend(candidate.indices.iter().map(|&i| i + offset));
    base.vertex_count += candidate.vertex_count;
}

fn join_with_summary(meshes: Vec<Mesh>, options: &JoinOptions) -> (Vec<Mesh>, JoinSummary) {
    let mut summary = JoinSummary {
        meshes_before: meshes.len(),
        ..JoinSummary::default()
    };

    let mut out: Vec<Mesh> = Vec::with_capacity(meshes.len());
    // current base of each compatibility group, as a position in `out`
    let mut bases: HashMap<JoinKey, usize> = HashMap::new();

    for mesh in meshes {
        let key = JoinKey::of(&mesh);
        match bases.get(&key) {
            Some(&base) if fits(&out[base], &mesh, options) => {
                tracing::debug!(
                    "joining {:?} into {:?}",
                    mesh.display_name(),
                    out[base].display_name()
                );
                absorb(&mut out[base], mesh);
                summary.merged += 1;
            }
            Some(&base) => {
                tracing::info!(
                    "{:?} would take {:?} past index {}, starting a new mesh",
                    mesh.display_name(),
                    out[base].display_name(),
                    options.max_index
                );
                summary.split_at_limit += 1;
                bases.insert(key, out.len());
                out.push(mesh);
            }
            None => {
                bases.insert(key, out.len());
                out.push(mesh);
            }
        }
    }

    summary.meshes_after = out.len();
    (out, summary)
}

/// Join compatible meshes, keeping survivors in their original order
pub fn join_compatible_meshes(meshes: Vec<Mesh>, options: &JoinOptions) -> Vec<Mesh> {
    join_with_summary(meshes, options).0
}

/// Join the meshes of a model in place
pub fn join_model(model: &mut Model, options: &JoinOptions) -> JoinSummary {
    let meshes = std::mem::take(&mut model.meshes);
    let (meshes, summary) = join_with_summary(meshes, options);
    model.meshes = meshes;
    if summary.merged > 0 {
        tracing::info!("joined {} meshes into {}", summary.meshes_before, summary.meshes_after);
    }
    summary
}

impl ModelOptimizer for JoinOptions {
    type Summary = JoinSummary;

    fn optimize(&self, model: &mut Model) -> JoinSummary {
        join_model(model, self)
    }
}
