//! Duplicate vertex detection and removal
//!
//! Two vertex slots are duplicates when they hold the same position and
//! normal in every frame and the same texture coordinates, after rounding to
//! a fixed number of decimals. Each class of duplicates collapses onto its
//! highest-numbered slot.

use crate::error::{OptimizeError, Result};
use crate::ModelOptimizer;
use g3dkit_core::{Mesh, Model};
use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Configuration for duplicate detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupOptions {
    /// Decimal places kept when comparing components
    pub decimals: u32,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self { decimals: 4 }
    }
}

impl DedupOptions {
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }
}

/// Duplicates found in one mesh
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupReport {
    /// Surviving slot for every vertex slot; survivors map to themselves
    pub mapping: Vec<usize>,
    /// Slots that map to another slot
    pub duplicate_vertices: usize,
    /// Triangles whose remapped vertex set was already seen
    pub duplicate_triangles: usize,
    /// Index entries that point at a non-surviving slot
    pub remapped_indices: usize,
    /// Slots no index refers to
    pub unused_vertices: usize,
}

impl DedupReport {
    /// Whether applying the report would change the mesh
    pub fn has_duplicates(&self) -> bool {
        self.duplicate_vertices > 0
    }

    /// Number of slots left after applying the report
    pub fn surviving_vertices(&self) -> usize {
        self.mapping.len() - self.duplicate_vertices
    }
}

/// Bits of the rounded component; NaN and out-of-range values stay distinct
fn quantize(value: f32, scale: f64) -> u64 {
    let rounded = (value as f64 * scale).round();
    if rounded == 0.0 {
        0.0f64.to_bits()
    } else {
        rounded.to_bits()
    }
}

/// Rounded components identifying a vertex slot
fn vertex_key(mesh: &Mesh, v: usize, scale: f64) -> Vec<u64> {
    let mut key = Vec::with_capacity(mesh.frame_count() * 6 + mesh.tex_coords.len() * 2);
    for frame in &mesh.frames {
        let (p, n) = (frame.vertices[v], frame.normals[v]);
        key.extend([p.x, p.y, p.z, n.x, n.y, n.z].map(|c| quantize(c, scale)));
    }
    for coords in &mesh.tex_coords {
        key.extend(coords[v].map(|c| quantize(c, scale)));
    }
    key
}

/// Find duplicate vertices and the triangles they make redundant
pub fn deduplicate_vertices(mesh: &Mesh, options: &DedupOptions) -> DedupReport {
    let scale = 10f64.powi(options.decimals as i32);

    let keys: Vec<Vec<u64>> = (0..mesh.vertex_count).map(|v| vertex_key(mesh, v, scale)).collect();
    // later slots overwrite earlier ones, so each key ends on its highest slot
    let survivor: HashMap<&[u64], usize> = keys.iter().enumerate().map(|(v, k)| (k.as_slice(), v)).collect();
    let mapping: Vec<usize> = keys.iter().map(|k| survivor[k.as_slice()]).collect();

    let duplicate_vertices = mapping.iter().enumerate().filter(|&(v, &m)| v != m).count();

    let remap = |i: u32| mapping.get(i as usize).copied().unwrap_or(i as usize);
    let remapped_indices = mesh.indices.iter().filter(|&&i| remap(i) != i as usize).count();

    let mut seen = HashSet::new();
    let duplicate_triangles = mesh
        .triangles()
        .filter(|&t| {
            let canonical: Vec<usize> = t.iter().map(|&i| remap(i)).sorted().collect();
            !seen.insert(canonical)
        })
        .count();

    let referenced: HashSet<u32> = mesh.indices.iter().copied().collect();
    let unused_vertices = (0..mesh.vertex_count).filter(|&v| !referenced.contains(&(v as u32))).count();

    tracing::debug!(
        "{}: {} duplicate vertices, {} duplicate triangles",
        mesh.display_name(),
        duplicate_vertices,
        duplicate_triangles
    );

    DedupReport {
        mapping,
        duplicate_vertices,
        duplicate_triangles,
        remapped_indices,
        unused_vertices,
    }
}

/// Remove the duplicate slots a report found and renumber the indices
pub fn apply_dedup(mesh: &mut Mesh, report: &DedupReport) -> Result<()> {
    if report.mapping.len() != mesh.vertex_count {
        return Err(OptimizeError::MappingMismatch {
            expected: mesh.vertex_count,
            found: report.mapping.len(),
        });
    }
    if let Some((vertex, &target)) = report
        .mapping
        .iter()
        .enumerate()
        .find(|&(_, &m)| report.mapping.get(m) != Some(&m))
    {
        return Err(OptimizeError::NonCanonicalTarget { vertex, target });
    }
    if !report.has_duplicates() {
        return Ok(());
    }

    let keep: Vec<bool> = report.mapping.iter().enumerate().map(|(v, &m)| v == m).collect();
    let mut new_index = vec![0u32; mesh.vertex_count];
    let mut next = 0u32;
    for (v, &kept) in keep.iter().enumerate() {
        if kept {
            new_index[v] = next;
            next += 1;
        }
    }

    fn retain_kept<T>(items: &mut Vec<T>, keep: &[bool]) {
        let mut flags = keep.iter();
        items.retain(|_| flags.next().copied().unwrap_or(true));
    }
    for frame in &mut mesh.frames {
        retain_kept(&mut frame.vertices, &keep);
        retain_kept(&mut frame.normals, &keep);
    }
    for coords in &mut mesh.tex_coords {
        retain_kept(coords, &keep);
    }
    for index in &mut mesh.indices {
        *index = new_index[report.mapping[*index as usize]];
    }
    mesh.vertex_count = next as usize;
    Ok(())
}

impl ModelOptimizer for DedupOptions {
    type Summary = Vec<DedupReport>;

    /// Deduplicate every mesh; reports describe each mesh before rewriting
    fn optimize(&self, model: &mut Model) -> Vec<DedupReport> {
        model
            .meshes
            .par_iter_mut()
            .map(|mesh| {
                let report = deduplicate_vertices(mesh, self);
                if let Err(e) = apply_dedup(mesh, &report) {
                    tracing::warn!("{}: {}", mesh.display_name(), e);
                }
                report
            })
            .collect()
    }
}
