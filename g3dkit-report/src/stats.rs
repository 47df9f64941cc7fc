//! Per-mesh statistics and compression estimates

use g3dkit_analysis::{analyze_rigidity, RigidityOptions};
use g3dkit_core::{Mesh, Model};
use g3dkit_optimize::{deduplicate_vertices, DedupOptions, DedupReport};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position and normal, three `f32` each
pub const BYTES_PER_VERTEX: usize = 24;

/// One `u32` index
pub const BYTES_PER_INDEX: usize = 4;

/// One 4x3 `f32` transform
pub const BYTES_PER_MATRIX: usize = 48;

/// Format a byte count with a binary unit, e.g. `1.5 KB`
pub fn fmt_bytes(bytes: usize) -> String {
    let mut value = bytes as f64;
    for unit in ["B", "KB", "MB"] {
        if value < 1024.0 {
            return format!("{:.1} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.1} GB", value)
}

/// Which analyses a report runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub rigidity: RigidityOptions,
    pub dedup: DedupOptions,
    /// Skip rigidity analysis and report the input sizes as output sizes
    pub skip_rigidity: bool,
    pub skip_dedup: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            rigidity: RigidityOptions::default(),
            dedup: DedupOptions::default(),
            skip_rigidity: false,
            skip_dedup: false,
        }
    }
}

impl ReportOptions {
    pub fn with_rigidity(mut self, rigidity: RigidityOptions) -> Self {
        self.rigidity = rigidity;
        self
    }

    pub fn with_dedup(mut self, dedup: DedupOptions) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn with_skip_rigidity(mut self, skip: bool) -> Self {
        self.skip_rigidity = skip;
        self
    }

    pub fn with_skip_dedup(mut self, skip: bool) -> Self {
        self.skip_dedup = skip;
        self
    }
}

/// Duplicate counts of one mesh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupCounts {
    pub duplicate_vertices: usize,
    pub duplicate_triangles: usize,
    pub remapped_indices: usize,
    pub unused_vertices: usize,
}

impl From<&DedupReport> for DedupCounts {
    fn from(report: &DedupReport) -> Self {
        Self {
            duplicate_vertices: report.duplicate_vertices,
            duplicate_triangles: report.duplicate_triangles,
            remapped_indices: report.remapped_indices,
            unused_vertices: report.unused_vertices,
        }
    }
}

/// Statistics of one mesh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshReport {
    pub name: String,
    pub frame_count: usize,
    pub vertex_count: usize,
    /// Vertices stored across all frames
    pub in_vertices: usize,
    pub in_indices: usize,
    pub out_vertices: usize,
    pub out_indices: usize,
    pub out_matrices: usize,
    pub rigid_groups: usize,
    pub immutable_singletons: usize,
    pub mutable_triangles: usize,
    pub dedup: Option<DedupCounts>,
}

impl MeshReport {
    pub fn in_bytes(&self) -> usize {
        self.in_vertices * BYTES_PER_VERTEX + self.in_indices * BYTES_PER_INDEX
    }

    pub fn out_bytes(&self) -> usize {
        self.out_vertices * BYTES_PER_VERTEX + self.out_indices * BYTES_PER_INDEX + self.out_matrices * BYTES_PER_MATRIX
    }
}

/// Sums over every mesh of a model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub in_vertices: usize,
    pub in_indices: usize,
    pub out_vertices: usize,
    pub out_indices: usize,
    pub out_matrices: usize,
    pub in_bytes: usize,
    pub out_bytes: usize,
}

/// Statistics of a whole model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelReport {
    pub version: u8,
    pub meshes: Vec<MeshReport>,
    pub totals: Totals,
}

impl ModelReport {
    /// Estimated output size as a fraction of the input size
    pub fn ratio(&self) -> f64 {
        if self.totals.in_bytes == 0 {
            1.0
        } else {
            self.totals.out_bytes as f64 / self.totals.in_bytes as f64
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ModelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "G3D v{} has {} meshes", self.version, self.meshes.len())?;
        for mesh in &self.meshes {
            writeln!(
                f,
                "\t{} has {} frames, {} vertices and {} indices -> {} vertices, {} matrices ({} groups, {} singletons, {} mutable)",
                mesh.name,
                mesh.frame_count,
                mesh.in_vertices,
                mesh.in_indices,
                mesh.out_vertices,
                mesh.out_matrices,
                mesh.rigid_groups,
                mesh.immutable_singletons,
                mesh.mutable_triangles
            )?;
            if let Some(dedup) = &mesh.dedup {
                writeln!(
                    f,
                    "\t\t{} dup vertices, {} dup triangles, {} remapped indices, {} unused vertices",
                    dedup.duplicate_vertices, dedup.duplicate_triangles, dedup.remapped_indices, dedup.unused_vertices
                )?;
            }
        }
        write!(
            f,
            "{} -> {} ({:.1}%)",
            fmt_bytes(self.totals.in_bytes),
            fmt_bytes(self.totals.out_bytes),
            self.ratio() * 100.0
        )
    }
}

fn mesh_report(mesh: &Mesh, options: &ReportOptions) -> MeshReport {
    let in_vertices = mesh.frame_count() * mesh.vertex_count;
    let mut report = MeshReport {
        name: mesh.display_name().to_string(),
        frame_count: mesh.frame_count(),
        vertex_count: mesh.vertex_count,
        in_vertices,
        in_indices: mesh.index_count(),
        out_vertices: in_vertices,
        out_indices: mesh.index_count(),
        out_matrices: 0,
        rigid_groups: 0,
        immutable_singletons: 0,
        mutable_triangles: 0,
        dedup: None,
    };

    if !options.skip_rigidity {
        let rigidity = analyze_rigidity(mesh, &options.rigidity);
        if !rigidity.classes.is_empty() {
            report.out_vertices = rigidity.out_vertices;
            report.out_indices = rigidity.out_indices;
            report.out_matrices = rigidity.out_matrices;
        }
        report.rigid_groups = rigidity.group_count();
        report.immutable_singletons = rigidity.immutable_singletons.len();
        report.mutable_triangles = rigidity.mutable_triangles.len();
    }
    if !options.skip_dedup {
        report.dedup = Some(DedupCounts::from(&deduplicate_vertices(mesh, &options.dedup)));
    }
    report
}

/// Analyse every mesh of a model
pub fn model_report(model: &Model, options: &ReportOptions) -> ModelReport {
    let meshes: Vec<MeshReport> = model.meshes.iter().map(|m| mesh_report(m, options)).collect();

    let totals = meshes.iter().fold(Totals::default(), |t, m| Totals {
        in_vertices: t.in_vertices + m.in_vertices,
        in_indices: t.in_indices + m.in_indices,
        out_vertices: t.out_vertices + m.out_vertices,
        out_indices: t.out_indices + m.out_indices,
        out_matrices: t.out_matrices + m.out_matrices,
        in_bytes: t.in_bytes + m.in_bytes(),
        out_bytes: t.out_bytes + m.out_bytes(),
    });

    ModelReport {
        version: model.version.as_byte(),
        meshes,
        totals,
    }
}
