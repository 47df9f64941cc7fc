//! Rigid-body partitioning of animated meshes
//!
//! Two triangles belong to the same rigid body when every distance between a
//! vertex of one and a vertex of the other is the same in every frame as in
//! frame 0. Grouping is greedy and follows triangle order: the first
//! unassigned triangle claims every later unassigned triangle that is rigid
//! with it. Membership near the tolerance boundary can therefore depend on
//! triangle order.

use g3dkit_core::{distance_f64, Mesh, Model};
use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for rigidity analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidityOptions {
    /// Largest distance change, in model units, still treated as rigid
    pub epsilon: f64,
    /// Scan candidate triangles on the rayon pool
    pub parallel: bool,
    /// Minimum number of candidates before the scan goes parallel
    pub parallel_threshold: usize,
}

impl Default for RigidityOptions {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            parallel: true,
            parallel_threshold: 512,
        }
    }
}

impl RigidityOptions {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

/// How a triangle is stored after compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriangleClass {
    /// Member of the rigid group with this id
    Grouped(usize),
    /// Rigid on its own but with no partner; its own rigid body
    ImmutableSingleton,
    /// Deforms; keeps per-frame vertex data
    Mutable,
}

/// A set of triangles that move as one rigid body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RigidGroup {
    pub id: usize,
    /// Triangle indices in ascending order
    pub triangles: Vec<usize>,
}

/// Result of analysing one mesh
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RigidityReport {
    /// Class of every triangle, by triangle index
    pub classes: Vec<TriangleClass>,
    pub groups: Vec<RigidGroup>,
    pub immutable_singletons: Vec<usize>,
    pub mutable_triangles: Vec<usize>,
    /// Distinct vertex slots referenced by mutable triangles
    pub mutable_vertices: usize,
    pub out_vertices: usize,
    pub out_indices: usize,
    pub out_matrices: usize,
}

impl RigidityReport {
    /// Report for a mesh with nothing to analyse
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Groups plus immutable singletons
    pub fn rigid_bodies(&self) -> usize {
        self.groups.len() + self.immutable_singletons.len()
    }

    /// True when no triangle needs per-frame vertex data
    pub fn is_fully_rigid(&self) -> bool {
        self.mutable_triangles.is_empty()
    }

    /// Group id of a triangle, if it was grouped
    pub fn group_of(&self, triangle: usize) -> Option<usize> {
        match self.classes.get(triangle)? {
            TriangleClass::Grouped(id) => Some(*id),
            _ => None,
        }
    }
}

/// Frame-indexed view of a mesh used by the pairwise tests
struct Scan<'a> {
    mesh: &'a Mesh,
    triangles: Vec<[usize; 3]>,
    epsilon: f64,
}

impl Scan<'_> {
    /// Whether the distance between vertices `a` and `b` never departs from frame 0
    fn invariant(&self, a: usize, b: usize) -> bool {
        let frames = &self.mesh.frames;
        let base = distance_f64(&frames[0].vertices[a], &frames[0].vertices[b]);
        frames[1..]
            .iter()
            .all(|frame| (distance_f64(&frame.vertices[a], &frame.vertices[b]) - base).abs() <= self.epsilon)
    }

    /// All nine vertex pairings between two triangles are invariant
    fn co_rigid(&self, a: usize, b: usize) -> bool {
        let (ta, tb) = (self.triangles[a], self.triangles[b]);
        ta.iter()
            .cartesian_product(tb.iter())
            .all(|(&va, &vb)| self.invariant(va, vb))
    }

    /// The triangle's own three edges are invariant
    fn edges_invariant(&self, t: usize) -> bool {
        let [a, b, c] = self.triangles[t];
        self.invariant(a, b) && self.invariant(b, c) && self.invariant(c, a)
    }
}

/// Partition a mesh's triangles into rigid groups.
///
/// A single-frame mesh is one rigid group, as is a mesh whose only triangle
/// keeps its shape. Meshes without frames, vertices or triangles produce an
/// empty report. Analysis never fails.
pub fn analyze_rigidity(mesh: &Mesh, options: &RigidityOptions) -> RigidityReport {
    let frame_count = mesh.frame_count();
    let triangle_count = mesh.triangle_count();
    if frame_count < 1 || mesh.vertex_count == 0 || triangle_count == 0 {
        return RigidityReport::empty();
    }

    if frame_count == 1 {
        let triangles: Vec<usize> = (0..triangle_count).collect();
        return RigidityReport {
            classes: vec![TriangleClass::Grouped(0); triangle_count],
            groups: vec![RigidGroup { id: 0, triangles }],
            out_vertices: mesh.vertex_count,
            out_indices: mesh.index_count(),
            ..RigidityReport::default()
        };
    }

    let scan = Scan {
        mesh,
        triangles: (0..triangle_count).map(|t| mesh.triangle(t)).collect(),
        epsilon: options.epsilon,
    };

    let mut classes: Vec<Option<TriangleClass>> = vec![None; triangle_count];
    let mut groups = Vec::new();

    for a in 0..triangle_count {
        if classes[a].is_some() {
            continue;
        }

        let candidates: Vec<usize> = (a + 1..triangle_count).filter(|&b| classes[b].is_none()).collect();
        let matches: Vec<usize> = if options.parallel && candidates.len() >= options.parallel_threshold {
            candidates.into_par_iter().filter(|&b| scan.co_rigid(a, b)).collect()
        } else {
            candidates.into_iter().filter(|&b| scan.co_rigid(a, b)).collect()
        };

        if matches.is_empty() {
            let rigid = scan.edges_invariant(a);
            // a lone rigid triangle is the whole mesh, grouped as in the single-frame case
            if !(rigid && triangle_count == 1) {
                classes[a] = Some(if rigid {
                    TriangleClass::ImmutableSingleton
                } else {
                    TriangleClass::Mutable
                });
                continue;
            }
        }

        let id = groups.len();
        classes[a] = Some(TriangleClass::Grouped(id));
        for &b in &matches {
            classes[b] = Some(TriangleClass::Grouped(id));
        }
        let mut triangles = Vec::with_capacity(matches.len() + 1);
        triangles.push(a);
        triangles.extend(matches);
        groups.push(RigidGroup { id, triangles });
    }

    let classes: Vec<TriangleClass> = classes
        .into_iter()
        .map(|c| c.unwrap_or(TriangleClass::Mutable))
        .collect();
    let of_class = |class: TriangleClass| -> Vec<usize> {
        classes
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == class)
            .map(|(t, _)| t)
            .collect()
    };
    let immutable_singletons = of_class(TriangleClass::ImmutableSingleton);
    let mutable_triangles = of_class(TriangleClass::Mutable);

    let mutable_vertices = mutable_triangles
        .iter()
        .flat_map(|&t| scan.triangles[t])
        .unique()
        .count();

    let animated = frame_count - 1;
    let report = RigidityReport {
        out_vertices: mesh.vertex_count + mutable_vertices * animated,
        out_indices: mesh.index_count(),
        out_matrices: animated * (groups.len() + immutable_singletons.len()),
        classes,
        groups,
        immutable_singletons,
        mutable_triangles,
        mutable_vertices,
    };

    tracing::debug!(
        "{}: {} groups, {} singletons, {} mutable of {} triangles",
        mesh.display_name(),
        report.groups.len(),
        report.immutable_singletons.len(),
        report.mutable_triangles.len(),
        triangle_count
    );
    report
}

/// Analyse every mesh of a model, in mesh order
pub fn analyze_model_rigidity(model: &Model, options: &RigidityOptions) -> Vec<RigidityReport> {
    model
        .meshes
        .iter()
        .map(|mesh| analyze_rigidity(mesh, options))
        .collect()
}
