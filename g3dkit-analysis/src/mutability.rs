//! Per-frame mutability scan and vertex usage

use g3dkit_core::{distance_f64, Mesh};
use serde::{Deserialize, Serialize};

/// Which triangles deform between consecutive frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMutability {
    /// `changed[f - 1][t]` is true when triangle `t` changed an edge length
    /// between frame `f - 1` and frame `f`
    pub changed: Vec<Vec<bool>>,
}

impl FrameMutability {
    /// True when no triangle ever changes shape
    pub fn is_immutable(&self) -> bool {
        self.changed.iter().all(|frame| !frame.iter().any(|&c| c))
    }

    /// Frames (from 1) in which at least one triangle changed shape
    pub fn mutable_frames(&self) -> Vec<usize> {
        self.changed
            .iter()
            .enumerate()
            .filter(|(_, frame)| frame.iter().any(|&c| c))
            .map(|(f, _)| f + 1)
            .collect()
    }

    /// Triangles that change shape in any frame
    pub fn mutable_triangles(&self) -> Vec<usize> {
        let triangle_count = self.changed.first().map(Vec::len).unwrap_or(0);
        (0..triangle_count)
            .filter(|&t| self.changed.iter().any(|frame| frame[t]))
            .collect()
    }
}

/// Compare every triangle's edge lengths between consecutive frames.
///
/// An edge has changed when its length moved by `epsilon` or more.
pub fn frame_mutability(mesh: &Mesh, epsilon: f64) -> FrameMutability {
    let changed = mesh
        .frames
        .windows(2)
        .map(|pair| {
            let (prev, next) = (&pair[0].vertices, &pair[1].vertices);
            mesh.triangles()
                .map(|[a, b, c]| {
                    [(a, b), (b, c), (c, a)].iter().any(|&(u, v)| {
                        let (u, v) = (u as usize, v as usize);
                        let before = distance_f64(&prev[u], &prev[v]);
                        let after = distance_f64(&next[u], &next[v]);
                        (after - before).abs() >= epsilon
                    })
                })
                .collect()
        })
        .collect();
    FrameMutability { changed }
}

/// Vertex slots that no index refers to, in ascending order
pub fn unused_vertices(mesh: &Mesh) -> Vec<usize> {
    let mut used = vec![false; mesh.vertex_count];
    for &i in &mesh.indices {
        if let Some(slot) = used.get_mut(i as usize) {
            *slot = true;
        }
    }
    let unused: Vec<usize> = used
        .iter()
        .enumerate()
        .filter(|(_, &u)| !u)
        .map(|(v, _)| v)
        .collect();
    if !unused.is_empty() {
        tracing::warn!("{}: {} unused vertices", mesh.display_name(), unused.len());
    }
    unused
}

#[cfg(test)]
mod tests {
    use super::*;
    use g3dkit_core::{Frame, Point3f};

    fn triangles(frames: Vec<Vec<Point3f>>) -> Mesh {
        Mesh::from_frames(
            frames.into_iter().map(Frame::from_vertices).collect(),
            vec![0, 1, 2, 3, 4, 5],
        )
    }

    fn pair(stretch: f32, shift: f32) -> Vec<Point3f> {
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0 + stretch, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
            Point3f::new(5.0 + shift, 0.0, 0.0),
            Point3f::new(6.0 + shift, 0.0, 0.0),
            Point3f::new(5.0 + shift, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_static_mesh_is_immutable() {
        let mesh = triangles(vec![pair(0.0, 0.0), pair(0.0, 3.0), pair(0.0, -2.0)]);
        let scan = frame_mutability(&mesh, 1e-6);
        assert_eq!(scan.changed.len(), 2);
        assert!(scan.is_immutable());
        assert!(scan.mutable_frames().is_empty());
    }

    #[test]
    fn test_stretching_triangle_is_flagged_per_frame() {
        let mesh = triangles(vec![pair(0.0, 0.0), pair(0.0, 1.0), pair(0.5, 1.0)]);
        let scan = frame_mutability(&mesh, 1e-6);
        assert_eq!(scan.changed, vec![vec![false, false], vec![true, false]]);
        assert!(!scan.is_immutable());
        assert_eq!(scan.mutable_frames(), vec![2]);
        assert_eq!(scan.mutable_triangles(), vec![0]);
    }

    #[test]
    fn test_single_frame_has_no_pairs() {
        let scan = frame_mutability(&triangles(vec![pair(0.0, 0.0)]), 1e-6);
        assert!(scan.changed.is_empty());
        assert!(scan.is_immutable());
        assert!(scan.mutable_triangles().is_empty());
    }

    #[test]
    fn test_unused_vertices() {
        let mut mesh = triangles(vec![pair(0.0, 0.0)]);
        mesh.indices = vec![0, 1, 2, 0, 2, 4];
        assert_eq!(unused_vertices(&mesh), vec![3, 5]);

        mesh.indices = vec![0, 1, 2, 3, 4, 5];
        assert!(unused_vertices(&mesh).is_empty());
    }
}
