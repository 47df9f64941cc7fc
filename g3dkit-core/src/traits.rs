//! Core traits for g3dkit

use crate::{mesh::*, point::*};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point3f,
    pub max: Point3f,
}

impl Bounds {
    /// Bounds containing a single point
    pub fn from_point(point: Point3f) -> Self {
        Self { min: point, max: point }
    }

    /// Bounds of a set of points, `None` if there are none
    pub fn from_points<'a, I: IntoIterator<Item = &'a Point3f>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(*iter.next()?);
        for point in iter {
            bounds.add_point(point);
        }
        Some(bounds)
    }

    /// Grow the bounds to contain a point
    pub fn add_point(&mut self, p: &Point3f) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);

        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Smallest bounds containing both
    pub fn union(&self, other: &Bounds) -> Bounds {
        let mut out = *self;
        out.add_point(&other.min);
        out.add_point(&other.max);
        out
    }

    /// Extent along each axis
    pub fn size(&self) -> Vector3f {
        self.max - self.min
    }

    /// Centre of the box
    pub fn center(&self) -> Point3f {
        Point3f::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Length of the diagonal
    pub fn diagonal(&self) -> f32 {
        self.size().norm()
    }
}

/// Trait for objects with a spatial extent
pub trait Bounded {
    /// Bounds of the object, `None` if it has no vertices
    fn bounds(&self) -> Option<Bounds>;

    /// Centre of the bounds
    fn center(&self) -> Option<Point3f> {
        self.bounds().map(|b| b.center())
    }
}

impl Bounded for Frame {
    fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.vertices)
    }
}

impl Bounded for Mesh {
    /// Bounds over every frame of the animation
    fn bounds(&self) -> Option<Bounds> {
        self.frames
            .iter()
            .filter_map(Bounded::bounds)
            .reduce(|a, b| a.union(&b))
    }
}
