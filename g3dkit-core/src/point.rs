//! Point types used by mesh frames

use nalgebra::{Point3, Vector3};

/// A vertex position with single precision coordinates
pub type Point3f = Point3<f32>;

/// A vertex normal with single precision components
pub type Vector3f = Vector3<f32>;

/// A texture coordinate pair `[u, v]`
pub type TexCoord = [f32; 2];

/// Euclidean distance between two positions, evaluated in double precision.
///
/// Rigidity tolerances are small enough that accumulating the squared terms
/// in `f32` would eat a noticeable part of the budget.
pub fn distance_f64(a: &Point3f, b: &Point3f) -> f64 {
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    let dz = a.z as f64 - b.z as f64;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_f64() {
        let a = Point3f::new(0.0, 0.0, 0.0);
        let b = Point3f::new(3.0, 4.0, 0.0);
        assert_relative_eq!(distance_f64(&a, &b), 5.0, epsilon = 1e-12);
        assert_relative_eq!(distance_f64(&b, &a), 5.0, epsilon = 1e-12);
        assert_eq!(distance_f64(&a, &a), 0.0);
    }
}
