//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Hashable key for exact position equality.
///
/// Two points produce the same key exactly when their coordinates compare
/// equal with `==`, so `-0.0` and `0.0` share a key. NaN coordinates are
/// rejected before a key is ever built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey([u32; 3]);

impl PositionKey {
    pub fn new(p: &Point3f) -> Self {
        // adding 0.0 folds -0.0 into +0.0
        Self([
            (p.x + 0.0).to_bits(),
            (p.y + 0.0).to_bits(),
            (p.z + 0.0).to_bits(),
        ])
    }
}

impl From<&Point3f> for PositionKey {
    fn from(p: &Point3f) -> Self {
        Self::new(p)
    }
}

/// Whether every coordinate of `p` is finite.
pub fn is_finite_point(p: &Point3f) -> bool {
    p.coords.iter().all(|c| c.is_finite())
}

/// Midpoint of two points.
pub fn midpoint(a: &Point3f, b: &Point3f) -> Point3f {
    Point3f::from((a.coords + b.coords) * 0.5)
}
