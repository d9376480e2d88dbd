use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A sparse 3-D feature point, in the AR session's world coordinates.
///
/// Equality is exact on all three components, with no tolerance. Two samples
/// of the same physical feature that differ by sensor noise are distinct
/// points. IEEE rules apply: `0.0 == -0.0`, and a point holding a NaN never
/// compares equal to anything, itself included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3D {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Point3D) -> f32 {
        nalgebra::distance(&Point3::from(*self), &Point3::from(*other))
    }

    /// Multiply every component by `factor`.
    #[inline]
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

impl From<[f32; 3]> for Point3D {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Point3D> for [f32; 3] {
    fn from(p: Point3D) -> Self {
        [p.x, p.y, p.z]
    }
}

impl From<Point3<f32>> for Point3D {
    fn from(p: Point3<f32>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl From<Point3D> for Point3<f32> {
    fn from(p: Point3D) -> Self {
        Point3::new(p.x, p.y, p.z)
    }
}
