use crate::Point3D;

/// Insertion-ordered set of points collected during one capture window.
///
/// Membership is checked with a linear scan using exact equality. That is
/// only affordable because the owner flushes and clears the buffer once it
/// reaches a fixed size.
#[derive(Clone, Debug, Default)]
pub struct PointBuffer {
    points: Vec<Point3D>,
}

impl PointBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Append `p` unless an equal point is already present.
    ///
    /// Returns `true` if the point was inserted.
    pub fn add(&mut self, p: Point3D) -> bool {
        if self.points.contains(&p) {
            return false;
        }
        self.points.push(p);
        true
    }

    /// [`add`](Self::add) every point in order; returns how many were new.
    pub fn extend_unique<I>(&mut self, points: I) -> usize
    where
        I: IntoIterator<Item = Point3D>,
    {
        points.into_iter().filter(|&p| self.add(p)).count()
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drop all points, keeping the allocation.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Current contents in first-insertion order.
    #[inline]
    pub fn snapshot(&self) -> &[Point3D] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32, z: f32) -> Point3D {
        Point3D::new(x, y, z)
    }

    #[test]
    fn adding_twice_keeps_one() {
        let mut buf = PointBuffer::new();
        assert!(buf.add(p(1.0, 2.0, 3.0)));
        assert!(!buf.add(p(1.0, 2.0, 3.0)));
        assert_eq!(buf.count(), 1);
    }

    #[test]
    fn snapshot_preserves_first_insertion_order() {
        let mut buf = PointBuffer::new();
        let pts = [p(3.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)];
        for &q in &pts {
            buf.add(q);
        }
        buf.add(pts[0]);
        assert_eq!(buf.snapshot(), &pts);
    }

    #[test]
    fn differing_in_one_component_is_distinct() {
        let mut buf = PointBuffer::new();
        let next_up = f32::from_bits(1.0f32.to_bits() + 1);
        buf.add(p(1.0, 1.0, 1.0));
        buf.add(p(1.0, 1.0, next_up));
        buf.add(p(1.0, next_up, 1.0));
        buf.add(p(next_up, 1.0, 1.0));
        assert_eq!(buf.count(), 4);
    }

    #[test]
    fn nan_points_are_never_deduplicated() {
        let mut buf = PointBuffer::new();
        let nan = p(f32::NAN, 0.0, 0.0);
        assert!(buf.add(nan));
        assert!(buf.add(nan));
        assert_eq!(buf.count(), 2);
    }

    #[test]
    fn extend_unique_counts_new_points_only() {
        let mut buf = PointBuffer::new();
        buf.add(p(0.0, 0.0, 0.0));
        let added = buf.extend_unique([
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
        ]);
        assert_eq!(added, 2);
        assert_eq!(buf.count(), 3);
    }

    #[test]
    fn clear_empties_and_allows_readding() {
        let mut buf = PointBuffer::new();
        buf.add(p(1.0, 2.0, 3.0));
        buf.clear();
        assert!(buf.is_empty());
        assert!(buf.snapshot().is_empty());
        assert!(buf.add(p(1.0, 2.0, 3.0)));
    }
}
