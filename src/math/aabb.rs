//! Axis-aligned bounding box

use crate::core::types::{Vec2, Vec3};

/// Axis-aligned bounding box defined by min and max corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point. Returns `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut result = Aabb::new(first, first);
        for p in points {
            result.expand(p);
        }
        Some(result)
    }

    /// Check if the footprint on the ground plane (XZ) contains the point.
    ///
    /// Height is ignored: a surface claims every point above or below it.
    pub fn contains_xz(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.z && p.y <= self.max.z
    }

    /// Expand AABB to include point
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_xz_ignores_height() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::new(4.0, 0.0, 4.0));
        assert!(aabb.contains_xz(Vec2::new(2.0, 3.0)));
        assert!(!aabb.contains_xz(Vec2::new(5.0, 1.0)));
    }

    #[test]
    fn test_from_points() {
        let aabb = Aabb::from_points([
            Vec3::new(1.0, 5.0, -2.0),
            Vec3::new(-1.0, 0.0, 3.0),
        ])
        .unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, 0.0, -2.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 5.0, 3.0));
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }
}
