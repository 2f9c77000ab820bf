//! Planar (XZ) bounding rectangle

use crate::core::types::{Vec2, Vec3};

/// Axis-aligned rectangle on the XZ plane, inclusive on every edge
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlanarBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl PlanarBounds {
    /// Create bounds from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Bounds of a terrain footprint: `origin.xz .. origin.xz + size.xz`
    pub fn from_footprint(origin: Vec3, size: Vec3) -> Self {
        let min = Vec2::new(origin.x, origin.z);
        Self {
            min,
            max: min + Vec2::new(size.x, size.z),
        }
    }

    /// Get size (max - min)
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Check if the planar projection of a point is inside the rectangle
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.z >= self.min.y && p.z <= self.max.y
    }
}

/// Squared distance between two points ignoring height
#[inline]
pub fn planar_distance_sq(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    dx * dx + dz * dz
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_footprint() {
        let b = PlanarBounds::from_footprint(Vec3::new(10.0, 5.0, -4.0), Vec3::new(100.0, 30.0, 50.0));
        assert_eq!(b.min, Vec2::new(10.0, -4.0));
        assert_eq!(b.max, Vec2::new(110.0, 46.0));
        assert_eq!(b.size(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let b = PlanarBounds::new(Vec2::ZERO, Vec2::splat(100.0));
        assert!(b.contains(Vec3::new(0.0, 500.0, 0.0)));
        assert!(b.contains(Vec3::new(100.0, -3.0, 100.0)));
        assert!(b.contains(Vec3::new(50.0, 0.0, 25.0)));
        assert!(!b.contains(Vec3::new(-0.01, 0.0, 50.0)));
        assert!(!b.contains(Vec3::new(50.0, 0.0, 100.01)));
    }

    #[test]
    fn test_planar_distance_ignores_height() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 40.0, 4.0);
        assert_eq!(planar_distance_sq(a, b), 25.0);
    }
}
