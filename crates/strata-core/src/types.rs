//! Shared geometric primitives

use glam::DVec3;

/// Axis-aligned bounding box in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec3,
    pub max: DVec3,
}

impl Bounds {
    /// Compute the bounds of a point set. Returns `None` for an empty set.
    pub fn from_points<I>(points: I) -> Option<Bounds>
    where
        I: IntoIterator<Item = DVec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds { min: first, max: first };
        for p in iter {
            bounds.min = bounds.min.min(p);
            bounds.max = bounds.max.max(p);
        }
        Some(bounds)
    }

    /// Merge two bounding boxes
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Longest edge of the box
    pub fn max_dimension(&self) -> f64 {
        let size = self.max - self.min;
        size.x.max(size.y).max(size.z)
    }

    /// Flattened `[xmin, xmax, ymin, ymax, zmin, zmax]` form
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.min.x, self.max.x,
            self.min.y, self.max.y,
            self.min.z, self.max.z,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bounds = Bounds::from_points([
            DVec3::new(1.0, -2.0, 3.0),
            DVec3::new(-1.0, 4.0, 0.0),
            DVec3::new(0.5, 0.0, 5.0),
        ])
        .unwrap();
        assert_eq!(bounds.min, DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, DVec3::new(1.0, 4.0, 5.0));
        assert_eq!(bounds.max_dimension(), 6.0);
    }

    #[test]
    fn test_empty_points() {
        assert!(Bounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_union_and_center() {
        let a = Bounds { min: DVec3::ZERO, max: DVec3::splat(2.0) };
        let b = Bounds { min: DVec3::splat(-2.0), max: DVec3::ONE };
        let merged = a.union(b);
        assert_eq!(merged.min, DVec3::splat(-2.0));
        assert_eq!(merged.max, DVec3::splat(2.0));
        assert_eq!(merged.center(), DVec3::ZERO);
    }
}
