//! Bounding volumes used by the renderer for culling.

use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::rect::Rect;

/// Axis-aligned 3D bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Inverted box enclosing nothing.
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        !(self.min.cmple(self.max).all())
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Box around a text block lying in the z = 0 plane, optionally bent around a
    /// cylinder of radius `|curve_radius|` whose axis is parallel to y.
    ///
    /// A positive radius curves the block away from the viewer (towards +z), a negative
    /// radius towards -z.
    pub fn from_block(block: &Rect, curve_radius: f32) -> Self {
        if block.is_degenerate() {
            return Self::EMPTY;
        }

        if curve_radius == 0.0 {
            return Self::new(
                Vec3::new(block.min[0], block.min[1], 0.0),
                Vec3::new(block.max[0], block.max[1], 0.0),
            );
        }

        let r = curve_radius.abs();
        let left = block.min[0] / r;
        let right = block.max[0] / r;

        // An arc that passes an extremum of sin/cos reaches the full radius there.
        let crosses = |offset: f32| {
            ((left + offset) / TAU).floor() != ((right + offset) / TAU).floor()
        };

        let min_x = if crosses(FRAC_PI_2) {
            -r
        } else {
            (left.sin() * r).min(right.sin() * r)
        };
        let max_x = if crosses(-FRAC_PI_2) {
            r
        } else {
            (left.sin() * r).max(right.sin() * r)
        };
        let max_z = if crosses(PI) {
            r * 2.0
        } else {
            (r - left.cos() * r).max(r - right.cos() * r)
        };

        let (min_z, max_z) = if curve_radius < 0.0 {
            (-max_z, 0.0)
        } else {
            (0.0, max_z)
        };

        Self::new(
            Vec3::new(min_x, block.min[1], min_z),
            Vec3::new(max_x, block.max[1], max_z),
        )
    }

    /// Sphere centered on the box with radius equal to half the diagonal.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        if self.is_empty() {
            return BoundingSphere::EMPTY;
        }
        BoundingSphere::new(self.center(), self.size().length() * 0.5)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Bounding sphere. A negative radius marks an empty sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub const EMPTY: Self = Self {
        center: Vec3::ZERO,
        radius: -1.0,
    };

    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn is_empty(&self) -> bool {
        self.radius < 0.0
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.center.distance(point) <= self.radius
    }
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn corners(bbox: &BoundingBox) -> [Vec3; 8] {
        let (a, b) = (bbox.min, bbox.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    #[test]
    fn test_flat_box_matches_block() {
        let block = Rect::from_array([-1.0, -2.0, 3.0, 4.0]);
        let bbox = BoundingBox::from_block(&block, 0.0);
        assert_eq!(bbox.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bbox.max, Vec3::new(3.0, 4.0, 0.0));
    }

    #[test]
    fn test_sphere_encloses_box() {
        let bbox = BoundingBox::from_block(&Rect::from_array([-1.0, -2.0, 3.0, 4.0]), 0.0);
        let sphere = bbox.bounding_sphere();
        assert_eq!(sphere.center, Vec3::new(1.0, 1.0, 0.0));
        for corner in corners(&bbox) {
            assert!(sphere.center.distance(corner) <= sphere.radius + EPS);
        }
    }

    #[test]
    fn test_degenerate_block_is_empty() {
        let bbox = BoundingBox::from_block(&Rect::EMPTY, 0.0);
        assert!(bbox.is_empty());
        assert!(bbox.bounding_sphere().is_empty());
    }

    #[test]
    fn test_curved_small_arc() {
        let r = 10.0;
        let block = Rect::from_array([-1.0, 0.0, 1.0, 1.0]);
        let bbox = BoundingBox::from_block(&block, r);

        assert!((bbox.max.x - (0.1f32).sin() * r).abs() < EPS);
        assert!((bbox.min.x + (0.1f32).sin() * r).abs() < EPS);
        assert!((bbox.max.z - (r - (0.1f32).cos() * r)).abs() < EPS);
        assert_eq!(bbox.min.z, 0.0);
    }

    #[test]
    fn test_curved_wide_arc_reaches_radius() {
        let r = 1.0;
        // Spans from -pi/2 - 0.5 to +pi/2 + 0.5 radians: passes both x extrema.
        let half = FRAC_PI_2 + 0.5;
        let block = Rect::from_array([-half, 0.0, half, 1.0]);
        let bbox = BoundingBox::from_block(&block, r);
        assert_eq!(bbox.min.x, -r);
        assert_eq!(bbox.max.x, r);
    }

    #[test]
    fn test_negative_radius_flips_z() {
        let block = Rect::from_array([-1.0, 0.0, 1.0, 1.0]);
        let pos = BoundingBox::from_block(&block, 10.0);
        let neg = BoundingBox::from_block(&block, -10.0);
        assert_eq!(neg.max.z, 0.0);
        assert!((neg.min.z + pos.max.z).abs() < EPS);
    }
}
