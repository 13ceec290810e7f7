/// Axis-aligned rectangle defined by min and max corners
///
/// Used for glyph bounds, chunk bounds, the overall block bounds and clip rects.
/// All of these share the layout engine's coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl Rect {
    /// An inverted rect that acts as the identity for [`Rect::union`].
    pub const EMPTY: Self = Self {
        min: [f32::INFINITY, f32::INFINITY],
        max: [f32::NEG_INFINITY, f32::NEG_INFINITY],
    };

    pub const fn new(min: [f32; 2], max: [f32; 2]) -> Self {
        Self { min, max }
    }

    /// Build from the layout engine's `[minX, minY, maxX, maxY]` layout.
    pub const fn from_array(bounds: [f32; 4]) -> Self {
        Self {
            min: [bounds[0], bounds[1]],
            max: [bounds[2], bounds[3]],
        }
    }

    pub fn width(&self) -> f32 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f32 {
        self.max[1] - self.min[1]
    }

    /// True when min exceeds max on either axis, or any extent is NaN.
    pub fn is_degenerate(&self) -> bool {
        !(self.min[0] <= self.max[0] && self.min[1] <= self.max[1])
    }

    /// Closed-interval overlap test: touching edges count as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.max[0] < other.min[0]
            || self.min[0] > other.max[0]
            || self.max[1] < other.min[1]
            || self.min[1] > other.max[1])
    }

    pub fn contains(&self, other: &Rect) -> bool {
        self.min[0] <= other.min[0]
            && self.min[1] <= other.min[1]
            && self.max[0] >= other.max[0]
            && self.max[1] >= other.max[1]
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    /// Union of a flat `[minX, minY, maxX, maxY, ...]` bounds array.
    ///
    /// Returns [`Rect::EMPTY`] for an empty slice. Trailing values that do not form a
    /// full group of four are ignored; callers validate alignment first.
    pub fn from_flat_bounds(bounds: &[f32]) -> Rect {
        bounds
            .chunks_exact(4)
            .fold(Rect::EMPTY, |acc, b| {
                acc.union(&Rect::from_array([b[0], b[1], b[2], b[3]]))
            })
    }
}

impl From<[f32; 4]> for Rect {
    fn from(bounds: [f32; 4]) -> Self {
        Self::from_array(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_touching_edges() {
        let a = Rect::from_array([0.0, 0.0, 4.0, 1.0]);
        let b = Rect::from_array([4.0, 0.0, 10.0, 1.0]);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_intersects_disjoint() {
        let a = Rect::from_array([0.0, 0.0, 4.0, 1.0]);
        let b = Rect::from_array([20.0, 0.0, 30.0, 1.0]);
        assert!(!a.intersects(&b));

        let above = Rect::from_array([0.0, 2.0, 4.0, 3.0]);
        assert!(!a.intersects(&above));
    }

    #[test]
    fn test_degenerate() {
        assert!(Rect::from_array([5.0, 0.0, 1.0, 1.0]).is_degenerate());
        assert!(Rect::from_array([0.0, 5.0, 1.0, 1.0]).is_degenerate());
        assert!(Rect::from_array([f32::NAN, 0.0, 1.0, 1.0]).is_degenerate());
        assert!(Rect::EMPTY.is_degenerate());
        assert!(!Rect::from_array([1.0, 1.0, 1.0, 1.0]).is_degenerate());
    }

    #[test]
    fn test_from_flat_bounds() {
        let bounds = [0.0, 0.0, 1.0, 1.0, 2.0, -1.0, 3.0, 0.5];
        let rect = Rect::from_flat_bounds(&bounds);
        assert_eq!(rect, Rect::from_array([0.0, -1.0, 3.0, 1.0]));
        assert_eq!(Rect::from_flat_bounds(&[]), Rect::EMPTY);
    }

    #[test]
    fn test_contains() {
        let outer = Rect::from_array([0.0, 0.0, 10.0, 10.0]);
        assert!(outer.contains(&Rect::from_array([1.0, 1.0, 9.0, 9.0])));
        assert!(!outer.contains(&Rect::from_array([1.0, 1.0, 11.0, 9.0])));
    }
}
