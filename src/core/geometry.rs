//=========================================================================
// Geometry
//
// Integer rectangle type shared by the draw facade and collision code.
//
// Conventions:
// - Top-left origin, y grows downward (window/logical coordinates)
// - `w`/`h` are unsigned, so a rectangle can never have negative extent
// - The same `Rect` is used as draw destination and as hitbox
//
//=========================================================================

//=== Rect ================================================================

/// Axis-aligned integer rectangle.
///
/// Two rectangles are equal iff all four fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns `true` if the rectangle covers no area.
    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Exclusive right edge, widened so that `x + w` cannot overflow.
    fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    /// Exclusive bottom edge.
    fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    /// Center point, used as the rotation pivot by the draw facade.
    pub fn center(&self) -> (i32, i32) {
        (
            (self.x as i64 + self.w as i64 / 2) as i32,
            (self.y as i64 + self.h as i64 / 2) as i32,
        )
    }

    /// Returns `true` if `self` and `other` overlap.
    ///
    /// See [`intersects`].
    pub fn intersects(&self, other: &Rect) -> bool {
        intersects(self, other)
    }

    /// Returns `true` if the point lies inside or on the border.
    ///
    /// See [`point_in`].
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        point_in(self, x, y)
    }
}

//=== Free Functions ======================================================

/// Returns `true` iff the two rectangles share interior area.
///
/// Rectangles that only touch along an edge do not intersect, and an
/// empty rectangle intersects nothing. Symmetric in its arguments.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    (a.x as i64) < b.right()
        && (b.x as i64) < a.right()
        && (a.y as i64) < b.bottom()
        && (b.y as i64) < a.bottom()
}

/// Returns `true` iff `(x, y)` lies within `rect`, boundaries included.
pub fn point_in(rect: &Rect, x: i32, y: i32) -> bool {
    let (px, py) = (x as i64, y as i64);
    px >= rect.x as i64 && px <= rect.right() && py >= rect.y as i64 && py <= rect.bottom()
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // Intersection
    //=====================================================================

    #[test]
    fn overlapping_rectangles_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);

        assert!(intersects(&a, &b));
    }

    #[test]
    fn edge_sharing_rectangles_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        let c = Rect::new(0, 10, 10, 10);

        assert!(!intersects(&a, &b));
        assert!(!intersects(&a, &c));
    }

    #[test]
    fn intersection_is_symmetric() {
        let rects = [
            Rect::new(0, 0, 10, 10),
            Rect::new(5, 5, 10, 10),
            Rect::new(10, 0, 10, 10),
            Rect::new(-5, -5, 3, 3),
            Rect::new(2, 2, 0, 4),
            Rect::new(-100, 4, 400, 1),
        ];

        for a in &rects {
            for b in &rects {
                assert_eq!(intersects(a, b), intersects(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn contained_rectangle_intersects() {
        let outer = Rect::new(0, 0, 100, 100);
        let inner = Rect::new(40, 40, 2, 2);

        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn empty_rectangle_never_intersects() {
        let a = Rect::new(0, 0, 10, 10);
        let empty = Rect::new(5, 5, 0, 10);

        assert!(!intersects(&a, &empty));
        assert!(!intersects(&empty, &empty));
    }

    #[test]
    fn huge_rectangles_do_not_overflow() {
        let a = Rect::new(i32::MAX - 1, 0, u32::MAX, 10);
        let b = Rect::new(i32::MAX, 5, 1, 1);

        assert!(intersects(&a, &b));
    }

    //=====================================================================
    // Point Containment
    //=====================================================================

    #[test]
    fn point_in_includes_boundaries() {
        let r = Rect::new(10, 20, 30, 40);

        assert!(point_in(&r, 10, 20));
        assert!(point_in(&r, 40, 60));
        assert!(point_in(&r, 25, 30));
        assert!(!point_in(&r, 9, 20));
        assert!(!point_in(&r, 41, 30));
        assert!(!point_in(&r, 20, 61));
    }

    #[test]
    fn contains_point_agrees_with_point_in() {
        let r = Rect::new(-5, -5, 10, 10);

        for (x, y) in [(-5, -5), (5, 5), (0, 0), (-6, 0), (0, 6)] {
            assert_eq!(r.contains_point(x, y), point_in(&r, x, y));
        }
        assert!(r.contains_point(5, -5));
        assert!(!r.contains_point(6, -5));
    }

    #[test]
    fn equality_compares_all_fields() {
        assert_eq!(Rect::new(1, 2, 3, 4), Rect::new(1, 2, 3, 4));
        assert_ne!(Rect::new(1, 2, 3, 4), Rect::new(1, 2, 3, 5));
        assert_ne!(Rect::new(1, 2, 3, 4), Rect::new(0, 2, 3, 4));
    }

    #[test]
    fn center_of_rect() {
        assert_eq!(Rect::new(0, 0, 10, 20).center(), (5, 10));
        assert_eq!(Rect::new(-10, 4, 4, 4).center(), (-8, 6));
    }
}
