//! Screen Geometry Primitives
//!
//! Integer points and axis-aligned rectangles used throughout the diffing
//! pipeline. Rectangles use exclusive right/bottom edges, so a rectangle
//! whose `left == right` or `top == bottom` covers no pixels.
//!
//! # Malformed Rectangles
//!
//! A rectangle with `left > right` or `top > bottom` is a caller bug, not a
//! runtime condition. Constructors assert in debug builds and clamp the
//! rectangle to empty in release builds; every operation in this crate is
//! total over well-formed input.

/// A 2-D integer point, also used as a copy-delta vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    /// Horizontal component
    pub x: i32,

    /// Vertical component
    pub y: i32,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise negation
    #[must_use]
    pub const fn negate(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// An axis-aligned rectangle with exclusive right/bottom edges
///
/// Invariant: `left <= right` and `top <= bottom`. A rectangle with zero
/// width or height is empty and contributes nothing to region algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge (inclusive)
    pub left: i32,

    /// Top edge (inclusive)
    pub top: i32,

    /// Right edge (exclusive)
    pub right: i32,

    /// Bottom edge (exclusive)
    pub bottom: i32,
}

impl Rect {
    /// Create a rectangle from its four edges
    ///
    /// Debug builds assert `left <= right && top <= bottom`; release builds
    /// clamp an inverted rectangle to empty.
    #[must_use]
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        debug_assert!(
            left <= right && top <= bottom,
            "malformed rectangle ({left},{top})-({right},{bottom})"
        );
        Self {
            left,
            top,
            right: right.max(left),
            bottom: bottom.max(top),
        }
    }

    /// Create a rectangle from an origin and a size
    #[must_use]
    pub fn from_size(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            right: left.saturating_add_unsigned(width),
            bottom: top.saturating_add_unsigned(height),
        }
    }

    /// An empty rectangle at the origin
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            left: 0,
            top: 0,
            right: 0,
            bottom: 0,
        }
    }

    /// Width in pixels
    #[must_use]
    pub const fn width(&self) -> u32 {
        (self.right - self.left) as u32
    }

    /// Height in pixels
    #[must_use]
    pub const fn height(&self) -> u32 {
        (self.bottom - self.top) as u32
    }

    /// Covered area in pixels
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// True if the rectangle covers no pixels
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// True if the point lies inside the rectangle
    #[must_use]
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }

    /// True if the two rectangles share at least one pixel
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// The overlapping sub-rectangle, empty when the rectangles are disjoint
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        Self {
            left,
            top,
            right: right.max(left),
            bottom: bottom.max(top),
        }
    }

    /// The smallest rectangle enclosing both inputs
    ///
    /// An empty input contributes nothing; two empty inputs yield an empty
    /// rectangle.
    #[must_use]
    pub fn union_bounding(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// The rectangle shifted by `delta`
    #[must_use]
    pub const fn translate(&self, delta: Point) -> Self {
        Self {
            left: self.left + delta.x,
            top: self.top + delta.y,
            right: self.right + delta.x,
            bottom: self.bottom + delta.y,
        }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_basic() {
        let r = Rect::new(10, 20, 110, 70);

        assert_eq!(r.width(), 100);
        assert_eq!(r.height(), 50);
        assert_eq!(r.area(), 5000);
        assert!(!r.is_empty());
        assert!(r.contains(Point::new(10, 20)));
        assert!(!r.contains(Point::new(110, 70)));
    }

    #[test]
    fn test_rect_from_size() {
        let r = Rect::from_size(5, 6, 20, 10);
        assert_eq!(r, Rect::new(5, 6, 25, 16));
    }

    #[test]
    fn test_degenerate_rect_is_empty() {
        assert!(Rect::new(5, 5, 5, 10).is_empty());
        assert!(Rect::new(5, 5, 10, 5).is_empty());
        assert_eq!(Rect::new(5, 5, 5, 10).area(), 0);
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 150, 150);
        let c = Rect::new(200, 200, 250, 250);

        assert!(a.intersects(&b));
        assert_eq!(a.intersection(&b), Rect::new(50, 50, 100, 100));
        assert!(!a.intersects(&c));
        assert!(a.intersection(&c).is_empty());
    }

    #[test]
    fn test_union_bounding() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 30, 40, 50);

        assert_eq!(a.union_bounding(&b), Rect::new(0, 0, 40, 50));
        assert_eq!(a.union_bounding(&Rect::empty()), a);
        assert_eq!(Rect::empty().union_bounding(&b), b);
    }

    #[test]
    fn test_translate() {
        let r = Rect::new(10, 10, 20, 20);
        let moved = r.translate(Point::new(-5, 3));
        assert_eq!(moved, Rect::new(5, 13, 15, 23));
        assert_eq!(moved.translate(Point::new(-5, 3).negate()), r);
    }
}
