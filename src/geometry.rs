//! Geometry primitives in image coordinates.
//!
//! Boxes are stored as two corners using a bottom-left / top-right layout
//! where "bottom" is the larger Y value: `(x1, y1)` is the left edge at the
//! larger Y and `(x2, y2)` is the right edge at the smaller Y. A normalized
//! box therefore always satisfies `x1 <= x2` and `y1 >= y2`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer image coordinate.
pub type Coord = i32;

// ============================================================================
// Point
// ============================================================================

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        distance(*self, *other)
    }
}

/// Euclidean distance between two points.
pub fn distance(p: Point, q: Point) -> f64 {
    let dx = f64::from(q.x) - f64::from(p.x);
    let dy = f64::from(q.y) - f64::from(p.y);
    (dx * dx + dy * dy).sqrt()
}

// ============================================================================
// Bounding Box
// ============================================================================

/// An axis-aligned box stored as two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x1: Coord,
    /// Bottom edge (larger Y)
    pub y1: Coord,
    /// Right edge
    pub x2: Coord,
    /// Top edge (smaller Y)
    pub y2: Coord,
}

impl BoundingBox {
    /// Create a box from raw corner values without normalizing them.
    pub fn new(x1: Coord, y1: Coord, x2: Coord, y2: Coord) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a normalized box from two arbitrary drag endpoints.
    ///
    /// Corner 1 becomes `(min x, max y)` and corner 2 becomes `(max x, min y)`.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x1: a.x.min(b.x),
            y1: a.y.max(b.y),
            x2: a.x.max(b.x),
            y2: a.y.min(b.y),
        }
    }

    /// Return this box with its corners rearranged into the stored convention.
    pub fn normalized(&self) -> Self {
        Self::from_corners(Point::new(self.x1, self.y1), Point::new(self.x2, self.y2))
    }

    pub fn is_normalized(&self) -> bool {
        self.x1 <= self.x2 && self.y1 >= self.y2
    }

    /// Horizontal extent. Unsigned so the full coordinate range fits.
    pub fn width(&self) -> u32 {
        self.x1.abs_diff(self.x2)
    }

    pub fn height(&self) -> u32 {
        self.y1.abs_diff(self.y2)
    }

    /// True when the box has no area. Only allowed for a live drag preview.
    pub fn is_empty(&self) -> bool {
        self.x1 == self.x2 || self.y1 == self.y2
    }

    /// Check whether a point lies inside the box or on its boundary.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x1 && point.x <= self.x2 && point.y <= self.y1 && point.y >= self.y2
    }

    /// Check whether the interiors of two boxes intersect.
    ///
    /// Boxes that only share an edge or a corner do not overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.x1 < other.x2 && self.x2 > other.x1 && self.y1 > other.y2 && self.y2 < other.y1
    }

    /// The four corners in the order vertex hit testing breaks ties in:
    /// `(x1, y2)`, `(x2, y2)`, `(x1, y1)`, `(x2, y1)`.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x1, self.y2),
            Point::new(self.x2, self.y2),
            Point::new(self.x1, self.y1),
            Point::new(self.x2, self.y1),
        ]
    }

    /// The corner farthest from `point`. Ties keep the earliest corner in
    /// [`BoundingBox::corners`] order.
    pub fn farthest_corner(&self, point: Point) -> Point {
        let corners = self.corners();
        let mut best = corners[0];
        let mut best_distance = distance(point, best);
        for corner in &corners[1..] {
            let d = distance(point, *corner);
            if d > best_distance {
                best_distance = d;
                best = *corner;
            }
        }
        best
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x1, self.y1, self.x2, self.y2)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0, 0);
        let p2 = Point::new(3, 4);
        assert!((p1.distance_to(&p2) - 5.0).abs() < 1e-9);
        assert!((distance(p2, p1) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_corners_normalizes() {
        let expected = BoundingBox::new(10, 80, 50, 20);
        assert_eq!(BoundingBox::from_corners(Point::new(10, 20), Point::new(50, 80)), expected);
        assert_eq!(BoundingBox::from_corners(Point::new(50, 80), Point::new(10, 20)), expected);
        assert_eq!(BoundingBox::from_corners(Point::new(50, 20), Point::new(10, 80)), expected);
        assert!(expected.is_normalized());
        assert_eq!(expected.width(), 40);
        assert_eq!(expected.height(), 60);
    }

    #[test]
    fn test_normalized_fixes_swapped_corners() {
        let raw = BoundingBox::new(30, 0, 20, 10);
        assert!(!raw.is_normalized());
        assert_eq!(raw.normalized(), BoundingBox::new(20, 10, 30, 0));
    }

    #[test]
    fn test_extent_at_coordinate_limits() {
        let wide = BoundingBox::new(i32::MIN, 10, i32::MAX, 0);
        assert_eq!(wide.width(), u32::MAX);
        assert_eq!(wide.height(), 10);
        assert!(!wide.is_empty());

        let tall = BoundingBox::new(0, i32::MAX, 5, i32::MIN).normalized();
        assert_eq!(tall.height(), u32::MAX);
        assert!(!tall.is_empty());

        assert!(BoundingBox::new(i32::MIN, i32::MAX, i32::MIN, i32::MIN).is_empty());
        assert!(BoundingBox::new(i32::MIN, 7, i32::MAX, 7).is_empty());
    }

    #[test]
    fn test_contains_is_boundary_inclusive() {
        let bbox = BoundingBox::new(10, 110, 110, 10);
        assert!(bbox.contains(Point::new(50, 50)));
        assert!(bbox.contains(Point::new(10, 10)));
        assert!(bbox.contains(Point::new(110, 110)));
        assert!(bbox.contains(Point::new(10, 60)));
        assert!(!bbox.contains(Point::new(5, 50)));
        assert!(!bbox.contains(Point::new(50, 111)));
    }

    #[test]
    fn test_shared_edge_is_not_overlap() {
        let a = BoundingBox::new(0, 10, 5, 5);
        let b = BoundingBox::new(5, 10, 10, 5);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_shared_corner_is_not_overlap() {
        let a = BoundingBox::new(0, 10, 10, 0);
        let b = BoundingBox::new(10, 20, 20, 10);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_one_unit_interior_overlap() {
        let a = BoundingBox::new(0, 10, 5, 5);
        let b = BoundingBox::new(4, 10, 10, 5);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        // Containment counts as overlap
        let outer = BoundingBox::new(0, 100, 100, 0);
        let inner = BoundingBox::new(40, 60, 60, 40);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_farthest_corner() {
        let bbox = BoundingBox::new(0, 10, 10, 0);
        assert_eq!(bbox.farthest_corner(Point::new(1, 1)), Point::new(10, 10));
        assert_eq!(bbox.farthest_corner(Point::new(9, 9)), Point::new(0, 0));
        assert_eq!(bbox.farthest_corner(Point::new(9, 1)), Point::new(0, 10));
    }

    #[test]
    fn test_farthest_corner_tie_keeps_first() {
        let bbox = BoundingBox::new(0, 10, 10, 0);
        // All four corners are equidistant from the center
        assert_eq!(bbox.farthest_corner(Point::new(5, 5)), Point::new(0, 0));
        // Left and right bottom corners tie on the vertical center line
        assert_eq!(bbox.farthest_corner(Point::new(5, 10)), Point::new(0, 0));
    }

    #[test]
    fn test_empty_box() {
        assert!(BoundingBox::new(5, 10, 5, 0).is_empty());
        assert!(BoundingBox::new(0, 5, 10, 5).is_empty());
        assert!(!BoundingBox::new(0, 1, 1, 0).is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(BoundingBox::new(1, 20, 3, 4).to_string(), "1,20,3,4");
    }
}
