use std::ops::BitOr;

use serde::Serialize;

/// Axis-aligned rectangle in PDF points, top-left origin (y grows downward).
/// Invariant for well-formed rects: x0 <= x1, y0 <= y1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn center_y(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }

    /// A rect is empty when it has no positive extent on either axis.
    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Check if this rect overlaps another (open interiors).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x0 < other.x1 && self.x1 > other.x0 && self.y0 < other.y1 && self.y1 > other.y0
    }

    /// Compute the overlap of two rects, `None` when they are disjoint.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        let x1 = self.x1.min(other.x1);
        let y1 = self.y1.min(other.y1);

        if x0 < x1 && y0 < y1 {
            Some(Rect::new(x0, y0, x1, y1))
        } else {
            None
        }
    }

    /// Check if this rect fully contains another.
    pub fn contains(&self, other: &Rect) -> bool {
        self.x0 <= other.x0 && self.x1 >= other.x1 && self.y0 <= other.y0 && self.y1 >= other.y1
    }

    /// Grow the rect by independent horizontal and vertical margins.
    pub fn expand(&self, mx: f64, my: f64) -> Rect {
        Rect::new(self.x0 - mx, self.y0 - my, self.x1 + mx, self.y1 + my)
    }

    /// Horizontal gap to another rect, 0 when they overlap on the x-axis.
    pub fn x_gap(&self, other: &Rect) -> f64 {
        (self.x0 - other.x1).max(other.x0 - self.x1).max(0.0)
    }

    /// Vertical gap to another rect, 0 when they overlap on the y-axis.
    pub fn y_gap(&self, other: &Rect) -> f64 {
        (self.y0 - other.y1).max(other.y0 - self.y1).max(0.0)
    }

    /// Chebyshev gap distance: max of the per-axis gaps.
    pub fn gap(&self, other: &Rect) -> f64 {
        self.x_gap(other).max(self.y_gap(other))
    }

    /// Length of the overlap of the two vertical extents, 0 when disjoint.
    pub fn y_overlap(&self, other: &Rect) -> f64 {
        (self.y1.min(other.y1) - self.y0.max(other.y0)).max(0.0)
    }
}

impl BitOr for Rect {
    type Output = Rect;

    /// Bounding-box union.
    fn bitor(self, rhs: Rect) -> Rect {
        Rect::new(
            self.x0.min(rhs.x0),
            self.y0.min(rhs.y0),
            self.x1.max(rhs.x1),
            self.y1.max(rhs.y1),
        )
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self {
            x0: 0.0,
            y0: 0.0,
            x1: 0.0,
            y1: 0.0,
        }
    }
}

/// Union of a non-empty slice of rects.
pub fn union_of(rects: &[Rect]) -> Option<Rect> {
    rects.iter().copied().reduce(|a, b| a | b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_basic() {
        let r = Rect::new(10.0, 20.0, 100.0, 80.0);
        assert_eq!(r.width(), 90.0);
        assert_eq!(r.height(), 60.0);
        assert_eq!(r.center_x(), 55.0);
        assert!(!r.is_empty());
        assert!(Rect::new(5.0, 5.0, 5.0, 9.0).is_empty());
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 150.0, 150.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 50.0, 100.0, 100.0)));

        let c = Rect::new(200.0, 200.0, 300.0, 300.0);
        assert_eq!(a.intersection(&c), None);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_rect_union_operator() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 30.0, 40.0);
        let u = a | b;
        assert_eq!(u, Rect::new(0.0, 0.0, 30.0, 40.0));
        // Commutative
        assert_eq!(b | a, u);
    }

    #[test]
    fn test_gaps() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(25.0, 2.0, 35.0, 8.0);
        assert_eq!(a.x_gap(&b), 15.0);
        assert_eq!(a.y_gap(&b), 0.0);
        assert_eq!(a.gap(&b), 15.0);
        assert_eq!(a.y_overlap(&b), 6.0);

        // Overlapping rects have zero gap on both axes
        let c = Rect::new(5.0, 5.0, 15.0, 15.0);
        assert_eq!(a.x_gap(&c), 0.0);
        assert_eq!(a.y_gap(&c), 0.0);
    }

    #[test]
    fn test_union_of() {
        assert_eq!(union_of(&[]), None);
        let rects = [
            Rect::new(10.0, 10.0, 20.0, 20.0),
            Rect::new(0.0, 15.0, 5.0, 30.0),
        ];
        assert_eq!(union_of(&rects), Some(Rect::new(0.0, 10.0, 20.0, 30.0)));
    }
}
