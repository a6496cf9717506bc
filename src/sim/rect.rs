//! Axis-aligned rectangle geometry shared by every entity
//!
//! Screen-pixel coordinates, top-left origin, y grows downward.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: IVec2,
    /// Width and height
    pub size: IVec2,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            pos: IVec2::new(x, y),
            size: IVec2::new(width, height),
        }
    }

    /// A square of side `side` with its top-left corner at (x, y)
    pub fn square(x: i32, y: i32, side: i32) -> Self {
        Self::new(x, y, side, side)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    /// Center point
    pub fn center(&self) -> IVec2 {
        self.pos + self.size / 2
    }

    /// Strict overlap: rectangles that only share an edge do not collide
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10, 20, 30, 40);
        assert_eq!(r.left(), 10);
        assert_eq!(r.right(), 40);
        assert_eq!(r.top(), 20);
        assert_eq!(r.bottom(), 60);
        assert_eq!(r.center(), IVec2::new(25, 40));
    }

    #[test]
    fn test_overlap() {
        let a = Rect::square(0, 0, 50);
        assert!(a.overlaps(&Rect::square(49, 49, 50)));
        assert!(a.overlaps(&Rect::square(10, 10, 5)));
        assert!(Rect::square(10, 10, 5).overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::square(0, 0, 50);
        assert!(!a.overlaps(&Rect::square(50, 0, 50)));
        assert!(!a.overlaps(&Rect::square(0, 50, 50)));
        assert!(!a.overlaps(&Rect::square(-50, -50, 50)));
    }
}
