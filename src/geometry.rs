//! Axis-aligned rectangles used for rooms and partition regions.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle on the grid.
///
/// Covers the cells `[x, x + width) x [y, y + height)`. Width and height are
/// at least 1 for every rectangle a generator produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        debug_assert!(width >= 1 && height >= 1, "degenerate rect {}x{}", width, height);
        Self { x, y, width, height }
    }

    /// One past the last column.
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// One past the last row.
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    pub fn center(&self) -> (usize, usize) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Closed-interval overlap test: rectangles that only share an edge or a
    /// corner (including the cell just past either edge) intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// True if `other` lies inside this rect with at least `margin` free cells
    /// on every side.
    pub fn contains_with_margin(&self, other: &Rect, margin: usize) -> bool {
        other.x >= self.x + margin
            && other.y >= self.y + margin
            && other.right() + margin <= self.right()
            && other.bottom() + margin <= self.bottom()
    }

    /// All cells covered by the rectangle.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.y..self.bottom()).flat_map(move |y| (self.x..self.right()).map(move |x| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_is_reflexive_and_symmetric() {
        let a = Rect::new(2, 2, 4, 3);
        let b = Rect::new(4, 3, 5, 5);
        let c = Rect::new(20, 20, 2, 2);

        assert!(a.intersects(&a));
        assert!(a.intersects(&b) && b.intersects(&a));
        assert!(!a.intersects(&c) && !c.intersects(&a));
    }

    #[test]
    fn test_touching_edges_count_as_intersecting() {
        let a = Rect::new(0, 0, 4, 4);
        // Starts exactly where `a` ends horizontally.
        let right = Rect::new(4, 0, 3, 4);
        // Diagonal corner contact.
        let corner = Rect::new(4, 4, 2, 2);
        assert!(a.intersects(&right));
        assert!(right.intersects(&a));
        assert!(a.intersects(&corner));
        assert!(corner.intersects(&a));

        let gap = Rect::new(5, 0, 3, 4);
        assert!(!a.intersects(&gap));
    }

    #[test]
    fn test_center_and_area() {
        let r = Rect::new(3, 4, 5, 2);
        assert_eq!(r.center(), (5, 5));
        assert_eq!(r.area(), 10);
        assert_eq!(r.cells().count(), 10);
    }

    #[test]
    fn test_contains_with_margin() {
        let leaf = Rect::new(0, 0, 10, 10);
        assert!(leaf.contains_with_margin(&Rect::new(1, 1, 8, 8), 1));
        assert!(!leaf.contains_with_margin(&Rect::new(0, 1, 8, 8), 1));
        assert!(!leaf.contains_with_margin(&Rect::new(1, 1, 9, 8), 1));
    }
}
