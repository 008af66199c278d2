/// A bounded 2D tilemap grid stored row-major.
///
/// The grid never wraps: every coordinate handed to
/// `get`/`set` must lie in `[0, width) x [0, height)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

/// Offsets of the 8 surrounding cells (dx, dy).
pub const NEIGHBOR_OFFSETS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(
            x < self.width && y < self.height,
            "({}, {}) outside {}x{} tilemap",
            x,
            y,
            self.width,
            self.height
        );
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Signed lookup; `None` for anything outside the grid.
    pub fn get_signed(&self, x: i32, y: i32) -> Option<&T> {
        if self.in_bounds(x, y) {
            Some(self.get(x as usize, y as usize))
        } else {
            None
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// 8-connected neighbours that fall inside the grid.
    pub fn neighbors_8(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut result = Vec::with_capacity(8);

        for (dx, dy) in NEIGHBOR_OFFSETS_8 {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if self.in_bounds(nx, ny) {
                result.push((nx as usize, ny as usize));
            }
        }

        result
    }

    /// Count cells matching a predicate.
    pub fn count<F: Fn(&T) -> bool>(&self, predicate: F) -> usize {
        self.data.iter().filter(|v| predicate(v)).count()
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// One row as a slice, `y` in `[0, height)`.
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }
}

impl Tilemap<f32> {
    /// Minimum and maximum values in the map.
    pub fn min_max(&self) -> (f32, f32) {
        let mut min_v = f32::MAX;
        let mut max_v = f32::MIN;
        for &v in &self.data {
            if v < min_v { min_v = v; }
            if v > max_v { max_v = v; }
        }
        (min_v, max_v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let mut map = Tilemap::new_with(3, 2, 0u8);
        map.set(2, 1, 7);
        assert_eq!(*map.get(2, 1), 7);
        assert_eq!(map.row(1), &[0, 0, 7]);
        assert_eq!(map.row(0), &[0, 0, 0]);
    }

    #[test]
    fn test_neighbors_do_not_wrap() {
        let map = Tilemap::new_with(4, 4, 0u8);
        assert_eq!(map.neighbors_8(0, 0).len(), 3);
        assert_eq!(map.neighbors_8(3, 1).len(), 5);
        assert_eq!(map.neighbors_8(1, 1).len(), 8);
    }

    #[test]
    fn test_signed_lookup() {
        let map = Tilemap::new_with(2, 2, 1u8);
        assert_eq!(map.get_signed(-1, 0), None);
        assert_eq!(map.get_signed(0, 2), None);
        assert_eq!(map.get_signed(1, 1), Some(&1));
    }

    #[test]
    fn test_border_detection() {
        let map = Tilemap::new_with(5, 4, 0u8);
        assert!(map.is_border(0, 2));
        assert!(map.is_border(4, 2));
        assert!(map.is_border(2, 3));
        assert!(!map.is_border(2, 2));
    }

    #[test]
    fn test_iter_coordinates() {
        let mut map = Tilemap::new_with(3, 3, 0usize);
        for (x, y, v) in map.iter_mut() {
            *v = y * 10 + x;
        }
        assert!(map.iter().all(|(x, y, &v)| v == y * 10 + x));
        assert_eq!(map.count(|&v| v >= 20), 3);
    }
}
