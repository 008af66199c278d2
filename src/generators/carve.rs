//! Carving helpers shared by the room-based generators.

use crate::geometry::Rect;
use crate::tile::Tile;
use crate::tilemap::Tilemap;

/// Carve every cell of `room` that lies on the map to floor.
pub fn carve_room(map: &mut Tilemap<Tile>, room: &Rect) {
    let right = room.right().min(map.width);
    let bottom = room.bottom().min(map.height);
    for y in room.y..bottom {
        for x in room.x..right {
            map.set(x, y, Tile::Floor);
        }
    }
}

/// Carve a horizontal run between `x1` and `x2` (inclusive) on row `y`.
///
/// Row 0 and column 0 are never carved.
pub fn carve_horizontal_tunnel(map: &mut Tilemap<Tile>, x1: usize, x2: usize, y: usize) {
    if y == 0 || y >= map.height {
        return;
    }
    for x in x1.min(x2)..=x1.max(x2) {
        if x > 0 && x < map.width {
            map.set(x, y, Tile::Floor);
        }
    }
}

/// Carve a vertical run between `y1` and `y2` (inclusive) on column `x`.
pub fn carve_vertical_tunnel(map: &mut Tilemap<Tile>, y1: usize, y2: usize, x: usize) {
    if x == 0 || x >= map.width {
        return;
    }
    for y in y1.min(y2)..=y1.max(y2) {
        if y > 0 && y < map.height {
            map.set(x, y, Tile::Floor);
        }
    }
}

/// Connect two points with an L-shaped corridor.
///
/// `horizontal_first` bends at `(to.x, from.y)`, otherwise at `(from.x, to.y)`.
pub fn carve_dogleg(
    map: &mut Tilemap<Tile>,
    from: (usize, usize),
    to: (usize, usize),
    horizontal_first: bool,
) {
    let (x1, y1) = from;
    let (x2, y2) = to;

    if horizontal_first {
        carve_horizontal_tunnel(map, x1, x2, y1);
        carve_vertical_tunnel(map, y1, y2, x2);
    } else {
        carve_vertical_tunnel(map, y1, y2, x1);
        carve_horizontal_tunnel(map, x1, x2, y2);
    }
}
