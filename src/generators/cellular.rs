//! Cellular automata cave generation
//!
//! Seeds the map with 50/50 noise and smooths it with a neighbour-count rule.
//! Each pass reads only from the previous generation, so the result does not
//! depend on the order cells are visited in.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ascii::render_ascii;
use crate::error::{check_dimensions, Result};
use crate::tile::Tile;
use crate::tilemap::{Tilemap, NEIGHBOR_OFFSETS_8};

/// Chance of a cell starting as wall.
const INITIAL_WALL_CHANCE: f64 = 0.5;

pub struct CellularAutomata {
    width: usize,
    height: usize,
    rng: ChaCha8Rng,
    map: Option<Tilemap<Tile>>,
}

impl CellularAutomata {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_seed(width, height, rand::random())
    }

    pub fn with_seed(width: usize, height: usize, seed: u64) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            rng: ChaCha8Rng::seed_from_u64(seed),
            map: None,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Random fill followed by `iterations` smoothing passes.
    ///
    /// With zero iterations the raw random fill is returned as is.
    pub fn generate(&mut self, iterations: usize) -> Result<&Tilemap<Tile>> {
        let mut map = random_fill(self.width, self.height, &mut self.rng);

        for _ in 0..iterations {
            map = smooth_step(&map);
        }

        debug!(
            "cellular automata: {} passes on {}x{}, {} floor cells",
            iterations,
            self.width,
            self.height,
            map.count(|t| t.is_floor())
        );

        Ok(&*self.map.insert(map))
    }

    pub fn map(&self) -> Option<&Tilemap<Tile>> {
        self.map.as_ref()
    }

    pub fn render(&self) -> String {
        self.map.as_ref().map(render_ascii).unwrap_or_default()
    }
}

fn random_fill(width: usize, height: usize, rng: &mut ChaCha8Rng) -> Tilemap<Tile> {
    let mut map = Tilemap::new_with(width, height, Tile::Wall);
    for (_, _, cell) in map.iter_mut() {
        *cell = if rng.gen_bool(INITIAL_WALL_CHANCE) {
            Tile::Wall
        } else {
            Tile::Floor
        };
    }
    map
}

/// One smoothing pass over a snapshot.
pub fn smooth_step(map: &Tilemap<Tile>) -> Tilemap<Tile> {
    let mut next = Tilemap::new_with(map.width, map.height, Tile::Wall);

    for y in 0..map.height {
        for x in 0..map.width {
            if map.is_border(x, y) {
                continue;
            }
            next.set(x, y, next_state(count_wall_neighbors(map, x, y)));
        }
    }

    next
}

/// 0 walls: wall, 1-4: floor, 5-8: wall.
fn next_state(wall_neighbors: usize) -> Tile {
    match wall_neighbors {
        1..=4 => Tile::Floor,
        _ => Tile::Wall,
    }
}

/// Wall count among the 8 neighbours; anything off the map counts as wall.
fn count_wall_neighbors(map: &Tilemap<Tile>, x: usize, y: usize) -> usize {
    NEIGHBOR_OFFSETS_8
        .iter()
        .filter(|(dx, dy)| {
            map.get_signed(x as i32 + dx, y as i32 + dy)
                .map_or(true, |tile| tile.is_wall())
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(rows: &[&str]) -> Tilemap<Tile> {
        let mut map = Tilemap::new_with(rows[0].len(), rows.len(), Tile::Wall);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '.' {
                    map.set(x, y, Tile::Floor);
                }
            }
        }
        map
    }

    #[test]
    fn test_neighbor_rule() {
        assert_eq!(next_state(0), Tile::Wall);
        for n in 1..=4 {
            assert_eq!(next_state(n), Tile::Floor);
        }
        for n in 5..=8 {
            assert_eq!(next_state(n), Tile::Wall);
        }
    }

    #[test]
    fn test_off_map_counts_as_wall() {
        let map = parse(&["...", "...", "..."]);
        assert_eq!(count_wall_neighbors(&map, 0, 0), 5);
        assert_eq!(count_wall_neighbors(&map, 1, 1), 0);
    }

    #[test]
    fn test_smoothing_reads_previous_generation() {
        let map = parse(&[".....", ".....", "..#..", ".....", "....."]);
        let next = smooth_step(&map);
        assert_eq!(
            render_ascii(&next),
            "#####\n#...#\n#.#.#\n#...#\n#####\n"
        );
    }

    #[test]
    fn test_border_is_wall_after_smoothing() {
        for iterations in 1..4 {
            let mut gen = CellularAutomata::with_seed(30, 20, iterations as u64).unwrap();
            let map = gen.generate(iterations).unwrap();
            for (x, y, tile) in map.iter() {
                if map.is_border(x, y) {
                    assert!(tile.is_wall(), "border cell ({}, {}) open", x, y);
                }
            }
        }
    }

    #[test]
    fn test_zero_iterations_returns_raw_fill() {
        let seed = 2024;
        let mut gen = CellularAutomata::with_seed(10, 10, seed).unwrap();
        let map = gen.generate(0).unwrap().clone();

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let expected = random_fill(10, 10, &mut rng);
        assert_eq!(map, expected);
        assert_eq!(map.width * map.height, 100);
    }

    #[test]
    fn test_same_seed_same_cave() {
        let mut a = CellularAutomata::with_seed(40, 25, 8).unwrap();
        let mut b = CellularAutomata::with_seed(40, 25, 8).unwrap();
        a.generate(5).unwrap();
        b.generate(5).unwrap();
        assert_eq!(a.render(), b.render());
    }
}
