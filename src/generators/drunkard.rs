//! Drunkard's walk cave carving
//!
//! A walker staggers around the map one cardinal step at a time, carving
//! every wall it stands on. After `max_steps` steps it is respawned on an
//! already-open cell, until the requested share of the map is open.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ascii::render_ascii;
use crate::error::{check_dimensions, MapGenError, Result};
use crate::tile::Tile;
use crate::tilemap::Tilemap;

/// Total walking steps allowed per map cell before giving up.
const STEP_BUDGET_PER_CELL: usize = 256;

/// Respawn draws allowed per map cell before giving up.
const RESPAWN_DRAWS_PER_CELL: usize = 64;

pub struct DrunkardsWalk {
    width: usize,
    height: usize,
    rng: ChaCha8Rng,
    step_budget: Option<usize>,
    map: Option<Tilemap<Tile>>,
    open_count: usize,
}

impl DrunkardsWalk {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_seed(width, height, rand::random())
    }

    pub fn with_seed(width: usize, height: usize, seed: u64) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            rng: ChaCha8Rng::seed_from_u64(seed),
            step_budget: None,
            map: None,
            open_count: 0,
        })
    }

    /// Cap on walking steps across all walkers (default: 256 per map cell).
    pub fn with_step_budget(mut self, steps: usize) -> Self {
        self.step_budget = Some(steps);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Carve until `floor(width * height * open_percent)` cells are open.
    pub fn generate(&mut self, open_percent: f64, max_steps: usize) -> Result<&Tilemap<Tile>> {
        let (width, height) = (self.width, self.height);
        if width < 3 || height < 3 {
            return Err(MapGenError::InvalidConfig(format!(
                "drunkard's walk needs at least a 3x3 map, got {}x{}",
                width, height
            )));
        }
        if !(0.0..=1.0).contains(&open_percent) {
            return Err(MapGenError::InvalidConfig(format!(
                "open_percent {} outside [0, 1]",
                open_percent
            )));
        }
        if max_steps == 0 {
            return Err(MapGenError::InvalidConfig("max_steps must be at least 1".into()));
        }

        let total = width * height;
        let target_open = (total as f64 * open_percent).floor() as usize;
        // An interior spawn never leaves the interior.
        let reachable = (width - 2) * (height - 2);
        if target_open > reachable {
            return Err(MapGenError::InvalidConfig(format!(
                "{} open cells requested but only {} are guaranteed reachable",
                target_open, reachable
            )));
        }

        let mut map = Tilemap::new_with(width, height, Tile::Wall);
        let mut x = self.rng.gen_range(0..width);
        let mut y = self.rng.gen_range(0..height);
        let mut open_count = 0;
        let mut total_steps = 0;
        let step_budget = self.step_budget.unwrap_or(STEP_BUDGET_PER_CELL * total);
        let mut walkers = 0;

        while open_count < target_open {
            walkers += 1;
            let mut steps = 0;
            while steps < max_steps {
                if map.get(x, y).is_wall() {
                    map.set(x, y, Tile::Floor);
                    open_count += 1;
                }
                if open_count >= target_open {
                    break;
                }

                // Only the moved axis is clamped to the interior
                match self.rng.gen_range(0..4) {
                    0 => x = x.saturating_sub(1).max(1),
                    1 => x = (x + 1).min(width - 2),
                    2 => y = y.saturating_sub(1).max(1),
                    _ => y = (y + 1).min(height - 2),
                }
                steps += 1;

                total_steps += 1;
                if total_steps > step_budget {
                    return Err(MapGenError::Unsatisfiable {
                        algorithm: "drunkard's walk",
                        attempts: total_steps,
                    });
                }
            }

            if open_count >= target_open {
                break;
            }
            (x, y) = self.respawn_on_floor(&map)?;
        }

        debug!(
            "drunkard's walk: {}/{} cells open after {} walkers, {} steps",
            open_count, total, walkers, total_steps
        );

        self.open_count = open_count;
        Ok(&*self.map.insert(map))
    }

    /// Rejection-sample a cell that is already floor.
    fn respawn_on_floor(&mut self, map: &Tilemap<Tile>) -> Result<(usize, usize)> {
        let draws = RESPAWN_DRAWS_PER_CELL * map.width * map.height;
        for _ in 0..draws {
            let x = self.rng.gen_range(0..map.width);
            let y = self.rng.gen_range(0..map.height);
            if map.get(x, y).is_floor() {
                return Ok((x, y));
            }
        }
        Err(MapGenError::Unsatisfiable {
            algorithm: "drunkard's walk respawn",
            attempts: draws,
        })
    }

    /// Cells opened by the last successful generation.
    pub fn open_count(&self) -> usize {
        self.open_count
    }

    pub fn map(&self) -> Option<&Tilemap<Tile>> {
        self.map.as_ref()
    }

    pub fn render(&self) -> String {
        self.map.as_ref().map(render_ascii).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::flood_fill_floor;

    #[test]
    fn test_reaches_target_open_count() {
        for (seed, percent) in [(1, 0.2), (2, 0.4), (3, 0.55)] {
            let mut gen = DrunkardsWalk::with_seed(40, 30, seed).unwrap();
            let map = gen.generate(percent, 100).unwrap();
            let target = (40.0 * 30.0 * percent).floor() as usize;
            let floors = map.count(|t| t.is_floor());
            assert!(floors >= target);
            assert_eq!(floors, gen.open_count());
        }
    }

    #[test]
    fn test_zero_percent_leaves_solid_map() {
        let mut gen = DrunkardsWalk::with_seed(20, 20, 9).unwrap();
        let map = gen.generate(0.0, 50).unwrap();
        assert!(map.count(|t| t.is_floor()) <= 1);
    }

    #[test]
    fn test_carved_area_is_connected() {
        let mut gen = DrunkardsWalk::with_seed(30, 30, 12).unwrap();
        let map = gen.generate(0.35, 150).unwrap().clone();
        let (sx, sy, _) = map.iter().find(|(_, _, t)| t.is_floor()).unwrap();
        let reached = flood_fill_floor(&map, (sx, sy), false);
        assert_eq!(reached.count(|&r| r), map.count(|t| t.is_floor()));
    }

    #[test]
    fn test_impossible_target_rejected() {
        let mut gen = DrunkardsWalk::with_seed(5, 5, 1).unwrap();
        // 25 * 0.4 = 10 cells, one more than the 3x3 interior.
        assert!(matches!(gen.generate(0.4, 10), Err(MapGenError::InvalidConfig(_))));
        assert!(matches!(gen.generate(0.8, 10), Err(MapGenError::InvalidConfig(_))));
        assert!(matches!(gen.generate(1.5, 10), Err(MapGenError::InvalidConfig(_))));
        assert!(matches!(gen.generate(0.2, 0), Err(MapGenError::InvalidConfig(_))));
        assert!(gen.map().is_none());

        let mut thin = DrunkardsWalk::with_seed(2, 10, 1).unwrap();
        assert!(thin.generate(0.1, 10).is_err());
    }

    #[test]
    fn test_target_at_interior_size_always_met() {
        // 25 * 0.38 = 9 cells, the whole 3x3 interior.
        for seed in 0..40 {
            let mut gen = DrunkardsWalk::with_seed(5, 5, seed).unwrap();
            let map = gen.generate(0.38, 10).unwrap();
            assert!(map.count(|t| t.is_floor()) >= 9, "seed {}", seed);
        }
    }

    #[test]
    fn test_step_budget_exhaustion_publishes_nothing() {
        let mut gen = DrunkardsWalk::with_seed(30, 30, 4)
            .unwrap()
            .with_step_budget(10);
        assert!(matches!(
            gen.generate(0.5, 5),
            Err(MapGenError::Unsatisfiable { attempts: 11, .. })
        ));
        assert!(gen.map().is_none());
        assert_eq!(gen.render(), "");
    }

    #[test]
    fn test_respawn_needs_an_open_cell() {
        let mut gen = DrunkardsWalk::with_seed(4, 4, 1).unwrap();
        let solid = Tilemap::new_with(4, 4, Tile::Wall);
        assert!(matches!(
            gen.respawn_on_floor(&solid),
            Err(MapGenError::Unsatisfiable { attempts, .. }) if attempts == 64 * 16
        ));

        let mut one_open = solid.clone();
        one_open.set(2, 1, Tile::Floor);
        assert_eq!(gen.respawn_on_floor(&one_open).unwrap(), (2, 1));
    }

    #[test]
    fn test_same_seed_same_walk() {
        let mut a = DrunkardsWalk::with_seed(40, 20, 31).unwrap();
        let mut b = DrunkardsWalk::with_seed(40, 20, 31).unwrap();
        a.generate(0.4, 80).unwrap();
        b.generate(0.4, 80).unwrap();
        assert_eq!(a.render(), b.render());
    }
}
