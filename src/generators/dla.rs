//! Diffusion-limited aggregation
//!
//! Opens a square seed at the map centre, then releases particles from the
//! map edges. Each particle staggers around (8 directions) until it lands
//! next to open space and sticks, or wanders into the outer margin and is
//! lost.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ascii::render_ascii;
use crate::error::{check_dimensions, MapGenError, Result};
use crate::tile::Tile;
use crate::tilemap::Tilemap;

/// Default particle walk length, per map cell.
const WALK_STEPS_PER_CELL: usize = 16;

pub struct DiffusionLimitedAggregation {
    width: usize,
    height: usize,
    rng: ChaCha8Rng,
    max_walk_steps: Option<usize>,
    map: Option<Tilemap<Tile>>,
    stuck_particles: usize,
}

impl DiffusionLimitedAggregation {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_seed(width, height, rand::random())
    }

    pub fn with_seed(width: usize, height: usize, seed: u64) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_walk_steps: None,
            map: None,
            stuck_particles: 0,
        })
    }

    /// Cap on steps a single particle may take before it is discarded.
    pub fn with_max_walk_steps(mut self, steps: usize) -> Self {
        self.max_walk_steps = Some(steps);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Grow the cluster from a seed square of half-width `seed_size`,
    /// releasing `max_particles` particles in total (stuck or lost).
    pub fn generate(&mut self, seed_size: usize, max_particles: usize) -> Result<&Tilemap<Tile>> {
        let (width, height) = (self.width, self.height);
        if width < 3 || height < 3 {
            return Err(MapGenError::InvalidConfig(format!(
                "aggregation needs at least a 3x3 map, got {}x{}",
                width, height
            )));
        }

        let (cx, cy) = (width / 2, height / 2);
        // The seed square must stay clear of the outer margin
        if cx < seed_size + 1
            || cy < seed_size + 1
            || cx + seed_size > width - 2
            || cy + seed_size > height - 2
        {
            return Err(MapGenError::InvalidConfig(format!(
                "seed of half-width {} does not fit inside a {}x{} map",
                seed_size, width, height
            )));
        }

        let mut map = Tilemap::new_with(width, height, Tile::Wall);
        for y in cy - seed_size..=cy + seed_size {
            for x in cx - seed_size..=cx + seed_size {
                map.set(x, y, Tile::Floor);
            }
        }

        let max_walk_steps = self
            .max_walk_steps
            .unwrap_or(WALK_STEPS_PER_CELL * width * height);
        let mut stuck = 0;
        for _ in 0..max_particles {
            if self.release_particle(&mut map, max_walk_steps) {
                stuck += 1;
            }
        }

        debug!(
            "dla: {}/{} particles stuck on {}x{}",
            stuck, max_particles, width, height
        );

        self.stuck_particles = stuck;
        Ok(&*self.map.insert(map))
    }

    /// Walk one particle from a random edge cell. Returns true if it stuck.
    fn release_particle(&mut self, map: &mut Tilemap<Tile>, max_walk_steps: usize) -> bool {
        let (width, height) = (map.width as i32, map.height as i32);

        let (mut x, mut y) = if self.rng.gen_bool(0.5) {
            let x = if self.rng.gen_bool(0.5) { 0 } else { width - 1 };
            (x, self.rng.gen_range(0..height))
        } else {
            let y = if self.rng.gen_bool(0.5) { 0 } else { height - 1 };
            (self.rng.gen_range(0..width), y)
        };

        for _ in 0..max_walk_steps {
            let (dx, dy) = self.random_step();
            let (nx, ny) = (x + dx, y + dy);
            if nx <= 0 || ny <= 0 || nx >= width - 1 || ny >= height - 1 {
                return false;
            }
            x = nx;
            y = ny;

            let (ux, uy) = (x as usize, y as usize);
            if touches_floor(map, ux, uy) {
                map.set(ux, uy, Tile::Floor);
                return true;
            }
        }

        false
    }

    /// Uniform step among the 8 non-zero offsets.
    fn random_step(&mut self) -> (i32, i32) {
        loop {
            let dx = self.rng.gen_range(-1..=1);
            let dy = self.rng.gen_range(-1..=1);
            if dx != 0 || dy != 0 {
                return (dx, dy);
            }
        }
    }

    /// Particles that joined the cluster in the last successful generation.
    pub fn stuck_particles(&self) -> usize {
        self.stuck_particles
    }

    pub fn map(&self) -> Option<&Tilemap<Tile>> {
        self.map.as_ref()
    }

    pub fn render(&self) -> String {
        self.map.as_ref().map(render_ascii).unwrap_or_default()
    }
}

fn touches_floor(map: &Tilemap<Tile>, x: usize, y: usize) -> bool {
    map.neighbors_8(x, y)
        .into_iter()
        .any(|(nx, ny)| map.get(nx, ny).is_floor())
}
