//! Seed management for map generation
//!
//! Provides a separate seed for each generation algorithm, all derived from a
//! master seed, so one algorithm's output can be varied while the others stay
//! fixed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::config::Algorithm;

/// Seeds for all generation algorithms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    pub rooms: u64,
    pub bsp: u64,
    pub cellular: u64,
    pub drunkard: u64,
    pub dla: u64,
    pub voronoi: u64,
    pub perlin: u64,
}

impl GeneratorSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            rooms: derive_seed(master, Algorithm::Rooms.name()),
            bsp: derive_seed(master, Algorithm::Bsp.name()),
            cellular: derive_seed(master, Algorithm::Cellular.name()),
            drunkard: derive_seed(master, Algorithm::Drunkard.name()),
            dla: derive_seed(master, Algorithm::Dla.name()),
            voronoi: derive_seed(master, Algorithm::Voronoi.name()),
            perlin: derive_seed(master, Algorithm::Perlin.name()),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> GeneratorSeedsBuilder {
        GeneratorSeedsBuilder::new(master)
    }

    /// Seed for one algorithm.
    pub fn for_algorithm(&self, algorithm: Algorithm) -> u64 {
        match algorithm {
            Algorithm::Rooms => self.rooms,
            Algorithm::Bsp => self.bsp,
            Algorithm::Cellular => self.cellular,
            Algorithm::Drunkard => self.drunkard,
            Algorithm::Dla => self.dla,
            Algorithm::Voronoi => self.voronoi,
            Algorithm::Perlin => self.perlin,
        }
    }
}

impl Default for GeneratorSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Builder for overriding individual seeds while deriving others from master
pub struct GeneratorSeedsBuilder {
    seeds: GeneratorSeeds,
}

impl GeneratorSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: GeneratorSeeds::from_master(master),
        }
    }

    /// Override the seed of a single algorithm
    pub fn with(mut self, algorithm: Algorithm, seed: u64) -> Self {
        let slot = match algorithm {
            Algorithm::Rooms => &mut self.seeds.rooms,
            Algorithm::Bsp => &mut self.seeds.bsp,
            Algorithm::Cellular => &mut self.seeds.cellular,
            Algorithm::Drunkard => &mut self.seeds.drunkard,
            Algorithm::Dla => &mut self.seeds.dla,
            Algorithm::Voronoi => &mut self.seeds.voronoi,
            Algorithm::Perlin => &mut self.seeds.perlin,
        };
        *slot = seed;
        self
    }

    pub fn build(self) -> GeneratorSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and an algorithm name.
fn derive_seed(master: u64, system: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    system.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for GeneratorSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GeneratorSeeds {{ master: {}, rooms: {}, bsp: {}, cellular: {}, \
             drunkard: {}, dla: {}, voronoi: {}, perlin: {} }}",
            self.master,
            self.rooms,
            self.bsp,
            self.cellular,
            self.drunkard,
            self.dla,
            self.voronoi,
            self.perlin,
        )
    }
}
