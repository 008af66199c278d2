//! Run configuration for the generators
//!
//! A `MapConfig` names the map size, an optional master seed and the list of
//! generators to run with their parameters. It round-trips through JSON so a
//! run can be saved and replayed.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::generators::{
    BinarySpacePartition, BspParams, CellularAutomata, DiffusionLimitedAggregation,
    DistanceMetric, DrunkardsWalk, PerlinNoise, RoomPlacementParams, SimpleRoomPlacement,
    VoronoiDiagram,
};
use crate::seeds::GeneratorSeeds;

/// The available generation algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Rooms,
    Bsp,
    Cellular,
    Drunkard,
    Dla,
    Voronoi,
    Perlin,
}

impl Algorithm {
    /// Every algorithm, in the order a full run produces them.
    pub fn all() -> [Algorithm; 7] {
        [
            Self::Rooms,
            Self::Bsp,
            Self::Cellular,
            Self::Drunkard,
            Self::Dla,
            Self::Voronoi,
            Self::Perlin,
        ]
    }

    /// Short identifier, also used to derive the algorithm's seed.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rooms => "rooms",
            Self::Bsp => "bsp",
            Self::Cellular => "cellular",
            Self::Drunkard => "drunkard",
            Self::Dla => "dla",
            Self::Voronoi => "voronoi",
            Self::Perlin => "perlin",
        }
    }

    /// Section heading for rendered output.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Rooms => "SIMPLE ROOM PLACEMENT",
            Self::Bsp => "BINARY SPACE PARTITION",
            Self::Cellular => "CELLULAR AUTOMATA",
            Self::Drunkard => "DRUNKARD'S WALK",
            Self::Dla => "DIFFUSION-LIMITED AGGREGATION",
            Self::Voronoi => "VORONOI DIAGRAM",
            Self::Perlin => "PERLIN NOISE",
        }
    }
}

/// Cellular automata parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellularParams {
    /// Smoothing passes (default: 5)
    pub iterations: usize,
}

impl Default for CellularParams {
    fn default() -> Self {
        Self { iterations: 5 }
    }
}

/// Drunkard's walk parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrunkardParams {
    /// Share of the map to open, 0.0 - 1.0 (default: 0.4)
    pub open_percent: f64,
    /// Steps per walker before respawning (default: 200)
    pub max_steps: usize,
}

impl Default for DrunkardParams {
    fn default() -> Self {
        Self {
            open_percent: 0.4,
            max_steps: 200,
        }
    }
}

/// Diffusion-limited aggregation parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DlaParams {
    /// Half-width of the centre seed square (default: 2)
    pub seed_size: usize,
    /// Particles released (default: 500)
    pub max_particles: usize,
    /// Per-particle step cap (default: 16 steps per map cell)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_walk_steps: Option<usize>,
}

impl Default for DlaParams {
    fn default() -> Self {
        Self {
            seed_size: 2,
            max_particles: 500,
            max_walk_steps: None,
        }
    }
}

/// Voronoi parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoronoiParams {
    /// Number of regions (default: 6)
    pub num_seeds: usize,
    /// Distance metric, any case (default: euclidean)
    #[serde(deserialize_with = "deserialize_metric")]
    pub metric: DistanceMetric,
}

impl Default for VoronoiParams {
    fn default() -> Self {
        Self {
            num_seeds: 6,
            metric: DistanceMetric::Euclidean,
        }
    }
}

fn deserialize_metric<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<DistanceMetric, D::Error> {
    let name = String::deserialize(deserializer)?;
    Ok(DistanceMetric::from_name(&name))
}

/// Perlin noise parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerlinParams {
    /// Noise layers (default: 4)
    pub octaves: u32,
    /// Lattice cells across the map in the first octave (default: 4.0)
    pub frequency: f64,
    /// Amplitude multiplier per octave (default: 0.5)
    pub gain: f64,
    /// Frequency multiplier per octave (default: 2.0)
    pub lacunarity: f64,
}

impl Default for PerlinParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            frequency: 4.0,
            gain: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// One generator invocation, tagged by algorithm in JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum GeneratorParams {
    Rooms(RoomPlacementParams),
    Bsp(BspParams),
    Cellular(CellularParams),
    Drunkard(DrunkardParams),
    Dla(DlaParams),
    Voronoi(VoronoiParams),
    Perlin(PerlinParams),
}

impl GeneratorParams {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Rooms(_) => Algorithm::Rooms,
            Self::Bsp(_) => Algorithm::Bsp,
            Self::Cellular(_) => Algorithm::Cellular,
            Self::Drunkard(_) => Algorithm::Drunkard,
            Self::Dla(_) => Algorithm::Dla,
            Self::Voronoi(_) => Algorithm::Voronoi,
            Self::Perlin(_) => Algorithm::Perlin,
        }
    }

    /// Default parameters for an algorithm.
    pub fn defaults(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Rooms => Self::Rooms(RoomPlacementParams::default()),
            Algorithm::Bsp => Self::Bsp(BspParams::default()),
            Algorithm::Cellular => Self::Cellular(CellularParams::default()),
            Algorithm::Drunkard => Self::Drunkard(DrunkardParams::default()),
            Algorithm::Dla => Self::Dla(DlaParams::default()),
            Algorithm::Voronoi => Self::Voronoi(VoronoiParams::default()),
            Algorithm::Perlin => Self::Perlin(PerlinParams::default()),
        }
    }

    /// Generate one map and return its ASCII rendering.
    pub fn run(&self, width: usize, height: usize, seed: u64) -> Result<String> {
        match self {
            Self::Rooms(params) => {
                let mut gen = SimpleRoomPlacement::with_seed(width, height, seed)?
                    .with_params(params.clone());
                gen.generate()?;
                Ok(gen.render())
            }
            Self::Bsp(params) => {
                let mut gen = BinarySpacePartition::with_seed(width, height, seed)?
                    .with_params(params.clone());
                gen.generate()?;
                Ok(gen.render())
            }
            Self::Cellular(params) => {
                let mut gen = CellularAutomata::with_seed(width, height, seed)?;
                gen.generate(params.iterations)?;
                Ok(gen.render())
            }
            Self::Drunkard(params) => {
                let mut gen = DrunkardsWalk::with_seed(width, height, seed)?;
                gen.generate(params.open_percent, params.max_steps)?;
                Ok(gen.render())
            }
            Self::Dla(params) => {
                let mut gen = DiffusionLimitedAggregation::with_seed(width, height, seed)?;
                if let Some(steps) = params.max_walk_steps {
                    gen = gen.with_max_walk_steps(steps);
                }
                gen.generate(params.seed_size, params.max_particles)?;
                Ok(gen.render())
            }
            Self::Voronoi(params) => {
                let mut gen = VoronoiDiagram::with_seed(width, height, seed)?;
                gen.generate(params.num_seeds, params.metric)?;
                Ok(gen.render())
            }
            Self::Perlin(params) => {
                let mut gen = PerlinNoise::with_seed(width, height, seed)?;
                gen.generate(params.octaves, params.frequency, params.gain, params.lacunarity)?;
                Ok(gen.render())
            }
        }
    }
}

/// A rendered map from one generator run.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedMap {
    pub algorithm: Algorithm,
    pub seed: u64,
    pub ascii: String,
}

/// Full run configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Map width in cells (default: 50)
    pub width: usize,
    /// Map height in cells (default: 50)
    pub height: usize,
    /// Master seed; random when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Generators to run, in order (default: all seven)
    pub generators: Vec<GeneratorParams>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            seed: None,
            generators: Algorithm::all()
                .into_iter()
                .map(GeneratorParams::defaults)
                .collect(),
        }
    }
}

impl MapConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: MapConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        Ok(())
    }

    /// Keep only the entries for one algorithm, adding its defaults if the
    /// config did not list it.
    pub fn only(mut self, algorithm: Algorithm) -> Self {
        self.generators.retain(|g| g.algorithm() == algorithm);
        if self.generators.is_empty() {
            self.generators.push(GeneratorParams::defaults(algorithm));
        }
        self
    }

    /// Seeds for this run: derived from `seed`, or from entropy without one.
    pub fn seeds(&self) -> GeneratorSeeds {
        self.seed
            .map(GeneratorSeeds::from_master)
            .unwrap_or_default()
    }

    pub fn run(&self) -> Result<Vec<GeneratedMap>> {
        self.run_with_seeds(&self.seeds())
    }

    /// Run every listed generator in order. Stops at the first failure.
    pub fn run_with_seeds(&self, seeds: &GeneratorSeeds) -> Result<Vec<GeneratedMap>> {
        let mut maps = Vec::with_capacity(self.generators.len());
        for params in &self.generators {
            let algorithm = params.algorithm();
            let seed = seeds.for_algorithm(algorithm);
            info!(
                "running {} on {}x{} (seed {})",
                algorithm.name(),
                self.width,
                self.height,
                seed
            );
            let ascii = params.run(self.width, self.height, seed)?;
            maps.push(GeneratedMap {
                algorithm,
                seed,
                ascii,
            });
        }
        Ok(maps)
    }
}
