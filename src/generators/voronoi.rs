//! Voronoi region assignment
//!
//! Scatters seed points over the map and gives every cell the region of its
//! closest seed under the chosen distance metric.

use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ascii::{render_ascii, AsciiGlyph};
use crate::error::{check_dimensions, MapGenError, Result};
use crate::tile::RegionId;
use crate::tilemap::Tilemap;

/// How distance between a cell and a seed is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Straight-line distance
    #[default]
    Euclidean,
    /// |dx| + |dy|
    Manhattan,
    /// max(|dx|, |dy|)
    Chebyshev,
}

impl DistanceMetric {
    /// Parse a metric name, ignoring case. Unknown names fall back to
    /// Euclidean.
    pub fn from_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "euclidean" => Self::Euclidean,
            "manhattan" => Self::Manhattan,
            "chebyshev" => Self::Chebyshev,
            other => {
                warn!("unknown distance metric '{}', using euclidean", other);
                Self::Euclidean
            }
        }
    }

    pub fn distance(&self, (x1, y1): (usize, usize), (x2, y2): (usize, usize)) -> f64 {
        let dx = x1.abs_diff(x2) as f64;
        let dy = y1.abs_diff(y2) as f64;
        match self {
            Self::Euclidean => (dx * dx + dy * dy).sqrt(),
            Self::Manhattan => dx + dy,
            Self::Chebyshev => dx.max(dy),
        }
    }
}

/// A region's reference point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoronoiSeed {
    pub x: usize,
    pub y: usize,
    pub region: RegionId,
}

impl VoronoiSeed {
    /// Character the seed's region renders as. Wraps after ten regions.
    pub fn symbol(&self) -> char {
        self.region.glyph()
    }
}

pub struct VoronoiDiagram {
    width: usize,
    height: usize,
    rng: ChaCha8Rng,
    map: Option<Tilemap<RegionId>>,
    seeds: Vec<VoronoiSeed>,
}

impl VoronoiDiagram {
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
            seeds: Vec::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Place `num_seeds` random seeds and assign every cell to the nearest.
    pub fn generate(&mut self, num_seeds: usize, metric: DistanceMetric) -> Result<&Tilemap<RegionId>> {
        if num_seeds == 0 {
            return Err(MapGenError::InvalidConfig(
                "voronoi diagram needs at least one seed".into(),
            ));
        }

        let points: Vec<(usize, usize)> = (0..num_seeds)
            .map(|_| {
                (
                    self.rng.gen_range(0..self.width),
                    self.rng.gen_range(0..self.height),
                )
            })
            .collect();

        self.generate_with_seeds(&points, metric)
    }

    /// Assign regions for caller-provided seed positions. Seed `i` owns
    /// `RegionId(i)`.
    pub fn generate_with_seeds(
        &mut self,
        points: &[(usize, usize)],
        metric: DistanceMetric,
    ) -> Result<&Tilemap<RegionId>> {
        if points.is_empty() {
            return Err(MapGenError::InvalidConfig(
                "voronoi diagram needs at least one seed".into(),
            ));
        }
        if let Some(&(x, y)) = points.iter().find(|&&(x, y)| x >= self.width || y >= self.height) {
            return Err(MapGenError::InvalidConfig(format!(
                "seed ({}, {}) lies outside the {}x{} map",
                x, y, self.width, self.height
            )));
        }

        let seeds: Vec<VoronoiSeed> = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| VoronoiSeed {
                x,
                y,
                region: RegionId(i),
            })
            .collect();

        let mut map = Tilemap::new_with(self.width, self.height, RegionId(0));
        for (x, y, cell) in map.iter_mut() {
            *cell = nearest_region(&seeds, (x, y), metric);
        }

        debug!(
            "voronoi: {} seeds ({:?}) on {}x{}",
            seeds.len(),
            metric,
            self.width,
            self.height
        );

        self.seeds = seeds;
        Ok(&*self.map.insert(map))
    }

    /// Seeds of the last successful generation, indexed by region.
    pub fn seeds(&self) -> &[VoronoiSeed] {
        &self.seeds
    }

    pub fn map(&self) -> Option<&Tilemap<RegionId>> {
        self.map.as_ref()
    }

    pub fn render(&self) -> String {
        self.map.as_ref().map(render_ascii).unwrap_or_default()
    }
}

/// First seed with the strictly smallest distance wins.
fn nearest_region(seeds: &[VoronoiSeed], cell: (usize, usize), metric: DistanceMetric) -> RegionId {
    let mut best = seeds[0].region;
    let mut best_dist = f64::INFINITY;
    for seed in seeds {
        let dist = metric.distance(cell, (seed.x, seed.y));
        if dist < best_dist {
            best_dist = dist;
            best = seed.region;
        }
    }
    best
}
