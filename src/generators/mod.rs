//! Map generation algorithms
//!
//! Each generator owns its RNG and its last map:
//!
//! - Simple room placement with dogleg corridors
//! - BSP (Binary Space Partitioning) for room layouts
//! - Cellular automata for caves
//! - Drunkard's walk carving
//! - Diffusion-limited aggregation
//! - Voronoi regions
//! - Multi-octave Perlin noise height fields

pub mod bsp;
pub mod carve;
pub mod cellular;
pub mod dla;
pub mod drunkard;
pub mod perlin;
pub mod rooms;
pub mod voronoi;

pub use bsp::{BinarySpacePartition, BspNode, BspParams};
pub use cellular::CellularAutomata;
pub use dla::DiffusionLimitedAggregation;
pub use drunkard::DrunkardsWalk;
pub use perlin::PerlinNoise;
pub use rooms::{RoomPlacementParams, SimpleRoomPlacement};
pub use voronoi::{DistanceMetric, VoronoiDiagram, VoronoiSeed};
