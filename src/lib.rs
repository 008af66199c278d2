//! Grid map generation library
//!
//! Room, cave, region and height-field generators over a shared `Tilemap`,
//! with ASCII rendering. Re-exports modules for use by the binary and tests.

pub mod ascii;
pub mod config;
pub mod error;
pub mod generators;
pub mod geometry;
pub mod seeds;
pub mod tile;
pub mod tilemap;

pub use config::{Algorithm, GeneratedMap, GeneratorParams, MapConfig};
pub use error::{MapGenError, Result};
pub use geometry::Rect;
pub use seeds::GeneratorSeeds;
pub use tile::{RegionId, Tile};
pub use tilemap::Tilemap;
