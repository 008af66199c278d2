//! Simple room placement
//!
//! Scatters non-overlapping rectangular rooms over a solid map and chains
//! each new room to the previously accepted one with a dogleg corridor.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::carve::{carve_dogleg, carve_room};
use crate::ascii::render_ascii;
use crate::error::{check_dimensions, MapGenError, Result};
use crate::geometry::Rect;
use crate::tile::Tile;
use crate::tilemap::Tilemap;

/// Room placement parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomPlacementParams {
    /// Number of rooms to place (default: 10)
    pub max_rooms: usize,
    /// Smallest room side (default: 4)
    pub min_size: usize,
    /// Largest room side (default: 8)
    pub max_size: usize,
    /// Candidate rooms sampled before giving up (default: 10000)
    pub max_attempts: usize,
}

impl Default for RoomPlacementParams {
    fn default() -> Self {
        Self {
            max_rooms: 10,
            min_size: 4,
            max_size: 8,
            max_attempts: 10_000,
        }
    }
}

impl RoomPlacementParams {
    fn validate(&self, width: usize, height: usize) -> Result<()> {
        if self.min_size == 0 || self.min_size > self.max_size {
            return Err(MapGenError::InvalidConfig(format!(
                "room size range [{}, {}] is empty",
                self.min_size, self.max_size
            )));
        }
        // Rooms keep one cell clear of the top/left edge and must fit at max size.
        if width < self.max_size + 2 || height < self.max_size + 2 {
            return Err(MapGenError::InvalidConfig(format!(
                "{}x{} map cannot hold a {}-cell room with a border",
                width, height, self.max_size
            )));
        }
        Ok(())
    }
}

pub struct SimpleRoomPlacement {
    width: usize,
    height: usize,
    params: RoomPlacementParams,
    rng: ChaCha8Rng,
    map: Option<Tilemap<Tile>>,
    rooms: Vec<Rect>,
}

impl SimpleRoomPlacement {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_seed(width, height, rand::random())
    }

    pub fn with_seed(width: usize, height: usize, seed: u64) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            params: RoomPlacementParams::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            map: None,
            rooms: Vec::new(),
        })
    }

    pub fn with_params(mut self, params: RoomPlacementParams) -> Self {
        self.params = params;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn params(&self) -> &RoomPlacementParams {
        &self.params
    }

    /// Place `max_rooms` rooms, rejecting any candidate that touches an
    /// accepted room.
    pub fn generate(&mut self) -> Result<&Tilemap<Tile>> {
        self.params.validate(self.width, self.height)?;
        let params = &self.params;

        let mut map = Tilemap::new_with(self.width, self.height, Tile::Wall);
        let mut rooms: Vec<Rect> = Vec::with_capacity(params.max_rooms);
        let mut attempts = 0;

        while rooms.len() < params.max_rooms {
            if attempts >= params.max_attempts {
                return Err(MapGenError::Unsatisfiable {
                    algorithm: "room placement",
                    attempts,
                });
            }
            attempts += 1;

            let w = self.rng.gen_range(params.min_size..=params.max_size);
            let h = self.rng.gen_range(params.min_size..=params.max_size);
            let x = self.rng.gen_range(1..self.width - w);
            let y = self.rng.gen_range(1..self.height - h);
            let room = Rect::new(x, y, w, h);

            if rooms.iter().any(|other| room.intersects(other)) {
                continue;
            }

            carve_room(&mut map, &room);
            if let Some(prev) = rooms.last() {
                let horizontal_first = self.rng.gen_bool(0.5);
                carve_dogleg(&mut map, prev.center(), room.center(), horizontal_first);
            }
            rooms.push(room);
        }

        debug!(
            "room placement: {} rooms after {} candidates on {}x{}",
            rooms.len(),
            attempts,
            self.width,
            self.height
        );

        self.rooms = rooms;
        Ok(&*self.map.insert(map))
    }

    /// Rooms accepted by the last successful generation, in placement order.
    pub fn rooms(&self) -> &[Rect] {
        &self.rooms
    }

    pub fn map(&self) -> Option<&Tilemap<Tile>> {
        self.map.as_ref()
    }

    pub fn render(&self) -> String {
        self.map.as_ref().map(render_ascii).unwrap_or_default()
    }
}
