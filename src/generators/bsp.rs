//! Binary Space Partitioning (BSP) for room generation
//!
//! Recursively splits the map into a binary tree of regions, carves one
//! room inside every leaf, then walks the tree bottom-up joining the two
//! halves of each split with a dogleg corridor.

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

/// BSP generation parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BspParams {
    /// Minimum partition side; nodes at most twice this size stop splitting (default: 6)
    pub min_size: usize,
    /// Free cells kept between a room and its partition edge (default: 1)
    pub gutter: usize,
    /// Smallest room side (default: 3)
    pub min_room_size: usize,
    /// Aspect ratio beyond which the longer side is always split (default: 1.25)
    pub split_ratio: f32,
}

impl Default for BspParams {
    fn default() -> Self {
        Self {
            min_size: 6,
            gutter: 1,
            min_room_size: 3,
            split_ratio: 1.25,
        }
    }
}

impl BspParams {
    fn validate(&self, width: usize, height: usize) -> Result<()> {
        if self.min_room_size == 0 {
            return Err(MapGenError::InvalidConfig("min_room_size must be at least 1".into()));
        }
        if !self.split_ratio.is_finite() || self.split_ratio < 1.0 {
            return Err(MapGenError::InvalidConfig(format!(
                "split_ratio {} must be a finite value >= 1",
                self.split_ratio
            )));
        }
        // Every leaf is at least min_size wide and must leave room for the gutter.
        let smallest_leaf = self.min_room_size + 2 * self.gutter + 1;
        if self.min_size < smallest_leaf {
            return Err(MapGenError::InvalidConfig(format!(
                "min_size {} cannot hold a {}-cell room with gutter {}",
                self.min_size, self.min_room_size, self.gutter
            )));
        }
        if width < self.min_size || height < self.min_size {
            return Err(MapGenError::InvalidConfig(format!(
                "{}x{} map is smaller than the minimum partition {}",
                width, height, self.min_size
            )));
        }
        Ok(())
    }
}

/// A node of the partition tree.
///
/// Children always come in pairs; only leaves carry a room.
#[derive(Clone, Debug)]
pub struct BspNode {
    pub rect: Rect,
    children: Option<Box<(BspNode, BspNode)>>,
    /// Room carved in this leaf (if any)
    pub room: Option<Rect>,
}

impl BspNode {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            children: None,
            room: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn left(&self) -> Option<&BspNode> {
        self.children.as_ref().map(|c| &c.0)
    }

    pub fn right(&self) -> Option<&BspNode> {
        self.children.as_ref().map(|c| &c.1)
    }

    fn set_children(&mut self, left: BspNode, right: BspNode) {
        self.children = Some(Box::new((left, right)));
    }

    /// All leaves, left to right.
    pub fn leaves(&self) -> Vec<&BspNode> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }
}

fn collect_leaves<'a>(node: &'a BspNode, out: &mut Vec<&'a BspNode>) {
    match node.children.as_deref() {
        Some((left, right)) => {
            collect_leaves(left, out);
            collect_leaves(right, out);
        }
        None => out.push(node),
    }
}

/// Generate a BSP tree for a given area
pub fn generate_bsp_tree(area: Rect, params: &BspParams, rng: &mut ChaCha8Rng) -> BspNode {
    let mut root = BspNode::new(area);
    split_node(&mut root, params, rng);
    root
}

/// Recursively split a BSP node
fn split_node(node: &mut BspNode, params: &BspParams, rng: &mut ChaCha8Rng) {
    let min_size = params.min_size;
    let Rect { x, y, width, height } = node.rect;

    if width <= min_size * 2 && height <= min_size * 2 {
        return;
    }

    // Prefer cutting across the longer side once the node gets elongated
    let width_f = width as f32;
    let height_f = height as f32;
    let mut split_vertically = rng.gen_bool(0.5);
    if width > height && width_f / height_f >= params.split_ratio {
        split_vertically = true;
    } else if height > width && height_f / width_f >= params.split_ratio {
        split_vertically = false;
    }

    let length = if split_vertically { width } else { height };
    // Both halves must keep at least min_size cells
    if length <= min_size * 2 {
        return;
    }
    let split = rng.gen_range(min_size..=length - min_size);
    if split >= length - 1 {
        return;
    }

    let (mut left, mut right) = if split_vertically {
        (
            BspNode::new(Rect::new(x, y, split, height)),
            BspNode::new(Rect::new(x + split, y, width - split, height)),
        )
    } else {
        (
            BspNode::new(Rect::new(x, y, width, split)),
            BspNode::new(Rect::new(x, y + split, width, height - split)),
        )
    };

    split_node(&mut left, params, rng);
    split_node(&mut right, params, rng);
    node.set_children(left, right);
}

/// Create one room in every leaf and carve it into the map
fn create_rooms_in_bsp(
    node: &mut BspNode,
    params: &BspParams,
    map: &mut Tilemap<Tile>,
    rooms: &mut Vec<Rect>,
    rng: &mut ChaCha8Rng,
) {
    if let Some(children) = node.children.as_deref_mut() {
        let (left, right) = children;
        create_rooms_in_bsp(left, params, map, rooms, rng);
        create_rooms_in_bsp(right, params, map, rooms, rng);
        return;
    }

    let gutter = params.gutter;
    let leaf = node.rect;
    let room_width = rng.gen_range(params.min_room_size..leaf.width - gutter * 2);
    let room_height = rng.gen_range(params.min_room_size..leaf.height - gutter * 2);
    let room_x = leaf.x + gutter + rng.gen_range(0..(leaf.width - room_width - gutter * 2).max(1));
    let room_y = leaf.y + gutter + rng.gen_range(0..(leaf.height - room_height - gutter * 2).max(1));

    let room = Rect::new(room_x, room_y, room_width, room_height);
    carve_room(map, &room);
    node.room = Some(room);
    rooms.push(room);
}

/// Connect the two halves of every split, deepest splits first
fn connect_rooms_bsp(node: &BspNode, map: &mut Tilemap<Tile>, rng: &mut ChaCha8Rng) {
    let Some((left, right)) = node.children.as_deref() else {
        return;
    };

    connect_rooms_bsp(left, map, rng);
    connect_rooms_bsp(right, map, rng);

    if let (Some(a), Some(b)) = (first_room(left), first_room(right)) {
        let horizontal_first = rng.gen_bool(0.5);
        carve_dogleg(map, a.center(), b.center(), horizontal_first);
    }
}

/// First room found depth-first: the node's own, then left, then right.
///
/// Not necessarily the room nearest to the sibling subtree.
fn first_room(node: &BspNode) -> Option<Rect> {
    if let Some(room) = node.room {
        return Some(room);
    }

    let (left, right) = node.children.as_deref()?;
    first_room(left).or_else(|| first_room(right))
}

pub struct BinarySpacePartition {
    width: usize,
    height: usize,
    params: BspParams,
    rng: ChaCha8Rng,
    map: Option<Tilemap<Tile>>,
    rooms: Vec<Rect>,
}

impl BinarySpacePartition {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_seed(width, height, rand::random())
    }

    pub fn with_seed(width: usize, height: usize, seed: u64) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            params: BspParams::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            map: None,
            rooms: Vec::new(),
        })
    }

    pub fn with_params(mut self, params: BspParams) -> Self {
        self.params = params;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn params(&self) -> &BspParams {
        &self.params
    }

    pub fn generate(&mut self) -> Result<&Tilemap<Tile>> {
        let (map, rooms, _tree) = self.generate_with_tree()?;
        self.rooms = rooms;
        Ok(&*self.map.insert(map))
    }

    /// Partition, carve and connect; the tree is handed back for inspection.
    fn generate_with_tree(&mut self) -> Result<(Tilemap<Tile>, Vec<Rect>, BspNode)> {
        self.params.validate(self.width, self.height)?;

        let mut map = Tilemap::new_with(self.width, self.height, Tile::Wall);
        let mut rooms = Vec::new();

        let area = Rect::new(0, 0, self.width, self.height);
        let mut root = generate_bsp_tree(area, &self.params, &mut self.rng);
        create_rooms_in_bsp(&mut root, &self.params, &mut map, &mut rooms, &mut self.rng);
        connect_rooms_bsp(&root, &mut map, &mut self.rng);

        debug!(
            "bsp: {} leaves on {}x{}, {} floor cells",
            rooms.len(),
            self.width,
            self.height,
            map.count(|t| t.is_floor())
        );

        Ok((map, rooms, root))
    }

    /// One room per partition leaf from the last successful generation.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_support::flood_fill_floor;

    fn check_tree(node: &BspNode, params: &BspParams) {
        match (node.left(), node.right()) {
            (Some(left), Some(right)) => {
                assert!(node.room.is_none(), "internal node carries a room");
                assert_eq!(left.rect.area() + right.rect.area(), node.rect.area());
                check_tree(left, params);
                check_tree(right, params);
            }
            (None, None) => {
                let room = node.room.expect("leaf without room");
                assert!(
                    node.rect.contains_with_margin(&room, params.gutter),
                    "room {:?} not inside leaf {:?} with gutter",
                    room,
                    node.rect
                );
                assert!(room.width >= params.min_room_size);
                assert!(room.height >= params.min_room_size);
            }
            _ => panic!("node with a single child"),
        }
    }

    #[test]
    fn test_every_leaf_has_room_within_gutter() {
        for seed in 0..20 {
            let mut gen = BinarySpacePartition::with_seed(80, 50, seed).unwrap();
            let (_, rooms, tree) = gen.generate_with_tree().unwrap();
            check_tree(&tree, &BspParams::default());
            assert_eq!(rooms.len(), tree.leaves().len());
        }
    }

    #[test]
    fn test_leaf_area_never_exceeds_root() {
        let mut gen = BinarySpacePartition::with_seed(64, 64, 11).unwrap();
        let (_, _, tree) = gen.generate_with_tree().unwrap();
        let leaf_area: usize = tree.leaves().iter().map(|l| l.rect.area()).sum();
        assert!(leaf_area <= tree.rect.area());
        assert_eq!(tree.rect, Rect::new(0, 0, 64, 64));
    }

    #[test]
    fn test_partitions_respect_min_size() {
        let mut gen = BinarySpacePartition::with_seed(100, 60, 5).unwrap();
        let (_, _, tree) = gen.generate_with_tree().unwrap();
        for leaf in tree.leaves() {
            assert!(leaf.rect.width >= 6 && leaf.rect.height >= 6, "{:?}", leaf.rect);
        }
        assert!(tree.leaves().len() > 1);
    }

    #[test]
    fn test_small_map_is_single_leaf() {
        let mut gen = BinarySpacePartition::with_seed(12, 12, 1).unwrap();
        let (_, rooms, tree) = gen.generate_with_tree().unwrap();
        assert!(tree.is_leaf());
        assert_eq!(rooms.len(), 1);
    }

    #[test]
    fn test_all_rooms_connected() {
        let mut gen = BinarySpacePartition::with_seed(80, 50, 21).unwrap();
        let map = gen.generate().unwrap().clone();
        let reached = flood_fill_floor(&map, gen.rooms()[0].center(), false);
        for room in gen.rooms() {
            assert!(room.cells().all(|(x, y)| *reached.get(x, y)));
        }
        // Nothing outside rooms and corridors is open: every floor is reachable.
        assert_eq!(map.count(|t| t.is_floor()), reached.count(|&r| r));
    }

    #[test]
    fn test_first_room_prefers_left_subtree() {
        let mut root = BspNode::new(Rect::new(0, 0, 20, 10));
        let mut left = BspNode::new(Rect::new(0, 0, 10, 10));
        let mut right = BspNode::new(Rect::new(10, 0, 10, 10));
        left.room = Some(Rect::new(1, 1, 3, 3));
        right.room = Some(Rect::new(11, 1, 3, 3));
        root.set_children(left, right);
        assert_eq!(first_room(&root), Some(Rect::new(1, 1, 3, 3)));
    }

    #[test]
    fn test_same_seed_same_map() {
        let mut a = BinarySpacePartition::with_seed(70, 40, 77).unwrap();
        let mut b = BinarySpacePartition::with_seed(70, 40, 77).unwrap();
        a.generate().unwrap();
        b.generate().unwrap();
        assert_eq!(a.render(), b.render());
    }

    #[test]
    fn test_invalid_configurations() {
        let mut tiny = BinarySpacePartition::with_seed(5, 40, 1).unwrap();
        assert!(matches!(tiny.generate(), Err(MapGenError::InvalidConfig(_))));

        let cramped = BspParams { min_size: 4, ..BspParams::default() };
        let mut gen = BinarySpacePartition::with_seed(40, 40, 1).unwrap().with_params(cramped);
        assert!(matches!(gen.generate(), Err(MapGenError::InvalidConfig(_))));
        assert!(gen.map().is_none());
    }
}
