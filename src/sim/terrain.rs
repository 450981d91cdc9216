//! Terrain tiles and the per-level grid index
//!
//! Tiles come from the external course generator and never change after the
//! level is built. Lookups round continuous coordinates to the nearest cell.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::VOID_FLOOR;
use crate::error::GolfError;

/// Surface type of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainKind {
    #[default]
    Fairway,
    Rough,
    Sand,
    Water,
    Green,
    Gravel,
    Tree,
    Obstacle,
    Empty,
}

impl TerrainKind {
    /// Collider radius for kinds that block the ball horizontally
    pub fn collider_radius(&self) -> Option<f32> {
        match self {
            TerrainKind::Tree => Some(crate::consts::TREE_RADIUS),
            TerrainKind::Obstacle => Some(crate::consts::OBSTACLE_RADIUS),
            _ => None,
        }
    }
}

/// One cell of the playing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainTile {
    pub x: i32,
    pub z: i32,
    pub height: f32,
    pub kind: TerrainKind,
}

impl TerrainTile {
    pub fn new(x: i32, z: i32, height: f32, kind: TerrainKind) -> Self {
        Self { x, z, height, kind }
    }

    /// Top-center of the tile in world space
    pub fn surface(&self) -> Vec3 {
        Vec3::new(self.x as f32, self.height, self.z as f32)
    }
}

/// Cell containing a continuous coordinate
#[inline]
pub fn cell_of(x: f32, z: f32) -> (i32, i32) {
    (x.round() as i32, z.round() as i32)
}

/// O(1) lookup from grid cell to tile, built once per level
#[derive(Debug, Clone, Default)]
pub struct TerrainIndex {
    tiles: HashMap<(i32, i32), TerrainTile>,
}

impl TerrainIndex {
    /// Index the given tiles; two tiles on the same cell are rejected
    pub fn build(tiles: impl IntoIterator<Item = TerrainTile>) -> Result<Self, GolfError> {
        let iter = tiles.into_iter();
        let mut map = HashMap::with_capacity(iter.size_hint().0);
        for tile in iter {
            if map.insert((tile.x, tile.z), tile).is_some() {
                return Err(GolfError::DuplicateTile { x: tile.x, z: tile.z });
            }
        }
        Ok(Self { tiles: map })
    }

    /// Tile under a continuous position, `None` for void
    #[inline]
    pub fn lookup(&self, x: f32, z: f32) -> Option<&TerrainTile> {
        self.tiles.get(&cell_of(x, z))
    }

    /// Tile at an exact cell
    #[inline]
    pub fn get(&self, x: i32, z: i32) -> Option<&TerrainTile> {
        self.tiles.get(&(x, z))
    }

    /// Floor height under a position (very low for void)
    #[inline]
    pub fn floor_at(&self, x: f32, z: f32) -> f32 {
        self.lookup(x, z).map_or(VOID_FLOOR, |t| t.height)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// A playable level: terrain plus tee and hole
#[derive(Debug, Clone)]
pub struct Level {
    pub terrain: TerrainIndex,
    /// Ball spawn point (on the tee tile surface)
    pub tee: Vec3,
    /// Hole center (on the hole tile surface)
    pub hole: Vec3,
}

impl Level {
    /// Build a level; tee and hole must sit on existing tiles
    pub fn new(
        tiles: impl IntoIterator<Item = TerrainTile>,
        tee: (i32, i32),
        hole: (i32, i32),
    ) -> Result<Self, GolfError> {
        let terrain = TerrainIndex::build(tiles)?;
        let tee = surface_of(&terrain, tee)?;
        let hole = surface_of(&terrain, hole)?;
        log::info!(
            "Level built: {} tiles, tee {:?}, hole {:?}",
            terrain.len(),
            tee,
            hole
        );
        Ok(Self { terrain, tee, hole })
    }
}

fn surface_of(terrain: &TerrainIndex, (x, z): (i32, i32)) -> Result<Vec3, GolfError> {
    terrain
        .get(x, z)
        .map(TerrainTile::surface)
        .ok_or(GolfError::MissingTile { x, z })
}

/// Rectangular grid of one kind at one height (test and demo helper)
pub fn flat_tiles(
    min: (i32, i32),
    max: (i32, i32),
    height: f32,
    kind: TerrainKind,
) -> Vec<TerrainTile> {
    let mut tiles = Vec::new();
    for x in min.0..=max.0 {
        for z in min.1..=max.1 {
            tiles.push(TerrainTile::new(x, z, height, kind));
        }
    }
    tiles
}
