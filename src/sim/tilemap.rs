//! Tile grid and walkability
//!
//! Actors are 16x16 but only their feet touch the ground: an actor may stand
//! at a pixel position when the tiles under both feet are walkable.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::TILE_SIZE;
use crate::leg_tiles;

/// A tile, identified by its coordinates on the tile sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile(pub u8, pub u8);

/// Ground tiles actors can stand on unless a level says otherwise
pub const DEFAULT_WALKABLE: [Tile; 2] = [Tile(2, 10), Tile(3, 10)];

/// Row-major grid of tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    walkable: Vec<Tile>,
}

impl TileMap {
    /// Build a map from row-major tiles. Returns `None` when the tile count
    /// does not match the dimensions.
    pub fn new(width: i32, height: i32, tiles: Vec<Tile>, walkable: Vec<Tile>) -> Option<Self> {
        if width < 0 || height < 0 || tiles.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles,
            walkable,
        })
    }

    /// Uniform map, handy for tests and empty arenas
    pub fn filled(width: i32, height: i32, tile: Tile, walkable: Vec<Tile>) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![tile; (width * height) as usize],
            walkable,
        }
    }

    /// Width in tiles
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in tiles
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn walkable_tiles(&self) -> &[Tile] {
        &self.walkable
    }

    /// Map extent in pixels, origin at (0, 0)
    pub fn pixel_bounds(&self) -> Rect {
        Rect::new(0, 0, self.width * TILE_SIZE, self.height * TILE_SIZE)
    }

    /// Tile at a tile coordinate; `None` outside the map
    pub fn tile_at(&self, tile: IVec2) -> Option<Tile> {
        self.index_of(tile).map(|idx| self.tiles[idx])
    }

    /// Overwrite a tile; out-of-map coordinates are ignored
    pub fn set_tile(&mut self, tile: IVec2, value: Tile) {
        if let Some(idx) = self.index_of(tile) {
            self.tiles[idx] = value;
        }
    }

    fn index_of(&self, tile: IVec2) -> Option<usize> {
        if tile.x < 0 || tile.y < 0 || tile.x >= self.width || tile.y >= self.height {
            return None;
        }
        Some((tile.y * self.width + tile.x) as usize)
    }

    /// Whether the tile at a tile coordinate can be stood on
    pub fn is_walkable_tile(&self, tile: IVec2) -> bool {
        self.tile_at(tile)
            .is_some_and(|t| self.walkable.contains(&t))
    }

    /// Whether a 16x16 actor may occupy the pixel position `pos`
    pub fn movement_allowed(&self, pos: IVec2) -> bool {
        leg_tiles(pos)
            .iter()
            .all(|&tile| self.is_walkable_tile(tile))
    }
}
