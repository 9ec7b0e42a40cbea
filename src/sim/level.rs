//! Level definitions
//!
//! Levels are JSON files holding an ASCII picture of the map plus a legend
//! mapping each character to a sheet tile. The bundled level is compiled in.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Rect;
use super::tilemap::{DEFAULT_WALKABLE, Tile, TileMap};
use crate::consts::{LEG_ROW_OFFSET, PLAYER_START, TILE_SIZE};

const BUILTIN_LEVEL: &str = include_str!("../../levels/harbour.json");

/// Errors raised while loading or validating a level
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid level JSON")]
    Parse(#[from] serde_json::Error),
    #[error("level has no rows")]
    Empty,
    #[error("row {row} is {found} tiles wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("legend key {0:?} must be exactly one character")]
    BadLegendKey(String),
    #[error("character {ch:?} at row {row}, column {col} is not in the legend")]
    UnknownTile { ch: char, row: usize, col: usize },
    #[error("player start ({x}, {y}) is not walkable")]
    StartNotWalkable { x: i32, y: i32 },
    #[error("{field} rectangle {rect:?} has a negative size or runs past the coordinate range")]
    BadRect { field: &'static str, rect: Rect },
    #[error("no point of the goal zone can be stood on")]
    GoalUnreachable,
}

/// On-disk level format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    /// Single-character keys mapped to sheet tiles
    pub legend: BTreeMap<String, Tile>,
    #[serde(default = "default_walkable")]
    pub walkable: Vec<Tile>,
    pub rows: Vec<String>,
    #[serde(default = "default_player_start")]
    pub player_start: IVec2,
    /// Inclusive on both edges; `w == 0` pins the goal to a single column
    #[serde(default = "default_goal")]
    pub goal: Rect,
    /// Inclusive on both edges
    #[serde(default = "default_spawn_area")]
    pub spawn_area: Rect,
    /// Overrides the tuning hound count for this level
    #[serde(default)]
    pub hound_count: Option<u32>,
}

fn default_walkable() -> Vec<Tile> {
    DEFAULT_WALKABLE.to_vec()
}

fn default_player_start() -> IVec2 {
    IVec2::new(PLAYER_START.0, PLAYER_START.1)
}

fn default_goal() -> Rect {
    Rect::new(479, 32, 0, 32)
}

fn default_spawn_area() -> Rect {
    Rect::new(0, 0, 47 * 8, 15 * 8)
}

/// A validated level ready to play
#[derive(Debug, Clone, Serialize)]
pub struct Level {
    pub name: String,
    pub map: TileMap,
    pub player_start: IVec2,
    pub goal: Rect,
    pub spawn_area: Rect,
    pub hound_count: Option<u32>,
}

impl Level {
    /// Whether a player standing at `pos` has reached the goal
    pub fn is_goal(&self, pos: IVec2) -> bool {
        self.goal.contains_inclusive(pos)
    }
}

impl LevelDef {
    /// The level shipped with the game
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_json(BUILTIN_LEVEL)
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let def = Self::from_json(&json)?;
        log::info!("Loaded level {:?} from {}", def.name, path.display());
        Ok(def)
    }

    /// Validate the definition and build the tile map
    pub fn build(&self) -> Result<Level, LevelError> {
        let legend = self.char_legend()?;

        let width = self.rows.first().map(|r| r.chars().count()).ok_or(LevelError::Empty)?;
        if width == 0 {
            return Err(LevelError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * self.rows.len());
        for (row, line) in self.rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LevelError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let tile = legend
                    .get(&ch)
                    .copied()
                    .ok_or(LevelError::UnknownTile { ch, row, col })?;
                tiles.push(tile);
            }
        }

        let map = TileMap::new(
            width as i32,
            self.rows.len() as i32,
            tiles,
            self.walkable.clone(),
        )
        .ok_or(LevelError::Empty)?;

        if !map.movement_allowed(self.player_start) {
            return Err(LevelError::StartNotWalkable {
                x: self.player_start.x,
                y: self.player_start.y,
            });
        }

        for (field, rect) in [("goal", self.goal), ("spawn_area", self.spawn_area)] {
            if !rect.is_well_formed() {
                return Err(LevelError::BadRect { field, rect });
            }
        }

        // Only origins in this region can have both feet on the map
        let bounds = map.pixel_bounds();
        let footing = Rect::new(0, -LEG_ROW_OFFSET * TILE_SIZE, bounds.w, bounds.h);
        let goal = self.goal;
        let xs = goal.x.max(footing.x)..=goal.right().min(footing.right() - 1);
        let ys = goal.y.max(footing.y)..=goal.bottom().min(footing.bottom() - 1);
        let goal_has_footing = ys
            .flat_map(|y| xs.clone().map(move |x| IVec2::new(x, y)))
            .any(|p| map.movement_allowed(p));
        if !goal_has_footing {
            return Err(LevelError::GoalUnreachable);
        }

        Ok(Level {
            name: self.name.clone(),
            map,
            player_start: self.player_start,
            goal,
            spawn_area: self.spawn_area,
            hound_count: self.hound_count,
        })
    }

    fn char_legend(&self) -> Result<BTreeMap<char, Tile>, LevelError> {
        self.legend
            .iter()
            .map(|(key, tile)| {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Ok((ch, *tile)),
                    _ => Err(LevelError::BadLegendKey(key.clone())),
                }
            })
            .collect()
    }
}
