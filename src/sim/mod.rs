//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per frame
//! - Seeded RNG only
//! - Stable iteration order (hounds by entity ID)
//! - No rendering or platform dependencies

pub mod camera;
pub mod geometry;
pub mod level;
pub mod state;
pub mod strike;
pub mod tick;
pub mod tilemap;

pub use camera::Camera;
pub use geometry::Rect;
pub use level::{Level, LevelDef, LevelError};
pub use state::{
    Direction, Facing, GameEvent, Hound, HoundBreed, HoundState, LevelState, Outcome, Player, Shot,
};
pub use strike::{MissileStrike, StrikePhase};
pub use tick::{TickInput, tick};
pub use tilemap::{DEFAULT_WALKABLE, Tile, TileMap};
