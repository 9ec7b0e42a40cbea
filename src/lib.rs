//! Hound Run - a tile-based scrolling arcade game
//!
//! Core modules:
//! - `sim`: Deterministic level simulation (movement, collisions, hounds, strike)
//! - `scene`: Intro / level / lost / final scene switching
//! - `input`: Keyboard state and key bindings
//! - `view`: Render snapshot for a drawing backend
//! - `settings`: Tuning and bindings loaded from JSON
//! - `autopilot`: Demo driver for headless runs
//! - `script`: Recorded input sequences for headless runs

pub mod autopilot;
pub mod input;
pub mod scene;
pub mod script;
pub mod settings;
pub mod sim;
pub mod view;

pub use autopilot::Autopilot;
pub use input::{Action, Key, KeyBindings, KeyState};
pub use scene::{Scene, SceneManager};
pub use script::{InputScript, ScriptError, ScriptStep};
pub use settings::{Settings, SettingsError, Tuning};
pub use view::{DrawCmd, Frame, build_frame};

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Frames per second of the fixed update loop
    pub const TICK_RATE: u32 = 30;

    /// Window dimensions
    pub const WINDOW_WIDTH: i32 = 128;
    pub const WINDOW_HEIGHT: i32 = 128;

    /// Playfield viewport (the HUD strip sits below it)
    pub const SCREEN_WIDTH: i32 = 128;
    pub const SCREEN_HEIGHT: i32 = 96;

    /// Tile edge in pixels
    pub const TILE_SIZE: i32 = 8;
    /// Sprite edge for player and hounds
    pub const ACTOR_SIZE: i32 = 16;
    /// Feet are sampled this many tiles below the sprite origin
    pub const LEG_ROW_OFFSET: i32 = 2;
    /// Right foot is this many tiles right of the left foot
    pub const LEG_SPAN: i32 = 2;

    /// Player spawn
    pub const PLAYER_START: (i32, i32) = (64, 64 * 3);

    /// Shot pixel offsets relative to the player sprite origin
    pub const SHOT_LEFT_OFFSET: i32 = 5;
    pub const SHOT_RIGHT_OFFSET: i32 = 8;
    pub const SHOT_ROW_OFFSET: i32 = 3;

    /// Hound defaults
    pub const HOUND_COUNT: u32 = 300;
    pub const HOUND_BURN_TICKS: u32 = 30;
    pub const SPAWN_ATTEMPTS: u32 = 10_000;

    /// Missile strike
    pub const MISSILE_X_OFFSET: i32 = 4;
    pub const MISSILE_STOP_ABOVE: i32 = 8;
    pub const MISSILE_DESCENT_PERIOD: u32 = 3;
    pub const EXPLOSION_FRAME_TICKS: u32 = 10;
    pub const EXPLOSION_FRAMES: u32 = 3;
    pub const MISSILE_WIDTH: i32 = 8;
    pub const MISSILE_HEIGHT: i32 = 24;
    pub const EXPLOSION_SIZE: i32 = 24;
    pub const EXPLOSION_X_OFFSET: i32 = 12;
}

/// Sprite sheet and tilemap source coordinates
pub mod sheet {
    pub const PLAYER: (i32, i32) = (0, 16);
    pub const HOUND_GINGER: (i32, i32) = (0, 96);
    pub const HOUND_PURPLE: (i32, i32) = (16, 96);
    pub const HOUND_SCRUFFY: (i32, i32) = (32, 96);
    /// Burning frames, hottest first
    pub const BURNING: [(i32, i32); 4] = [(0, 112), (16, 112), (32, 112), (48, 112)];
    pub const MISSILE: (i32, i32) = (0, 136);
    /// Explosion frames indexed by `countdown / EXPLOSION_FRAME_TICKS`
    pub const EXPLOSION: [(i32, i32); 3] = [(16, 8), (48, 8), (96, 8)];

    /// Full-screen tilemap backdrops
    pub const INTRO_BACKDROP: (i32, i32) = (0, 40 * 8);
    pub const LOST_BACKDROP: (i32, i32) = (0, 56 * 8);
    pub const FINAL_BACKDROP: (i32, i32) = (0, 72 * 8);
}

/// Palette indices used by the view
pub mod palette {
    pub const BACKGROUND: u8 = 5;
    pub const HUD: u8 = 1;
    pub const TEXT: u8 = 7;
    pub const SHOT: u8 = 8;
}

/// Convert a pixel position to the tile that contains it (floor division)
#[inline]
pub fn pixel_to_tile(pos: IVec2) -> IVec2 {
    IVec2::new(
        pos.x.div_euclid(consts::TILE_SIZE),
        pos.y.div_euclid(consts::TILE_SIZE),
    )
}

/// Tiles under the left and right foot of a 16x16 actor at `pos`
#[inline]
pub fn leg_tiles(pos: IVec2) -> [IVec2; 2] {
    let tile = pixel_to_tile(pos);
    let left = tile + IVec2::new(0, consts::LEG_ROW_OFFSET);
    let right = left + IVec2::new(consts::LEG_SPAN, 0);
    [left, right]
}
