//! Viewport that follows the player

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::tilemap::TileMap;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Top-left corner of the visible playfield in world pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Camera {
    pub pos: IVec2,
}

impl Camera {
    /// Center on `target`, clamped so nothing outside the map is shown
    pub fn following(target: IVec2, map: &TileMap) -> Self {
        let mut camera = Self::default();
        camera.follow(target, map);
        camera
    }

    pub fn follow(&mut self, target: IVec2, map: &TileMap) {
        let centered = target - IVec2::new(SCREEN_WIDTH / 2, SCREEN_HEIGHT / 2);
        let view = Rect::new(centered.x, centered.y, SCREEN_WIDTH, SCREEN_HEIGHT);
        self.pos = view.clamp_origin_within(&map.pixel_bounds()).origin();
    }

    /// Visible world rectangle
    pub fn view(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    #[inline]
    pub fn to_screen(&self, world: IVec2) -> IVec2 {
        world - self.pos
    }
}
