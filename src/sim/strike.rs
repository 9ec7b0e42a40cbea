//! Missile strike played after the player is caught
//!
//! Two phases: a missile drops from the top of the view toward the player,
//! then a three-frame explosion counts down. The level is lost once the
//! countdown reaches zero.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Tuning;
use crate::sheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrikePhase {
    Descending,
    Exploding,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissileStrike {
    /// Missile sprite origin in world pixels
    pub pos: IVec2,
    /// Descent stops once `pos.y` passes this row
    pub y_final: i32,
    /// Ticks spent descending
    pub counter: u32,
    /// Explosion ticks remaining
    pub countdown: u32,
    descent_period: u32,
    frame_ticks: u32,
}

impl MissileStrike {
    /// Aim at a player standing at `target`; the missile starts on the
    /// top edge of the view
    pub fn new(target: IVec2, view_top: i32, tuning: &Tuning) -> Self {
        let frame_ticks = tuning.explosion_frame_ticks.max(1);
        Self {
            pos: IVec2::new(target.x + MISSILE_X_OFFSET, view_top),
            y_final: target.y - MISSILE_STOP_ABOVE,
            counter: 0,
            countdown: frame_ticks.saturating_mul(EXPLOSION_FRAMES) - 1,
            descent_period: tuning.missile_descent_period.max(1),
            frame_ticks,
        }
    }

    pub fn phase(&self) -> StrikePhase {
        if self.pos.y <= self.y_final {
            StrikePhase::Descending
        } else if self.countdown != 0 {
            StrikePhase::Exploding
        } else {
            StrikePhase::Finished
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase() == StrikePhase::Finished
    }

    /// Advance one tick; returns the phase the strike was in
    pub fn advance(&mut self) -> StrikePhase {
        let phase = self.phase();
        match phase {
            StrikePhase::Descending => {
                self.counter += 1;
                if self.counter % self.descent_period == 0 {
                    self.pos.y += 1;
                }
            }
            StrikePhase::Exploding => self.countdown -= 1,
            StrikePhase::Finished => {}
        }
        phase
    }

    /// Explosion sheet origin for the current countdown
    pub fn explosion_sprite(&self) -> (i32, i32) {
        let idx = (self.countdown / self.frame_ticks) as usize;
        sheet::EXPLOSION[idx.min(sheet::EXPLOSION.len() - 1)]
    }

    /// Where the explosion sprite is drawn
    pub fn explosion_origin(&self) -> IVec2 {
        IVec2::new(self.pos.x - EXPLOSION_X_OFFSET, self.pos.y)
    }
}
