//! Fixed timestep simulation tick
//!
//! Advances a level by one frame. Processing order:
//!   1. Missile strike (once the player has been caught)
//!   2. Goal check at the current position
//!   3. Player movement (up, down, left, right)
//!   4. Firing
//!   5. Camera follow
//!   6. Pack spawn when no hounds are left
//!   7. Hound patrol + player contact
//!   8. Burnt-out hound removal
//!   9. Shot movement + hits
//!  10. Spent / off-screen shot removal

use serde::{Deserialize, Serialize};

use super::state::{Direction, GameEvent, LevelState, Outcome, Shot};
use super::strike::MissileStrike;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickInput {
    /// Held movement
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Held fire; one shot per direction per tick
    pub fire_up: bool,
    pub fire_down: bool,
    pub fire_left: bool,
    pub fire_right: bool,
    /// Pressed this frame
    pub start: bool,
    pub restart: bool,
    pub quit: bool,
}

impl TickInput {
    pub fn is_moving(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn is_firing(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.fire_up,
            Direction::Down => self.fire_down,
            Direction::Left => self.fire_left,
            Direction::Right => self.fire_right,
        }
    }

    pub fn set_moving(&mut self, direction: Direction, on: bool) {
        match direction {
            Direction::Up => self.up = on,
            Direction::Down => self.down = on,
            Direction::Left => self.left = on,
            Direction::Right => self.right = on,
        }
    }

    pub fn set_firing(&mut self, direction: Direction, on: bool) {
        match direction {
            Direction::Up => self.fire_up = on,
            Direction::Down => self.fire_down = on,
            Direction::Left => self.fire_left = on,
            Direction::Right => self.fire_right = on,
        }
    }
}

/// Advance the level by one tick, returning what happened
pub fn tick(state: &mut LevelState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.outcome != Outcome::Playing {
        return events;
    }
    state.time_ticks += 1;

    if let Some(strike) = state.strike.as_mut() {
        strike.advance();
        if strike.is_finished() {
            state.outcome = Outcome::Lost;
            log::info!("Strike finished at tick {}, level lost", state.time_ticks);
            events.push(GameEvent::StrikeFinished);
            return events;
        }
    }

    if !state.player.dead && state.level.is_goal(state.player.pos) {
        state.outcome = Outcome::Won;
        log::info!(
            "Goal reached at tick {} with {} kills",
            state.time_ticks,
            state.kills
        );
        events.push(GameEvent::GoalReached);
        return events;
    }

    move_player(state, input);
    fire(state, input, &mut events);
    state.camera.follow(state.player.pos, &state.level.map);
    spawn_pack_if_empty(state, &mut events);
    update_hounds(state, &mut events);
    remove_gone_hounds(state, &mut events);
    update_shots(state, &mut events);
    remove_spent_shots(state);

    events
}

fn move_player(state: &mut LevelState, input: &TickInput) {
    for direction in Direction::ALL {
        if input.is_moving(direction) {
            state.player.try_move(direction.delta(), &state.level.map);
        }
    }
}

fn fire(state: &mut LevelState, input: &TickInput, events: &mut Vec<GameEvent>) {
    if state.player.dead {
        return;
    }
    for direction in Direction::ALL {
        if input.is_firing(direction) {
            state.shots.push(Shot::fire(state.player.pos, direction));
            events.push(GameEvent::ShotFired { direction });
        }
    }
}

fn spawn_pack_if_empty(state: &mut LevelState, events: &mut Vec<GameEvent>) {
    if !state.hounds.is_empty() || state.pack_size() == 0 {
        return;
    }
    if state.packs > 0 && !state.tuning.respawn_pack_when_cleared {
        return;
    }
    let count = state.spawn_pack();
    log::info!(
        "Pack {} released: {count} hounds (seed {})",
        state.packs,
        state.seed
    );
    events.push(GameEvent::PackSpawned { count });
}

fn update_hounds(state: &mut LevelState, events: &mut Vec<GameEvent>) {
    let map = &state.level.map;
    let player = &mut state.player;
    for hound in state.hounds.iter_mut() {
        hound.update(map);
        if player.dead || !hound.is_roaming() {
            continue;
        }
        if hound.bounds().overlaps(&player.bounds()) {
            player.dead = true;
            state.strike = Some(MissileStrike::new(
                player.pos,
                state.camera.pos.y,
                &state.tuning,
            ));
            log::info!(
                "Player caught by hound {} at ({}, {}), strike inbound",
                hound.id,
                player.pos.x,
                player.pos.y
            );
            events.push(GameEvent::PlayerCaught { hound_id: hound.id });
        }
    }
}

fn remove_gone_hounds(state: &mut LevelState, events: &mut Vec<GameEvent>) {
    state.hounds.retain(|hound| {
        if hound.is_gone() {
            events.push(GameEvent::HoundRemoved { hound_id: hound.id });
            false
        } else {
            true
        }
    });
}

fn update_shots(state: &mut LevelState, events: &mut Vec<GameEvent>) {
    let burn_ticks = state.tuning.burn_ticks;
    for shot in state.shots.iter_mut() {
        shot.advance();
        // A shot passes through every roaming hound it touches this tick
        for hound in state.hounds.iter_mut() {
            if hound.is_roaming() && shot.touches(hound) && hound.hit(burn_ticks) {
                shot.hit_something = true;
                state.kills += 1;
                log::debug!("Hound {} hit, {} kills", hound.id, state.kills);
                events.push(GameEvent::HoundHit { hound_id: hound.id });
            }
        }
    }
}

fn remove_spent_shots(state: &mut LevelState) {
    let view = state.camera.view();
    state
        .shots
        .retain(|shot| !shot.hit_something && shot.is_within(&view));
}
