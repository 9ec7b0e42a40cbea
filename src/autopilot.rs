//! Demo driver for headless runs
//!
//! Walks greedily toward the goal and shoots whatever lines up. When the
//! greedy step is blocked it commits to a perpendicular detour until the way
//! forward opens up. It only reads the level state, never the RNG, so runs
//! driven by it stay reproducible.

use glam::IVec2;

use crate::sim::{Direction, LevelState, Outcome, Rect, TickInput};

/// Max distance along the firing axis
const FIRE_RANGE: i32 = 64;
/// Max offset across the firing axis
const ALIGN_SLACK: i32 = 8;
/// Detour steps before giving up and going greedy again
const DETOUR_LIMIT: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Detour {
    /// Direction that was blocked
    toward: Direction,
    /// Direction being walked instead
    side: Direction,
    steps: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    detour: Option<Detour>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input for the next tick of `state`
    pub fn input_for(&mut self, state: &LevelState) -> TickInput {
        let mut input = TickInput::default();
        if state.outcome != Outcome::Playing || state.player.dead {
            self.detour = None;
            return input;
        }
        aim(state, &mut input);
        if let Some(direction) = self.next_step(state) {
            input.set_moving(direction, true);
        }
        input
    }

    fn next_step(&mut self, state: &LevelState) -> Option<Direction> {
        let pos = state.player.pos;
        let map = &state.level.map;
        let free = |direction: Direction| map.movement_allowed(pos + direction.delta());

        if let Some(mut detour) = self.detour.take() {
            if free(detour.toward) {
                return Some(detour.toward);
            }
            if detour.steps < DETOUR_LIMIT {
                if !free(detour.side) {
                    detour.side = opposite(detour.side);
                }
                if free(detour.side) {
                    detour.steps += 1;
                    self.detour = Some(detour);
                    return Some(detour.side);
                }
            }
            log::debug!(
                "Autopilot abandoned detour at ({}, {}) after {} steps",
                pos.x,
                pos.y,
                detour.steps
            );
        }

        let delta = goal_point(&state.level.goal) - pos;
        let horizontal = axis_step(delta.x, Direction::Left, Direction::Right);
        let vertical = axis_step(delta.y, Direction::Up, Direction::Down);
        let preferred = horizontal.or(vertical)?;
        if free(preferred) {
            return Some(preferred);
        }
        if let Some(other) = vertical.filter(|&v| v != preferred && free(v)) {
            return Some(other);
        }

        let side = perpendicular(preferred).into_iter().find(|&d| free(d))?;
        log::debug!(
            "Autopilot blocked going {preferred:?} at ({}, {}), detouring {side:?}",
            pos.x,
            pos.y
        );
        self.detour = Some(Detour {
            toward: preferred,
            side,
            steps: 1,
        });
        Some(side)
    }
}

/// Fire at every roaming hound lined up on either axis
fn aim(state: &LevelState, input: &mut TickInput) {
    let origin = state.player.pos;
    for hound in state.hounds.iter().filter(|h| h.is_roaming()) {
        let d = hound.pos - origin;
        if d.y.abs() <= ALIGN_SLACK && d.x.abs() <= FIRE_RANGE {
            let direction = if d.x < 0 {
                Direction::Left
            } else {
                Direction::Right
            };
            input.set_firing(direction, true);
        }
        if d.x.abs() <= ALIGN_SLACK && d.y.abs() <= FIRE_RANGE {
            let direction = if d.y < 0 {
                Direction::Up
            } else {
                Direction::Down
            };
            input.set_firing(direction, true);
        }
    }
}

/// Middle of the goal's left edge
fn goal_point(goal: &Rect) -> IVec2 {
    IVec2::new(goal.x, goal.y + goal.h / 2)
}

fn axis_step(delta: i32, negative: Direction, positive: Direction) -> Option<Direction> {
    match delta.signum() {
        -1 => Some(negative),
        1 => Some(positive),
        _ => None,
    }
}

fn opposite(direction: Direction) -> Direction {
    match direction {
        Direction::Up => Direction::Down,
        Direction::Down => Direction::Up,
        Direction::Left => Direction::Right,
        Direction::Right => Direction::Left,
    }
}

fn perpendicular(direction: Direction) -> [Direction; 2] {
    match direction {
        Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
        Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::settings::Tuning;
    use crate::sim::{Hound, HoundBreed, HoundState, LevelDef, Tile, tick};

    /// 40x30 field; a wall in tile column 10 covers rows 0..15
    fn walled_field() -> LevelState {
        let rows = (0..30)
            .map(|row| {
                let mut line = ".".repeat(40);
                if row < 15 {
                    line.replace_range(10..11, "#");
                }
                line
            })
            .collect();
        let def = LevelDef {
            name: "walled".into(),
            legend: BTreeMap::from([
                (".".to_string(), Tile(2, 10)),
                ("#".to_string(), Tile(0, 10)),
            ]),
            walkable: vec![Tile(2, 10)],
            rows,
            player_start: IVec2::new(16, 40),
            goal: Rect::new(200, 40, 0, 0),
            spawn_area: Rect::new(0, 0, 100, 100),
            hound_count: Some(0),
        };
        LevelState::new(def.build().unwrap(), Tuning::default(), 9)
    }

    fn hound_at(state: &mut LevelState, offset: IVec2) {
        let id = state.next_entity_id();
        let pos = state.player.pos + offset;
        state.hounds.push(Hound::new(id, pos, HoundBreed::Purple));
    }

    #[test]
    fn test_heads_toward_goal() {
        let state = walled_field();
        let input = Autopilot::new().input_for(&state);
        assert!(input.right);
        assert!(!input.left && !input.up && !input.down);
        assert!(!input.fire_right);
    }

    #[test]
    fn test_fires_along_aligned_axes() {
        let mut state = walled_field();
        hound_at(&mut state, IVec2::new(30, 4));
        hound_at(&mut state, IVec2::new(-3, -40));
        let input = Autopilot::new().input_for(&state);
        assert!(input.fire_right);
        assert!(input.fire_up);
        assert!(!input.fire_left && !input.fire_down);
    }

    #[test]
    fn test_ignores_far_and_burning_hounds() {
        let mut state = walled_field();
        hound_at(&mut state, IVec2::new(100, 0));
        hound_at(&mut state, IVec2::new(-20, 0));
        state.hounds[1].state = HoundState::Burning { ticks_left: 10 };
        let input = Autopilot::new().input_for(&state);
        assert_eq!(
            (input.fire_up, input.fire_down, input.fire_left, input.fire_right),
            (false, false, false, false)
        );
    }

    #[test]
    fn test_idle_once_caught() {
        let mut state = walled_field();
        state.player.dead = true;
        hound_at(&mut state, IVec2::new(20, 0));
        assert_eq!(Autopilot::new().input_for(&state), TickInput::default());
    }

    #[test]
    fn test_detours_around_wall_to_goal() {
        let mut state = walled_field();
        let mut pilot = Autopilot::new();
        for _ in 0..2000 {
            let input = pilot.input_for(&state);
            tick(&mut state, &input);
            if state.outcome != Outcome::Playing {
                break;
            }
        }
        assert_eq!(state.outcome, Outcome::Won);
        assert_eq!(state.player.pos, IVec2::new(200, 40));
    }

    #[test]
    fn test_runs_are_reproducible() {
        let run = || {
            let level = LevelDef::builtin().unwrap().build().unwrap();
            let mut state = LevelState::new(level, Tuning::default(), 77);
            let mut pilot = Autopilot::new();
            for _ in 0..300 {
                let input = pilot.input_for(&state);
                tick(&mut state, &input);
            }
            serde_json::to_string(&state).unwrap()
        };
        assert_eq!(run(), run());
    }
}
