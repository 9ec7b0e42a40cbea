//! Level state and actor types
//!
//! Everything a running level needs between ticks lives here. Positions are
//! world pixels; the camera converts to screen space only for the view.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::geometry::Rect;
use super::level::Level;
use super::strike::MissileStrike;
use super::tilemap::TileMap;
use crate::consts::*;
use crate::settings::Tuning;
use crate::sheet;

/// Firing / movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// In the order the fire keys are polled
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    #[inline]
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }
}

/// Horizontal facing. Sheet art faces left, so right-facing sprites are mirrored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn step(self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub pos: IVec2,
    /// Caught by a hound; no more movement or firing
    pub dead: bool,
}

impl Player {
    pub fn new(pos: IVec2) -> Self {
        Self { pos, dead: false }
    }

    pub fn bounds(&self) -> Rect {
        Rect::square(self.pos, ACTOR_SIZE)
    }

    /// Step by `delta` if alive and the destination is walkable
    pub fn try_move(&mut self, delta: IVec2, map: &TileMap) -> bool {
        let target = self.pos + delta;
        if self.dead || !map.movement_allowed(target) {
            return false;
        }
        self.pos = target;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoundBreed {
    Ginger,
    Purple,
    Scruffy,
}

impl HoundBreed {
    pub const ALL: [HoundBreed; 3] = [HoundBreed::Ginger, HoundBreed::Purple, HoundBreed::Scruffy];

    /// Sprite sheet origin for this breed
    pub fn sprite(self) -> (i32, i32) {
        match self {
            HoundBreed::Ginger => sheet::HOUND_GINGER,
            HoundBreed::Purple => sheet::HOUND_PURPLE,
            HoundBreed::Scruffy => sheet::HOUND_SCRUFFY,
        }
    }
}

/// Hound lifecycle: roaming until shot, then burning down to removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoundState {
    Roaming,
    Burning { ticks_left: u32 },
}

/// An enemy that patrols left and right
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hound {
    pub id: u32,
    pub pos: IVec2,
    pub facing: Facing,
    pub breed: HoundBreed,
    pub state: HoundState,
}

impl Hound {
    pub fn new(id: u32, pos: IVec2, breed: HoundBreed) -> Self {
        Self {
            id,
            pos,
            facing: Facing::Right,
            breed,
            state: HoundState::Roaming,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::square(self.pos, ACTOR_SIZE)
    }

    pub fn is_roaming(&self) -> bool {
        self.state == HoundState::Roaming
    }

    /// Burnt out and ready to be removed
    pub fn is_gone(&self) -> bool {
        self.state == HoundState::Burning { ticks_left: 0 }
    }

    /// Patrol one pixel, turning around at anything unwalkable; burning
    /// hounds stay put and count down
    pub fn update(&mut self, map: &TileMap) {
        match &mut self.state {
            HoundState::Roaming => {
                let target = self.pos + IVec2::new(self.facing.step(), 0);
                if map.movement_allowed(target) {
                    self.pos = target;
                } else {
                    self.facing = self.facing.flipped();
                }
            }
            HoundState::Burning { ticks_left } => {
                *ticks_left = ticks_left.saturating_sub(1);
            }
        }
    }

    /// Set alight; returns false if already burning
    pub fn hit(&mut self, burn_ticks: u32) -> bool {
        if !self.is_roaming() {
            return false;
        }
        self.state = HoundState::Burning {
            ticks_left: burn_ticks,
        };
        true
    }

    /// Sheet origin of the current burning frame, if burning
    pub fn burning_sprite(&self, burn_ticks: u32) -> Option<(i32, i32)> {
        let HoundState::Burning { ticks_left } = self.state else {
            return None;
        };
        let phase = ticks_left / (burn_ticks / 10).max(1);
        let frame = if phase > 4 {
            if phase % 2 == 1 { 0 } else { 1 }
        } else if phase >= 2 {
            2
        } else {
            3
        };
        Some(sheet::BURNING[frame])
    }
}

/// A pair of red pixels travelling in a straight line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shot {
    pub x1: i32,
    pub x2: i32,
    pub y: i32,
    pub direction: Direction,
    pub hit_something: bool,
}

impl Shot {
    /// Fire from a player standing at `origin`
    pub fn fire(origin: IVec2, direction: Direction) -> Self {
        Self {
            x1: origin.x + SHOT_LEFT_OFFSET,
            x2: origin.x + SHOT_RIGHT_OFFSET,
            y: origin.y + SHOT_ROW_OFFSET,
            direction,
            hit_something: false,
        }
    }

    pub fn pixels(&self) -> [IVec2; 2] {
        [IVec2::new(self.x1, self.y), IVec2::new(self.x2, self.y)]
    }

    pub fn advance(&mut self) {
        let delta = self.direction.delta();
        self.x1 += delta.x;
        self.x2 += delta.x;
        self.y += delta.y;
    }

    /// Either pixel inside the hound's box, edges included
    pub fn touches(&self, hound: &Hound) -> bool {
        let bounds = hound.bounds();
        self.pixels().iter().any(|&p| bounds.contains_inclusive(p))
    }

    /// Both pixels still on screen, away from the top row and left column
    pub fn is_within(&self, view: &Rect) -> bool {
        self.pixels()
            .iter()
            .all(|&p| view.contains(p) && p.x > view.x && p.y > view.y)
    }
}

/// How the level ended, if it has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Playing,
    Won,
    Lost,
}

/// Things that happened during a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PackSpawned { count: u32 },
    ShotFired { direction: Direction },
    HoundHit { hound_id: u32 },
    HoundRemoved { hound_id: u32 },
    PlayerCaught { hound_id: u32 },
    StrikeFinished,
    GoalReached,
}

/// Complete state of a level in progress
#[derive(Debug, Clone, Serialize)]
pub struct LevelState {
    pub seed: u64,
    #[serde(skip)]
    pub rng: Pcg32,
    pub level: Level,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub camera: Camera,
    /// Sorted by id
    pub hounds: Vec<Hound>,
    pub shots: Vec<Shot>,
    pub strike: Option<MissileStrike>,
    pub kills: u32,
    pub outcome: Outcome,
    /// Packs spawned so far
    pub packs: u32,
    next_id: u32,
}

impl LevelState {
    pub fn new(level: Level, tuning: Tuning, seed: u64) -> Self {
        let player = Player::new(level.player_start);
        let camera = Camera::following(player.pos, &level.map);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level,
            tuning,
            time_ticks: 0,
            player,
            camera,
            hounds: Vec::new(),
            shots: Vec::new(),
            strike: None,
            kills: 0,
            outcome: Outcome::Playing,
            packs: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Hounds per pack for this level
    pub fn pack_size(&self) -> u32 {
        self.level.hound_count.unwrap_or(self.tuning.hound_count)
    }

    /// Random walkable point in the spawn area, or `None` once attempts run out
    pub fn random_spawn_point(&mut self) -> Option<IVec2> {
        let area = self.level.spawn_area;
        for _ in 0..self.tuning.spawn_attempts {
            let pos = IVec2::new(
                self.rng.random_range(area.x..=area.right()),
                self.rng.random_range(area.y..=area.bottom()),
            );
            if self.level.map.movement_allowed(pos) {
                return Some(pos);
            }
        }
        None
    }

    /// Place a full pack of hounds; returns how many were placed
    pub fn spawn_pack(&mut self) -> u32 {
        let wanted = self.pack_size();
        let mut placed = 0;
        for _ in 0..wanted {
            let Some(pos) = self.random_spawn_point() else {
                break;
            };
            let breed = HoundBreed::ALL[self.rng.random_range(0..HoundBreed::ALL.len())];
            let id = self.next_entity_id();
            self.hounds.push(Hound::new(id, pos, breed));
            placed += 1;
        }
        if placed < wanted {
            log::warn!(
                "Spawn area of level {:?} ran out of footing: placed {placed}/{wanted} hounds",
                self.level.name
            );
        }
        self.packs += 1;
        placed
    }

    /// Whether the player is dead and the strike is still playing
    pub fn strike_in_progress(&self) -> bool {
        self.strike.as_ref().is_some_and(|s| !s.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tilemap::{DEFAULT_WALKABLE, Tile};

    fn open_map() -> TileMap {
        TileMap::filled(16, 16, Tile(2, 10), DEFAULT_WALKABLE.to_vec())
    }

    #[test]
    fn test_player_blocked_by_map_edge() {
        let map = open_map();
        let mut player = Player::new(IVec2::ZERO);
        assert!(!player.try_move(IVec2::NEG_X, &map));
        assert!(player.try_move(IVec2::X, &map));
        assert_eq!(player.pos, IVec2::new(1, 0));
    }

    #[test]
    fn test_dead_player_cannot_move() {
        let map = open_map();
        let mut player = Player::new(IVec2::new(8, 8));
        player.dead = true;
        assert!(!player.try_move(IVec2::X, &map));
        assert_eq!(player.pos, IVec2::new(8, 8));
    }

    #[test]
    fn test_hound_turns_at_edge_without_moving() {
        let map = open_map();
        // Right foot at tile x/8 + 2 == 15 is the last column
        let mut hound = Hound::new(1, IVec2::new(13 * 8 + 7, 0), HoundBreed::Ginger);
        hound.update(&map);
        assert_eq!(hound.pos.x, 13 * 8 + 7);
        assert_eq!(hound.facing, Facing::Left);
        hound.update(&map);
        assert_eq!(hound.pos.x, 13 * 8 + 6);
    }

    #[test]
    fn test_hound_burns_down() {
        let map = open_map();
        let mut hound = Hound::new(1, IVec2::new(8, 8), HoundBreed::Purple);
        assert!(hound.hit(3));
        assert!(!hound.hit(3));
        assert!(!hound.is_roaming());
        for _ in 0..2 {
            hound.update(&map);
            assert!(!hound.is_gone());
        }
        hound.update(&map);
        assert!(hound.is_gone());
        assert_eq!(hound.pos, IVec2::new(8, 8));
    }

    #[test]
    fn test_burning_frames() {
        let mut hound = Hound::new(1, IVec2::ZERO, HoundBreed::Scruffy);
        assert_eq!(hound.burning_sprite(30), None);

        let frame_at = |hound: &mut Hound, ticks_left| {
            hound.state = HoundState::Burning { ticks_left };
            hound.burning_sprite(30).unwrap()
        };
        // phase = ticks_left / 3
        assert_eq!(frame_at(&mut hound, 29), sheet::BURNING[0]); // phase 9
        assert_eq!(frame_at(&mut hound, 24), sheet::BURNING[1]); // phase 8
        assert_eq!(frame_at(&mut hound, 15), sheet::BURNING[0]); // phase 5
        assert_eq!(frame_at(&mut hound, 14), sheet::BURNING[2]); // phase 4
        assert_eq!(frame_at(&mut hound, 6), sheet::BURNING[2]); // phase 2
        assert_eq!(frame_at(&mut hound, 5), sheet::BURNING[3]); // phase 1
        assert_eq!(frame_at(&mut hound, 0), sheet::BURNING[3]);
    }

    #[test]
    fn test_burning_frames_short_burn() {
        // burn_ticks under 10 must not divide by zero
        let mut hound = Hound::new(1, IVec2::ZERO, HoundBreed::Ginger);
        hound.hit(4);
        assert_eq!(hound.burning_sprite(4), Some(sheet::BURNING[2]));
    }

    #[test]
    fn test_shot_hits_inclusive_edges() {
        let hound = Hound::new(1, IVec2::new(20, 20), HoundBreed::Ginger);
        // x2 = 28 + 8 = 36 is the hound's far edge
        let shot = Shot::fire(IVec2::new(28, 33), Direction::Right);
        assert_eq!(shot.pixels(), [IVec2::new(33, 36), IVec2::new(36, 36)]);
        assert!(shot.touches(&hound));

        let shot = Shot::fire(IVec2::new(29, 33), Direction::Right);
        assert_eq!(shot.x1, 34);
        assert!(shot.touches(&hound));

        let shot = Shot::fire(IVec2::new(32, 33), Direction::Right);
        assert!(!shot.touches(&hound));
    }

    #[test]
    fn test_shot_dropped_on_top_row_and_left_column() {
        let view = Rect::new(100, 50, 128, 96);
        assert!(Shot::fire(IVec2::new(110, 60), Direction::Up).is_within(&view));

        let mut shot = Shot::fire(IVec2::new(110, 60), Direction::Up);
        shot.y = 51;
        assert!(shot.is_within(&view));
        shot.y = 50;
        assert!(!shot.is_within(&view));

        let mut shot = Shot::fire(IVec2::new(110, 60), Direction::Left);
        shot.x1 = 101;
        assert!(shot.is_within(&view));
        shot.x1 = 100;
        assert!(!shot.is_within(&view));

        // Far edges are outside the covered pixels
        let mut shot = Shot::fire(IVec2::new(110, 60), Direction::Right);
        shot.x2 = 227;
        assert!(shot.is_within(&view));
        shot.x2 = 228;
        assert!(!shot.is_within(&view));
    }

    #[test]
    fn test_shot_advance() {
        let mut shot = Shot::fire(IVec2::new(10, 10), Direction::Up);
        shot.advance();
        assert_eq!((shot.x1, shot.x2, shot.y), (15, 18, 12));
        let mut shot = Shot::fire(IVec2::new(10, 10), Direction::Left);
        shot.advance();
        assert_eq!((shot.x1, shot.x2, shot.y), (14, 17, 13));
    }

    #[test]
    fn test_spawn_pack_respects_walkability() {
        let level = crate::sim::LevelDef::builtin().unwrap().build().unwrap();
        let tuning = Tuning {
            hound_count: 50,
            ..Default::default()
        };
        let mut state = LevelState::new(level, tuning, 7);
        assert_eq!(state.spawn_pack(), 50);
        for hound in &state.hounds {
            assert!(state.level.map.movement_allowed(hound.pos));
            assert!(state.level.spawn_area.contains_inclusive(hound.pos));
            assert_eq!(hound.facing, Facing::Right);
        }
        let ids: Vec<u32> = state.hounds.iter().map(|h| h.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_spawn_pack_gives_up_without_footing() {
        let mut level = crate::sim::LevelDef::builtin().unwrap().build().unwrap();
        // Spawn area entirely over the top wall rows' feet: nothing walkable up there
        level.spawn_area = Rect::new(0, -40, 0, 0);
        let tuning = Tuning {
            hound_count: 5,
            spawn_attempts: 20,
            ..Default::default()
        };
        let mut state = LevelState::new(level, tuning, 1);
        assert_eq!(state.spawn_pack(), 0);
        assert!(state.hounds.is_empty());
        assert_eq!(state.packs, 1);
    }
}
