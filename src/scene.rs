//! Scene switching
//!
//! Intro -> Level -> Final on a win, Level -> Lost on a loss, and Lost ->
//! Intro on restart. Quit is honoured in every scene.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::input::KeyState;
use crate::settings::Settings;
use crate::sim::{GameEvent, Level, LevelState, Outcome, TickInput, tick};

/// The active scene
#[derive(Debug, Clone)]
pub enum Scene {
    /// Title card, waiting for start
    Intro,
    Level(Box<LevelState>),
    /// Defeat card; the finished level is kept for inspection
    Lost(Box<LevelState>),
    /// Victory card
    Final,
}

impl Scene {
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Intro => "intro",
            Scene::Level(_) => "level",
            Scene::Lost(_) => "lost",
            Scene::Final => "final",
        }
    }
}

/// Owns the current scene and drives transitions between them
#[derive(Debug, Clone)]
pub struct SceneManager {
    scene: Scene,
    level: Level,
    settings: Settings,
    /// Draws one seed per run
    seeds: Pcg32,
    pub runs_started: u32,
    pub quit_requested: bool,
}

impl SceneManager {
    pub fn new(level: Level, settings: Settings, seed: u64) -> Self {
        log::info!("Scene manager ready on level {:?} (seed {seed})", level.name);
        Self {
            scene: Scene::Intro,
            level,
            settings,
            seeds: Pcg32::seed_from_u64(seed),
            runs_started: 0,
            quit_requested: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Level being played or just lost
    pub fn level_state(&self) -> Option<&LevelState> {
        match &self.scene {
            Scene::Level(state) | Scene::Lost(state) => Some(&**state),
            _ => None,
        }
    }

    pub fn level_state_mut(&mut self) -> Option<&mut LevelState> {
        match &mut self.scene {
            Scene::Level(state) | Scene::Lost(state) => Some(&mut **state),
            _ => None,
        }
    }

    /// Run one frame from raw keyboard state
    pub fn update(&mut self, keys: &KeyState) -> Vec<GameEvent> {
        let input = self.settings.bindings.tick_input(keys);
        self.step(&input)
    }

    /// Run one frame from already-mapped input
    pub fn step(&mut self, input: &TickInput) -> Vec<GameEvent> {
        if self.quit_requested {
            return Vec::new();
        }
        if input.quit {
            log::info!("Quit requested in {} scene", self.scene.name());
            self.quit_requested = true;
            return Vec::new();
        }

        match &mut self.scene {
            Scene::Intro => {
                if input.start {
                    self.start_run();
                }
                Vec::new()
            }
            Scene::Level(state) => {
                let events = tick(state, input);
                let outcome = state.outcome;
                match outcome {
                    Outcome::Playing => {}
                    Outcome::Won => self.transition(|_| Scene::Final),
                    Outcome::Lost => self.transition(|previous| match previous {
                        Scene::Level(state) => Scene::Lost(state),
                        other => other,
                    }),
                }
                events
            }
            Scene::Lost(_) => {
                if input.restart {
                    self.transition(|_| Scene::Intro);
                }
                Vec::new()
            }
            Scene::Final => Vec::new(),
        }
    }

    fn start_run(&mut self) {
        let seed: u64 = self.seeds.random();
        self.runs_started += 1;
        log::info!("Starting run {} with seed {seed}", self.runs_started);
        let state = LevelState::new(self.level.clone(), self.settings.tuning.clone(), seed);
        self.transition(|_| Scene::Level(Box::new(state)));
    }

    /// Replace the scene, handing the old one to `make` so it can be reused
    fn transition(&mut self, make: impl FnOnce(Scene) -> Scene) {
        let previous = std::mem::replace(&mut self.scene, Scene::Intro);
        let from = previous.name();
        self.scene = make(previous);
        log::info!("Scene: {from} -> {}", self.scene.name());
    }
}
