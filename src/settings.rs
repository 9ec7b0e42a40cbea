//! Game settings and tuning
//!
//! Loaded from an optional JSON file. Every field has a default, so a
//! settings file only needs the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::input::{Action, Key, KeyBindings};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON")]
    Parse(#[from] serde_json::Error),
    #[error("key {key:?} is bound to both {first:?} and {second:?}")]
    DuplicateBinding {
        key: Key,
        first: Action,
        second: Action,
    },
    #[error("tuning value `{0}` must be at least 1")]
    ZeroTuning(&'static str),
    #[error("tuning value `{name}` must be at most {max}")]
    TuningTooLarge { name: &'static str, max: u32 },
}

/// Longest any tick-based tuning value may be: one minute of play
pub const MAX_TUNING_TICKS: u32 = 60 * TICK_RATE;

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Hounds spawned per pack
    pub hound_count: u32,
    /// Ticks a hit hound burns before it is removed
    pub burn_ticks: u32,
    /// Ticks per pixel of missile descent
    pub missile_descent_period: u32,
    /// Ticks each explosion frame is shown
    pub explosion_frame_ticks: u32,
    /// Spawn a fresh pack once every hound is gone
    pub respawn_pack_when_cleared: bool,
    /// Random placement tries per hound before giving up
    pub spawn_attempts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            hound_count: HOUND_COUNT,
            burn_ticks: HOUND_BURN_TICKS,
            missile_descent_period: MISSILE_DESCENT_PERIOD,
            explosion_frame_ticks: EXPLOSION_FRAME_TICKS,
            respawn_pack_when_cleared: true,
            spawn_attempts: SPAWN_ATTEMPTS,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let nonzero = [
            ("burn_ticks", self.burn_ticks),
            ("missile_descent_period", self.missile_descent_period),
            ("explosion_frame_ticks", self.explosion_frame_ticks),
        ];
        for (name, value) in nonzero {
            if value == 0 {
                return Err(SettingsError::ZeroTuning(name));
            }
            if value > MAX_TUNING_TICKS {
                return Err(SettingsError::TuningTooLarge {
                    name,
                    max: MAX_TUNING_TICKS,
                });
            }
        }
        Ok(())
    }
}

/// Everything configurable from the settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tuning: Tuning,
    pub bindings: KeyBindings,
}

impl Settings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.tuning.validate()?;
        self.bindings
            .validate()
            .map_err(|c| SettingsError::DuplicateBinding {
                key: c.key,
                first: c.first,
                second: c.second,
            })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` if given, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => match Self::load(path) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!("Using default settings: {err}");
                    Self::default()
                }
            },
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
