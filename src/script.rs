//! Scripted input for headless runs
//!
//! A script is a JSON array of steps, each holding a tick input and how many
//! frames to hold it:
//!
//! ```json
//! [ { "input": { "right": true }, "repeat": 40 },
//!   { "input": { "fire_up": true } } ]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::TickInput;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read input script {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid input script JSON")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub input: TickInput,
    /// Frames to hold `input` for
    #[serde(default = "one")]
    pub repeat: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputScript {
    pub steps: Vec<ScriptStep>,
}

impl InputScript {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let script = Self::from_json(&json)?;
        log::info!(
            "Loaded input script {} ({} steps, {} frames)",
            path.display(),
            script.steps.len(),
            script.frame_count()
        );
        Ok(script)
    }

    /// Total frames covered once repeats are expanded
    pub fn frame_count(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.repeat)).sum()
    }

    /// One input per frame, in order
    pub fn frames(&self) -> impl Iterator<Item = &TickInput> + '_ {
        self.steps
            .iter()
            .flat_map(|step| std::iter::repeat_n(&step.input, step.repeat as usize))
    }
}
