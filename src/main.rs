//! Hound Run entry point
//!
//! Runs the game headless: input comes from a recorded script or the
//! autopilot, and the last frame can be dumped as JSON for a drawing backend.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use hound_run::consts::TICK_RATE;
    use hound_run::sim::{LevelDef, Outcome, TickInput};
    use hound_run::{Autopilot, InputScript, Scene, SceneManager, Settings, build_frame};

    /// Play Hound Run without a window
    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// Seed for the run's hound placement
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Frames to simulate before stopping
        #[arg(long, default_value_t = 3000)]
        frames: u64,
        /// Level JSON file; the built-in harbour level when omitted
        #[arg(long, value_name = "PATH")]
        level: Option<PathBuf>,
        /// Settings JSON file
        #[arg(long, value_name = "PATH")]
        settings: Option<PathBuf>,
        /// Input script JSON file
        #[arg(long, value_name = "PATH", conflicts_with = "autopilot")]
        script: Option<PathBuf>,
        /// Let the demo driver play
        #[arg(long)]
        autopilot: bool,
        /// Print the last frame's draw commands as JSON
        #[arg(long)]
        dump_frame: bool,
    }

    /// Where input comes from each frame
    enum Driver<'a> {
        Idle,
        Script(Box<dyn Iterator<Item = &'a TickInput> + 'a>),
        Autopilot(Autopilot),
    }

    impl Driver<'_> {
        fn next_input(&mut self, manager: &SceneManager) -> TickInput {
            match self {
                Driver::Idle => TickInput::default(),
                Driver::Script(frames) => frames.next().cloned().unwrap_or_default(),
                Driver::Autopilot(pilot) => manager
                    .level_state()
                    .map(|state| pilot.input_for(state))
                    .unwrap_or_default(),
            }
        }
    }

    /// How the last run ended; the final scene drops its level state
    fn outcome(manager: &SceneManager) -> Outcome {
        match manager.scene() {
            Scene::Final => Outcome::Won,
            _ => manager
                .level_state()
                .map_or(Outcome::Playing, |state| state.outcome),
        }
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();
        log::info!("Hound Run (headless) starting...");

        let def = match &args.level {
            Some(path) => LevelDef::load(path)?,
            None => LevelDef::builtin().context("built-in level is corrupt")?,
        };
        let level = def
            .build()
            .with_context(|| format!("level {:?} failed validation", def.name))?;
        let settings = Settings::load_or_default(args.settings.as_deref());
        let script = args.script.as_ref().map(InputScript::load).transpose()?;

        let mut driver = match (&script, args.autopilot) {
            (Some(script), _) => Driver::Script(Box::new(script.frames())),
            (None, true) => Driver::Autopilot(Autopilot::new()),
            (None, false) => Driver::Idle,
        };

        let mut manager = SceneManager::new(level, settings, args.seed);
        manager.step(&TickInput {
            start: true,
            ..Default::default()
        });

        let mut frames = 0;
        let mut events = 0;
        let mut kills = 0;
        let mut ticks = 0;
        while frames < args.frames && !manager.quit_requested {
            if !matches!(manager.scene(), Scene::Level(_)) {
                break;
            }
            let input = driver.next_input(&manager);
            events += manager.step(&input).len();
            frames += 1;
            if let Some(state) = manager.level_state() {
                kills = state.kills;
                ticks = state.time_ticks;
            }
        }

        log::info!(
            "Run finished in {} scene after {frames} frames: outcome {:?}, {ticks} ticks ({:.1}s of play), {kills} kills, {events} events",
            manager.scene().name(),
            outcome(&manager),
            ticks as f64 / f64::from(TICK_RATE)
        );

        if args.dump_frame {
            let frame = build_frame(&manager);
            println!("{}", serde_json::to_string_pretty(&frame)?);
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page; nothing to run here
}
