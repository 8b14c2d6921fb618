//! Rocket Barrage entry point
//!
//! Parses the command line, loads settings and runs either the terminal
//! front-end or a headless autopilot demo.

#[cfg(not(target_arch = "wasm32"))]
mod terminal;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::io::{self, BufWriter};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;

    use rocket_barrage::autopilot;
    use rocket_barrage::frame::{Discard, JsonLinesSink, RenderSink};
    use rocket_barrage::sim::GameState;
    use rocket_barrage::{GameLoop, Settings, SettingsError};

    use crate::terminal::{self, HudLog};

    #[derive(Parser, Debug)]
    #[command(name = "rocket-barrage")]
    #[command(about = "Vertical arcade shooter with spread shots and homing rockets")]
    struct Cli {
        /// Settings file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// RNG seed, overrides the settings file
        #[arg(short, long)]
        seed: Option<u64>,

        /// Run the autopilot demo without a terminal UI
        #[arg(long)]
        headless: bool,

        /// Frames for the headless demo, overrides the settings file
        #[arg(short, long, requires = "headless")]
        frames: Option<u32>,

        /// Write every headless frame to stdout as JSON lines
        #[arg(long, requires = "headless")]
        dump_frames: bool,

        /// Write the effective settings (file plus flags) to this path and exit
        #[arg(long, value_name = "PATH")]
        save_config: Option<PathBuf>,
    }

    /// Outcome of a headless run
    struct DemoSummary {
        frames: u32,
        score: u32,
        level: u32,
        lives: u32,
        final_score: Option<u32>,
    }

    fn time_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Drive a session with the autopilot on a synthetic clock
    fn demo<R: RenderSink>(
        mut game: GameLoop<R, HudLog>,
        frames: u32,
        frame_ms: f64,
    ) -> io::Result<DemoSummary> {
        game.start();
        let mut played = 0;
        for i in 0..frames {
            for event in autopilot::drive(game.state()) {
                game.handle_input(event);
            }
            played = i + 1;
            if !game.frame(i as f64 * frame_ms)? {
                break;
            }
        }
        let state = game.state();
        Ok(DemoSummary {
            frames: played,
            score: state.score,
            level: state.level,
            lives: state.lives,
            final_score: state.final_score,
        })
    }

    fn run_headless(settings: &Settings, seed: u64, dump_frames: bool) -> io::Result<()> {
        let state = GameState::new(seed);
        let (frames, frame_ms, policy) = (
            settings.demo_frames,
            settings.frame_ms(),
            settings.stop_policy(),
        );
        log::info!("Headless demo: {} frames, seed {}", frames, seed);

        let summary = if dump_frames {
            let sink = JsonLinesSink::new(BufWriter::new(io::stdout().lock()));
            demo(GameLoop::new(state, sink, HudLog, policy), frames, frame_ms)?
        } else {
            demo(GameLoop::new(state, Discard, HudLog, policy), frames, frame_ms)?
        };

        log::info!(
            "Demo finished after {} frames: score {}, level {}, lives {}",
            summary.frames,
            summary.score,
            summary.level,
            summary.lives
        );
        if !dump_frames {
            println!("Frames:      {}", summary.frames);
            println!("Score:       {}", summary.score);
            println!("Level:       {}", summary.level);
            println!("Lives:       {}", summary.lives);
            if let Some(score) = summary.final_score {
                println!("Game over, final score {}", score);
            }
        }
        Ok(())
    }

    /// Settings file (or defaults) with command-line overrides applied
    fn resolve_settings(cli: &Cli) -> Result<Settings, SettingsError> {
        let mut settings = Settings::load_or_default(cli.config.as_deref());
        if let Some(seed) = cli.seed {
            settings.seed = Some(seed);
        }
        if let Some(frames) = cli.frames {
            settings.demo_frames = frames;
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        env_logger::init();
        let cli = Cli::parse();
        log::info!("Rocket Barrage starting...");

        let settings = resolve_settings(&cli)?;
        if let Some(path) = &cli.save_config {
            settings.save(path)?;
            return Ok(());
        }

        let seed = settings.seed.unwrap_or_else(time_seed);
        log::info!("Seed: {}", seed);

        if cli.headless {
            run_headless(&settings, seed, cli.dump_frames)?;
        } else if let Some(score) = terminal::run(&settings, seed)? {
            println!("Final score: {}", score);
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host; the library can still be embedded
}
