//! Number Shooter entry point
//!
//! Runs a headless session with the autoplay driver, logging a HUD line
//! once per simulated second.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;

    use number_shooter::audio::LogSink;
    use number_shooter::consts::{SIM_DT, SIM_HZ};
    use number_shooter::game::{Game, LogRenderer};
    use number_shooter::persistence::{JsonFileStore, MemoryStore, ScalarStore};
    use number_shooter::sim::{GameEvent, GamePhase, Mode, TickInput};
    use number_shooter::tuning::Tuning;

    #[derive(Parser)]
    #[command(name = "number-shooter", about = "Headless Number Shooter demo")]
    struct Args {
        /// Rule set: free or row
        #[arg(short, long, default_value = "free")]
        mode: Mode,

        /// RNG seed (defaults to the current time)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Ticks to simulate
        #[arg(short, long, default_value_t = 60 * 120)]
        ticks: u64,

        /// TOML file overriding game balance
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// JSON file for the best score and preferences (in-memory if omitted)
        #[arg(long)]
        store: Option<PathBuf>,
    }

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    pub fn run() {
        env_logger::init();
        let args = Args::parse();

        let tuning = match &args.tuning {
            Some(path) => Tuning::load_or_default(path),
            None => Tuning::default(),
        };
        let store: Box<dyn ScalarStore> = match &args.store {
            Some(path) => Box::new(JsonFileStore::new(path)),
            None => Box::new(MemoryStore::new()),
        };
        let seed = args.seed.unwrap_or_else(clock_seed);

        let mut game = Game::new(args.mode, seed, tuning, store, Box::new(LogSink));
        let mut renderer = LogRenderer;
        let input = TickInput {
            autoplay: true,
            ..Default::default()
        };

        let mut hits = 0u32;
        let mut games = 0u32;
        for tick in 0..args.ticks {
            for event in game.frame(&input, tick as f64 * SIM_DT) {
                match event {
                    GameEvent::Hit { .. } => hits += 1,
                    GameEvent::GameOver { .. } => games += 1,
                    _ => {}
                }
            }
            if tick % SIM_HZ as u64 == 0 {
                game.render(&mut renderer);
            }
            // Autoplay never restarts on its own
            if game.snapshot().phase == GamePhase::GameOver {
                let restart = TickInput {
                    restart: true,
                    ..Default::default()
                };
                game.frame(&restart, tick as f64 * SIM_DT);
            }
        }

        let snapshot = game.snapshot();
        println!(
            "{} mode, seed {}: {} ticks, {} hits, {} game(s) over, level {}, score {}, best {}",
            snapshot.mode.as_str(),
            game.session().seed(),
            args.ticks,
            hits,
            games,
            snapshot.level,
            snapshot.score,
            snapshot.best_score
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is driven by the host page
}
