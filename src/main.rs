//! Flappy Core entry point
//!
//! Native: runs a headless autopilot session and logs what happens.
//! Web: exposes `WebGame` to the page script, which renders `snapshot()`.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use flappy_core::GameConfig;
    use flappy_core::consts::*;
    use flappy_core::sim::{Game, TickInput, tick};
    use flappy_core::storage::LocalStorageStore;

    /// Game instance driven by requestAnimationFrame
    #[wasm_bindgen]
    pub struct WebGame {
        game: Game,
        input: TickInput,
        accumulator: f32,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new() -> WebGame {
            let config = GameConfig::load_local();
            Self {
                game: Game::new(config, Box::new(LocalStorageStore)),
                input: TickInput::default(),
                accumulator: 0.0,
            }
        }

        /// Space / pointer down
        pub fn flap(&mut self) {
            self.input.flap = true;
        }

        pub fn pause(&mut self) {
            self.input.pause = true;
        }

        pub fn resume(&mut self) {
            self.input.resume = true;
        }

        pub fn set_autopilot(&mut self, on: bool) {
            self.input.autopilot = on;
        }

        /// Run simulation ticks for `dt` seconds of frame time
        pub fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.game, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.flap = false;
                self.input.pause = false;
                self.input.resume = false;
            }

            for event in self.game.drain_events() {
                log::debug!("{event:?}");
            }
        }

        /// Current frame as JSON
        pub fn snapshot(&self) -> String {
            serde_json::to_string(&self.game.snapshot()).unwrap_or_default()
        }

        pub fn score(&self) -> u32 {
            self.game.score()
        }

        pub fn best_score(&self) -> u32 {
            self.game.best_score()
        }
    }

    impl Default for WebGame {
        fn default() -> Self {
            Self::new()
        }
    }

    #[wasm_bindgen(start)]
    pub fn wasm_main() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Flappy Core (web) starting...");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy_core::GameConfig;
    use flappy_core::consts::TICK_RATE;
    use flappy_core::sim::{Game, GameEvent, TickInput, tick};
    use flappy_core::storage::FileStore;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flappy Core (native) starting...");

    // Usage: flappy-core [config.json] [score-store.json]
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Could not load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };
    let store_path = args.next().unwrap_or_else(|| "flappy-best.json".to_string());
    let store = match FileStore::open(&store_path) {
        Ok(store) => store,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let saved_to = store.path().display().to_string();
    let mut game = Game::new(config, Box::new(store));
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    // Two simulated minutes
    let ticks = 120 * TICK_RATE;
    let mut failures = 0;
    for _ in 0..ticks {
        tick(&mut game, &input);
        for event in game.drain_events() {
            match event {
                GameEvent::PlayerFailed { score } => {
                    failures += 1;
                    log::info!("Crashed with score {score}");
                }
                GameEvent::TierChanged(tier) => log::info!("Now {}", tier.as_str()),
                other => log::debug!("{other:?}"),
            }
        }
    }

    println!(
        "sessions: {}  failures: {}  score: {}  best: {} (saved in {})",
        game.sessions(),
        failures,
        game.score(),
        game.best_score(),
        saved_to
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
