//! Game tuning
//!
//! Every number the simulation uses lives in [`GameConfig`]. Defaults match
//! the reference game; a JSON file (native) or LocalStorage entry (web) may
//! override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::difficulty::{DifficultyError, DifficultyTable};

/// Configuration problems
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("difficulty table: {0}")]
    Difficulty(#[from] DifficultyError),
    #[error("{0}")]
    Invalid(String),
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === World ===
    pub width: f32,
    pub height: f32,

    // === Player ===
    pub start_x: f32,
    pub start_y: f32,
    pub player_size: f32,
    pub player_hitbox_height: f32,
    pub gravity: f32,
    pub flap_impulse: f32,

    // === Obstacles ===
    /// Member count (two per pair)
    pub obstacle_count: usize,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub obstacle_velocity: f32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub difficulty: DifficultyTable,

    // === Timers ===
    pub restart_delay_ms: u32,
    pub countdown_steps: u32,
    pub countdown_interval_ms: u32,

    /// Placement RNG seed
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,

            start_x: PLAYER_START_X,
            start_y: PLAYER_START_Y,
            player_size: PLAYER_SIZE,
            player_hitbox_height: PLAYER_HITBOX_HEIGHT,
            gravity: PLAYER_GRAVITY,
            flap_impulse: FLAP_IMPULSE,

            obstacle_count: OBSTACLE_COUNT,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            obstacle_velocity: OBSTACLE_VELOCITY,
            margin_top: PLACEMENT_MARGIN_TOP,
            margin_bottom: PLACEMENT_MARGIN_BOTTOM,
            difficulty: DifficultyTable::default(),

            restart_delay_ms: RESTART_DELAY_MS,
            countdown_steps: COUNTDOWN_STEPS,
            countdown_interval_ms: COUNTDOWN_INTERVAL_MS,

            seed: 0x5EED_F1A9,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check the values the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.difficulty.validate()?;

        if self.obstacle_count == 0 || self.obstacle_count % 2 != 0 {
            return Err(ConfigError::Invalid(format!(
                "obstacle_count must be a positive even number, got {}",
                self.obstacle_count
            )));
        }
        if self.countdown_steps == 0 {
            return Err(ConfigError::Invalid("countdown_steps must be at least 1".into()));
        }
        if self.player_hitbox_height > self.player_size {
            return Err(ConfigError::Invalid(
                "player_hitbox_height exceeds player_size".into(),
            ));
        }
        if self.obstacle_velocity >= 0.0 {
            return Err(ConfigError::Invalid(
                "obstacle_velocity must scroll left (negative)".into(),
            ));
        }

        if !(0.0..self.width).contains(&self.start_x) {
            return Err(ConfigError::Invalid(format!(
                "start_x {} is outside the {} unit wide play area",
                self.start_x, self.width
            )));
        }

        // Widest gap must still fit between the margins
        let gaps = self.difficulty.profiles().iter().map(|p| p.gap);
        let widest = gaps.clone().map(|g| g.max).max().unwrap_or(0);
        let usable = self.height - self.margin_top as f32 - self.margin_bottom as f32;
        if widest as f32 > usable {
            return Err(ConfigError::Invalid(format!(
                "gap of {widest} does not fit in {usable} units between margins"
            )));
        }

        // An upper member placed lowest, or a lower member placed highest,
        // must still reach the edge of the play area
        let narrowest = gaps.map(|g| g.min).min().unwrap_or(0);
        let margin = self.margin_top.min(self.margin_bottom);
        let reach = self.height - margin as f32 - narrowest as f32;
        if self.obstacle_height < reach {
            return Err(ConfigError::Invalid(format!(
                "obstacle_height {} leaves open space past the pair, need at least {reach}",
                self.obstacle_height
            )));
        }
        Ok(())
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "flappy_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load_local() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {e}"),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }
}
