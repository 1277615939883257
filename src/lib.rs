//! Flappy Core - obstacle stream, difficulty and player state for a flappy game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (obstacle pool, difficulty, player state machine)
//! - `storage`: Best-score persistence behind a small key-value port
//! - `settings`: Data-driven game tuning

pub mod settings;
pub mod sim;
pub mod storage;

pub use settings::{ConfigError, GameConfig};
pub use storage::{MemoryStore, ScoreStore};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Simulation ticks per second
    pub const TICK_RATE: u32 = 120;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play area
    pub const WORLD_WIDTH: f32 = 400.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Player defaults (16x16 sprite drawn at 3x)
    pub const PLAYER_START_X: f32 = WORLD_WIDTH / 10.0;
    pub const PLAYER_START_Y: f32 = WORLD_HEIGHT / 2.0;
    pub const PLAYER_SIZE: f32 = 48.0;
    /// Collision body is 10 source pixels shorter than the sprite
    pub const PLAYER_HITBOX_HEIGHT: f32 = 18.0;
    pub const PLAYER_GRAVITY: f32 = 600.0;
    /// Upward velocity set on every flap
    pub const FLAP_IMPULSE: f32 = -300.0;
    /// Tint applied to the player on failure
    pub const FAILURE_TINT: u32 = 0xEE4824;

    /// Obstacle defaults
    pub const OBSTACLE_COUNT: usize = 10;
    pub const OBSTACLE_WIDTH: f32 = 26.0;
    /// Members reach past the play area edge from any placement
    pub const OBSTACLE_HEIGHT: f32 = WORLD_HEIGHT;
    pub const OBSTACLE_VELOCITY: f32 = -200.0;
    pub const PLACEMENT_MARGIN_TOP: u32 = 20;
    pub const PLACEMENT_MARGIN_BOTTOM: u32 = 20;

    /// Delay between failure and the new session
    pub const RESTART_DELAY_MS: u32 = 1000;
    /// Resume countdown: steps and interval between them
    pub const COUNTDOWN_STEPS: u32 = 3;
    pub const COUNTDOWN_INTERVAL_MS: u32 = 1000;
}

/// Convert a millisecond delay to whole simulation ticks (rounded up)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u64 {
    (ms as u64 * consts::TICK_RATE as u64).div_ceil(1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(1000), 120);
        assert_eq!(ms_to_ticks(0), 0);
        // Partial ticks round up so a delay never fires early
        assert_eq!(ms_to_ticks(1), 1);
    }
}
