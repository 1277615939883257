//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timers are scheduler entries, never sleeps
//! - No rendering or platform dependencies

pub mod body;
pub mod difficulty;
pub mod obstacles;
pub mod player;
pub mod progression;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use body::{Body, Rect};
pub use difficulty::{DifficultyProfile, DifficultyTable, Tier, ValueRange};
pub use obstacles::{ObstacleMember, ObstaclePool, PairView, Role};
pub use player::{Player, PlayerEvent, PlayerPhase, Transition, countdown_text};
pub use progression::{ClearOutcome, Progression};
pub use scheduler::{Scheduler, TaskId, TimedTask};
pub use state::{Game, GameEvent, Session};
pub use tick::{TickInput, tick};
