//! Player sprite and its state machine
//!
//! Phases:
//! - `Flying`: simulation runs, flaps apply an impulse
//! - `Paused`: simulation and countdown both stopped
//! - `CountdownResume`: simulation still stopped, a repeating timer counts down
//! - `Restarting`: failure beat before a new session replaces this one

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::scheduler::{Scheduler, TaskId, TimedTask};
use crate::consts::FAILURE_TINT;
use crate::ms_to_ticks;
use crate::settings::GameConfig;

/// Current phase of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPhase {
    Flying,
    Paused,
    CountdownResume { remaining: u32, task: TaskId },
    Restarting { task: TaskId },
}

impl PlayerPhase {
    /// Input is ignored while this is true
    pub fn is_paused(&self) -> bool {
        matches!(self, PlayerPhase::Paused | PlayerPhase::CountdownResume { .. })
    }

    /// Kinematics and collision run only while flying
    pub fn simulates(&self) -> bool {
        matches!(self, PlayerPhase::Flying)
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Activate input (key or pointer)
    Flap,
    /// Hit an obstacle or left the play area
    Failed,
    PauseRequested,
    ResumeRequested,
    /// Countdown timer fired
    CountdownTick(TaskId),
    /// Restart timer fired
    RestartElapsed(TaskId),
}

/// What a handled event did, for the owner to follow up on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Flapped,
    /// Entered `Restarting`; the score should be persisted
    Failed,
    Paused,
    /// Countdown shows this value
    Countdown(u32),
    /// Countdown reached zero, flying again
    Resumed,
    /// The failed session should be replaced
    RestartDue,
}

/// Timer and impulse tuning, converted to ticks once
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Tuning {
    flap_impulse: f32,
    restart_delay: u64,
    countdown_steps: u32,
    countdown_interval: u64,
}

/// The controlled sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Set on failure
    pub tint: Option<u32>,
    phase: PlayerPhase,
    tuning: Tuning,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let mut body = Body::solid(
            Vec2::new(config.start_x, config.start_y),
            Vec2::splat(config.player_size),
        );
        body.hitbox = Vec2::new(config.player_size, config.player_hitbox_height);
        body.gravity = config.gravity;

        Self {
            body,
            tint: None,
            phase: PlayerPhase::Flying,
            tuning: Tuning {
                flap_impulse: config.flap_impulse,
                restart_delay: ms_to_ticks(config.restart_delay_ms),
                countdown_steps: config.countdown_steps,
                countdown_interval: ms_to_ticks(config.countdown_interval_ms),
            },
        }
    }

    #[inline]
    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.phase.is_paused()
    }

    /// Top of the collision body at or above the ceiling, or the sprite's
    /// rendered bottom at or below the floor
    pub fn out_of_bounds(&self, height: f32) -> bool {
        self.body.hitbox_rect().top() <= 0.0 || self.body.bounds().bottom() >= height
    }

    /// Apply one event. Returns `None` when the event does not apply in the
    /// current phase.
    pub fn transition(
        &mut self,
        event: PlayerEvent,
        scheduler: &mut Scheduler,
    ) -> Option<Transition> {
        use PlayerEvent as E;
        use PlayerPhase as P;

        match (self.phase, event) {
            (P::Flying, E::Flap) => {
                self.body.vel.y = self.tuning.flap_impulse;
                Some(Transition::Flapped)
            }
            (P::Flying, E::Failed) => {
                self.tint = Some(FAILURE_TINT);
                self.body.vel = Vec2::ZERO;
                let task =
                    scheduler.schedule_once(self.tuning.restart_delay, TimedTask::RestartSession);
                self.phase = P::Restarting { task };
                Some(Transition::Failed)
            }
            (P::Flying, E::PauseRequested) => {
                self.phase = P::Paused;
                Some(Transition::Paused)
            }
            (P::CountdownResume { task, .. }, E::PauseRequested) => {
                scheduler.cancel(task);
                self.phase = P::Paused;
                Some(Transition::Paused)
            }
            (P::Paused, E::ResumeRequested) => {
                let remaining = self.tuning.countdown_steps;
                let task = scheduler
                    .schedule_repeating(self.tuning.countdown_interval, TimedTask::CountdownTick);
                self.phase = P::CountdownResume { remaining, task };
                Some(Transition::Countdown(remaining))
            }
            (P::CountdownResume { remaining, task }, E::CountdownTick(fired)) if fired == task => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    scheduler.cancel(task);
                    self.phase = P::Flying;
                    Some(Transition::Resumed)
                } else {
                    self.phase = P::CountdownResume { remaining, task };
                    Some(Transition::Countdown(remaining))
                }
            }
            (P::Restarting { task }, E::RestartElapsed(fired)) if fired == task => {
                Some(Transition::RestartDue)
            }
            _ => None,
        }
    }
}

/// HUD text for the resume countdown
pub fn countdown_text(remaining: u32) -> String {
    if remaining == 0 {
        String::new()
    } else {
        format!("Fly in: {remaining}")
    }
}
