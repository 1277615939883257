//! Session and game context
//!
//! A `Session` is one play attempt and is thrown away on restart. `Game`
//! outlives sessions and owns everything that must survive them: config,
//! scheduler, RNG and the best-score store.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::body::Rect;
use super::difficulty::Tier;
use super::obstacles::ObstaclePool;
use super::player::{Player, PlayerEvent, PlayerPhase, Transition, countdown_text};
use super::progression::{ClearOutcome, Progression};
use super::scheduler::{Scheduler, TaskId, TimedTask};
use crate::settings::GameConfig;
use crate::storage::ScoreStore;

/// Outputs for the view layer, drained by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A new session began; carries the best score to display
    SessionStarted { best_score: u32 },
    ScoreChanged(u32),
    TierChanged(Tier),
    BestScoreChanged(u32),
    Paused,
    /// Resume countdown value
    Countdown(u32),
    Resumed,
    PlayerFailed { score: u32 },
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Play area, origin at the top-left
    pub world: Rect,
    pub player: Rect,
    pub player_tint: Option<u32>,
    pub obstacles: Vec<Rect>,
    pub tier: Tier,
    pub score_text: String,
    pub best_score_text: String,
    pub countdown_text: String,
}

/// Session-scoped state
#[derive(Debug, Clone)]
pub struct Session {
    pub player: Player,
    pub obstacles: ObstaclePool,
    pub progression: Progression,
}

impl Session {
    pub fn new(config: &GameConfig, best_score: u32, rng: &mut Pcg32) -> Self {
        let easy = config.difficulty.profile_for(Tier::Easy);
        Self {
            player: Player::new(config),
            obstacles: ObstaclePool::new(config, easy, rng),
            progression: Progression::new(best_score),
        }
    }
}

/// Complete game: the current session plus everything that outlives it
pub struct Game {
    pub config: GameConfig,
    pub session: Session,
    pub scheduler: Scheduler,
    pub(crate) rng: Pcg32,
    store: Box<dyn ScoreStore>,
    events: Vec<GameEvent>,
    /// Sessions started, including the current one
    sessions: u32,
}

impl Game {
    /// Start the first session, reading the best score from `store`
    pub fn new(config: GameConfig, store: Box<dyn ScoreStore>) -> Self {
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let best_score = store.read().unwrap_or(0);
        let session = Session::new(&config, best_score, &mut rng);
        log::info!("Session 1 started (best score {best_score})");

        Self {
            config,
            session,
            scheduler: Scheduler::new(),
            rng,
            store,
            events: vec![GameEvent::SessionStarted { best_score }],
            sessions: 1,
        }
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.session.progression.score()
    }

    #[inline]
    pub fn tier(&self) -> Tier {
        self.session.progression.tier()
    }

    #[inline]
    pub fn best_score(&self) -> u32 {
        self.session.progression.best_score()
    }

    pub fn sessions(&self) -> u32 {
        self.sessions
    }

    pub fn store(&self) -> &dyn ScoreStore {
        self.store.as_ref()
    }

    /// Take all pending view events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Feed one event to the player state machine and carry out its effects
    pub fn handle(&mut self, event: PlayerEvent) -> Option<Transition> {
        let transition = self
            .session
            .player
            .transition(event, &mut self.scheduler)?;

        match transition {
            Transition::Flapped => {}
            Transition::Failed => {
                let score = self.score();
                log::info!("Player failed at score {score}");
                self.persist_best_score();
                self.events.push(GameEvent::PlayerFailed { score });
            }
            Transition::Paused => self.events.push(GameEvent::Paused),
            Transition::Countdown(remaining) => self.events.push(GameEvent::Countdown(remaining)),
            Transition::Resumed => {
                self.events.push(GameEvent::Countdown(0));
                self.events.push(GameEvent::Resumed);
            }
            Transition::RestartDue => self.restart_session(),
        }
        Some(transition)
    }

    /// Dispatch a fired scheduler task
    pub(crate) fn run_task(&mut self, id: TaskId, task: TimedTask) {
        let event = match task {
            TimedTask::CountdownTick => PlayerEvent::CountdownTick(id),
            TimedTask::RestartSession => PlayerEvent::RestartElapsed(id),
        };
        self.handle(event);
    }

    /// Report cleared pairs from a recycle step
    pub(crate) fn record_clears(&mut self, outcomes: &[ClearOutcome]) {
        if outcomes.is_empty() {
            return;
        }
        for outcome in outcomes {
            self.events.push(GameEvent::ScoreChanged(outcome.score));
            if let Some(tier) = outcome.new_tier {
                self.events.push(GameEvent::TierChanged(tier));
            }
        }
        self.persist_best_score();
    }

    /// Write the current score to the store if it is a new best
    pub fn persist_best_score(&mut self) {
        if self
            .session
            .progression
            .persist_best_score(self.store.as_mut())
        {
            self.events.push(GameEvent::BestScoreChanged(self.best_score()));
        }
    }

    /// Current frame for the view layer
    pub fn snapshot(&self) -> Snapshot {
        let session = &self.session;
        let countdown = match session.player.phase() {
            PlayerPhase::CountdownResume { remaining, .. } => remaining,
            _ => 0,
        };
        Snapshot {
            world: Rect::new(0.0, 0.0, self.config.width, self.config.height),
            player: session.player.body.bounds(),
            player_tint: session.player.tint,
            obstacles: session.obstacles.members().iter().map(|m| m.bounds()).collect(),
            tier: self.tier(),
            score_text: session.progression.score_text(),
            best_score_text: session.progression.best_score_text(),
            countdown_text: countdown_text(countdown),
        }
    }

    /// Replace the session; only the best score carries over
    pub fn restart_session(&mut self) {
        self.scheduler.clear();
        let best_score = self.store.read().unwrap_or(0).max(self.best_score());
        self.session = Session::new(&self.config, best_score, &mut self.rng);
        self.sessions += 1;
        log::info!("Session {} started (best score {best_score})", self.sessions);
        self.events.push(GameEvent::SessionStarted { best_score });
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("session", &self.session)
            .field("scheduler", &self.scheduler)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}
