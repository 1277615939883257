//! Fixed timestep simulation tick
//!
//! Order within one tick:
//! 1. input (pause, resume, flap) through the player state machine
//! 2. kinematics for the player and every obstacle member
//! 3. obstacle recycling, scoring and difficulty
//! 4. collision and out-of-bounds checks
//! 5. scheduler (restart delay, resume countdown)

use super::player::{PlayerEvent, PlayerPhase};
use super::state::Game;
use crate::consts::SIM_DT;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Activate (space / click / tap)
    pub flap: bool,
    /// Request a pause
    pub pause: bool,
    /// Request the resume countdown
    pub resume: bool,
    /// Demo mode - the game flaps for the player
    pub autopilot: bool,
}

/// Advance the game by one fixed timestep
pub fn tick(game: &mut Game, input: &TickInput) {
    if input.pause {
        game.handle(PlayerEvent::PauseRequested);
    }
    if input.resume {
        game.handle(PlayerEvent::ResumeRequested);
    }

    let flap = input.flap || (input.autopilot && autopilot_wants_flap(game));
    if flap {
        game.handle(PlayerEvent::Flap);
    }

    if game.session.player.phase().simulates() {
        step_world(game);
    }

    // Engine clock stops entirely while paused
    if game.session.player.phase() != PlayerPhase::Paused {
        for (id, task) in game.scheduler.advance() {
            game.run_task(id, task);
        }
    }
}

/// Kinematics, recycling and failure detection
fn step_world(game: &mut Game) {
    let height = game.config.height;
    let session = &mut game.session;

    session.player.body.integrate(SIM_DT);
    session.player.body.clamp_to_world(height);
    session.obstacles.advance(SIM_DT);

    let outcomes = session.obstacles.recycle_step(
        &mut session.progression,
        &game.config.difficulty,
        &mut game.rng,
    );
    game.record_clears(&outcomes);

    let player = &game.session.player;
    let hit = game.session.obstacles.collides(&player.body.hitbox_rect());
    if hit || player.out_of_bounds(height) {
        game.handle(PlayerEvent::Failed);
    }
}

/// Flap when the player sinks toward the lower edge of the next gap
fn autopilot_wants_flap(game: &Game) -> bool {
    let player = &game.session.player;
    if !player.phase().simulates() || player.body.vel.y <= 0.0 {
        return false;
    }
    let hitbox = player.body.hitbox_rect();
    let next = game
        .session
        .obstacles
        .pairs()
        .filter(|p| p.x + game.config.obstacle_width > hitbox.left())
        .min_by(|a, b| a.x.total_cmp(&b.x));

    match next {
        Some(pair) => hitbox.bottom() >= pair.lower_y - 15.0,
        None => hitbox.bottom() >= game.config.height / 2.0,
    }
}
