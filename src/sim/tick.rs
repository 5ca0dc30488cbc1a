//! Frame driver step
//!
//! One call is one tick: spawn, update, collide, then cleanup. The order is
//! fixed; each phase sees the arena exactly as the previous phase left it.

use super::state::{GamePhase, GameState};
use super::{behavior, collision};

/// Input snapshot for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire the main guns
    pub fire: bool,
    /// Trigger the ship ability (needs a full charge)
    pub ability: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Flip between playing and paused. No effect once the run is over.
pub fn toggle_pause(state: &mut GameState) {
    state.phase = match state.phase {
        GamePhase::Playing => GamePhase::Paused,
        GamePhase::Paused => GamePhase::Playing,
        GamePhase::GameOver => GamePhase::GameOver,
    };
    log::info!("Phase now {:?}", state.phase);
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        toggle_pause(state);
    }
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    // Spawn
    let mut spawner = std::mem::take(&mut state.spawner);
    let (mode, policy, score) = (state.mode, state.spawn_policy, state.score);
    let sandbox = state.sandbox.clone();
    state.run_phase(|entities, ctx| spawner.step(entities, ctx, mode, policy, score, &sandbox));
    state.spawner = spawner;

    // Update; damage emitted by abilities is resolved with the collisions
    let pending = state.run_phase(|entities, ctx| {
        behavior::update_all(entities, ctx, input);
        ctx.take_damage()
    });

    // Collide
    state.run_phase(|entities, ctx| collision::resolve(entities, ctx, &pending));

    if state.player_index().is_none() {
        state.game_over();
    }

    state.cleanup();
}
