//! Per-frame simulation tick
//!
//! Core game loop step that advances the simulation by one display frame.

use super::state::GameState;
use super::{collision, effects, motion, spawn};

/// Advance the game state by one frame.
///
/// `now_ms` is the host's wall-clock time and only gates weapon cooldowns.
/// Phases run in a fixed order; once a phase ends the session the rest of
/// the frame is skipped. Outside of Running this does nothing.
///
/// Events raised here queue up in `state.events` until the caller drains
/// them with [`GameState::drain_events`]; [`crate::GameLoop`] does so every
/// frame.
pub fn tick(state: &mut GameState, now_ms: f64) {
    if !state.is_running() {
        return;
    }
    state.frame += 1;

    motion::update_player(state);
    spawn::auto_fire(state, now_ms);
    motion::update_bullets(state);
    motion::update_rockets(state);
    motion::update_enemies(state);
    if !state.is_running() {
        return;
    }

    spawn::try_spawn_enemy(state);
    collision::resolve_collisions(state);
    if !state.is_running() {
        return;
    }

    effects::decay_effects(state);
}
