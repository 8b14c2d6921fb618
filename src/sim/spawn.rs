//! Enemy spawning and weapon fire

use glam::Vec2;
use rand::Rng;

use super::state::{Bullet, Enemy, GameEvent, GameState, Rocket};
use crate::consts::*;

/// Wall-clock gate between repeated actions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    period_ms: f64,
    last_ms: Option<f64>,
}

impl Cooldown {
    pub const fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            last_ms: None,
        }
    }

    pub fn ready(&self, now_ms: f64) -> bool {
        self.last_ms
            .is_none_or(|last| now_ms - last >= self.period_ms)
    }

    /// Consume the cooldown if it is ready
    pub fn trigger(&mut self, now_ms: f64) -> bool {
        if self.ready(now_ms) {
            self.last_ms = Some(now_ms);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Per-frame spawn probability at a level
pub fn spawn_chance(level: u32) -> f32 {
    SPAWN_BASE_CHANCE + level as f32 * SPAWN_CHANCE_PER_LEVEL
}

/// Roll for a new enemy. Returns true if one was spawned.
pub fn try_spawn_enemy(state: &mut GameState) -> bool {
    let roll: f32 = state.rng.random();
    if roll >= spawn_chance(state.level) {
        return false;
    }

    let x = state.rng.random::<f32>() * (FIELD_WIDTH - ENEMY_SIZE);
    let speed = ENEMY_BASE_SPEED
        + state.rng.random_range(0.0..ENEMY_SPEED_JITTER)
        + state.level as f32 * ENEMY_SPEED_PER_LEVEL;
    state
        .enemies
        .push(Enemy::new(Vec2::new(x, ENEMY_SPAWN_Y), speed));
    state.push_event(GameEvent::EnemySpawned);
    true
}

/// Angles of the spread shot in radians, left to right
pub fn spread_angles() -> [f32; SPREAD_COUNT] {
    let mid = (SPREAD_COUNT / 2) as f32;
    std::array::from_fn(|i| ((i as f32 - mid) * SPREAD_STEP_DEG).to_radians())
}

/// Fire the five-way spread from the ship's nose
pub fn fire_spread(state: &mut GameState) {
    let origin = state.player.muzzle(BULLET_WIDTH);
    state
        .bullets
        .extend(spread_angles().into_iter().map(|angle| Bullet::new(origin, angle)));
}

/// Launch a homing rocket if there is anything to chase
pub fn fire_rocket(state: &mut GameState) -> bool {
    if state.enemies.is_empty() {
        return false;
    }
    let origin = state.player.muzzle(ROCKET_WIDTH);
    state.rockets.push(Rocket::new(origin));
    true
}

/// Cooldown-gated automatic fire: spread while the fire key is held,
/// rockets on their own timer for as long as the session runs
pub fn auto_fire(state: &mut GameState, now_ms: f64) {
    if !state.is_running() {
        return;
    }
    if state.input.firing && state.bullet_cooldown.trigger(now_ms) {
        fire_spread(state);
    }
    if state.rocket_cooldown.trigger(now_ms) {
        fire_rocket(state);
    }
}
