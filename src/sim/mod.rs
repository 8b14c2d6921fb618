//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - One tick per display frame, timestamps supplied by the host
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod input;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Hitbox, level_for_score, resolve_collisions};
pub use input::{InputEvent, InputState, Key};
pub use spawn::Cooldown;
pub use state::{
    Bullet, Enemy, Explosion, ExplosionKind, GameEvent, GamePhase, GameState, LevelBanner,
    LifeLoss, Player, Rocket, Weapon,
};
pub use tick::tick;
