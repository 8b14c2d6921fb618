//! Rocket Barrage - a vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (spawning, homing, collisions, scoring)
//! - `frame`: Per-frame snapshots and the render/HUD sink traits
//! - `game_loop`: Host-side loop that ticks, renders and presents
//! - `autopilot`: Simple steering used by the headless demo
//! - `settings`: Host configuration loaded from JSON

pub mod autopilot;
pub mod frame;
pub mod game_loop;
pub mod settings;
pub mod sim;

pub use frame::{Frame, Hud, Presenter, RenderSink};
pub use game_loop::{GameLoop, StopPolicy};
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Play field dimensions (origin top-left, y grows downward)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Distance from the bottom edge to the player's top edge on reset
    pub const PLAYER_BOTTOM_OFFSET: f32 = 60.0;

    /// Session defaults
    pub const START_LIVES: u32 = 3;
    pub const START_LEVEL: u32 = 20;
    pub const POINTS_PER_LEVEL: u32 = 1000;

    /// Spread shot
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 10.0;
    pub const BULLET_SPEED: f32 = 8.0;
    pub const SPREAD_COUNT: usize = 5;
    pub const SPREAD_STEP_DEG: f32 = 20.0;
    pub const BULLET_COOLDOWN_MS: f64 = 50.0;
    pub const BULLET_POINTS: u32 = 10;

    /// Homing rockets
    pub const ROCKET_WIDTH: f32 = 6.0;
    pub const ROCKET_HEIGHT: f32 = 12.0;
    pub const ROCKET_SPEED: f32 = 18.0;
    pub const ROCKET_COOLDOWN_MS: f64 = 300.0;
    pub const ROCKET_POINTS: u32 = 20;
    /// How many frames of target motion a rocket leads by
    pub const HOMING_LEAD_FRAMES: f32 = 2.0;

    /// Enemies
    pub const ENEMY_SIZE: f32 = 30.0;
    pub const ENEMY_SPAWN_Y: f32 = -30.0;
    pub const ENEMY_BASE_SPEED: f32 = 2.0;
    pub const ENEMY_SPEED_JITTER: f32 = 2.0;
    pub const ENEMY_SPEED_PER_LEVEL: f32 = 0.5;
    pub const SPAWN_BASE_CHANCE: f32 = 0.01;
    pub const SPAWN_CHANCE_PER_LEVEL: f32 = 0.005;

    /// Explosions (radius, frames)
    pub const BULLET_EXPLOSION: (f32, i32) = (20.0, 10);
    pub const ROCKET_EXPLOSION: (f32, i32) = (50.0, 25);
    pub const PLAYER_EXPLOSION: (f32, i32) = (25.0, 15);
    /// Full lifetimes used to normalise explosion fade
    pub const SMALL_EXPLOSION_LIFETIME: i32 = 15;
    pub const LARGE_EXPLOSION_LIFETIME: i32 = 25;

    /// Level-up banner lifetime in frames
    pub const BANNER_LIFE: i32 = 60;

    /// Undrained events kept by a session
    pub const MAX_PENDING_EVENTS: usize = 1024;

    /// Colour tags (0xRRGGBB)
    pub const PLAYER_COLOR: u32 = 0x4a90e2;
    pub const BULLET_COLOR: u32 = 0xffeb3b;
    pub const ROCKET_COLOR: u32 = 0xff4444;
    pub const ENEMY_COLOR: u32 = 0xe74c3c;
}

/// Center of an axis-aligned box given its top-left corner and size
#[inline]
pub fn center_of(pos: Vec2, size: Vec2) -> Vec2 {
    pos + size * 0.5
}

/// Heading pointing straight up the field (y grows downward)
pub const HEADING_UP: f32 = -std::f32::consts::FRAC_PI_2;
