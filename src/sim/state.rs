//! Game state and core simulation types
//!
//! Everything a session carries from one frame to the next lives here.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::input::{InputEvent, InputState};
use super::spawn::Cooldown;
use crate::consts::*;
use crate::HEADING_UP;

/// Current phase of the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    Idle,
    /// Active gameplay
    Running,
    /// Lives exhausted; simulation frozen until restart
    Over,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub color: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Self::spawn_point(),
            size: Vec2::splat(PLAYER_SIZE),
            speed: PLAYER_SPEED,
            color: PLAYER_COLOR,
        }
    }
}

impl Player {
    fn spawn_point() -> Vec2 {
        Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - PLAYER_BOTTOM_OFFSET)
    }

    /// Put the ship back at its spawn point
    pub fn reset(&mut self) {
        self.pos = Self::spawn_point();
    }

    /// Point weapons leave the ship from, offset so a projectile of
    /// `width` is centered on the nose
    pub fn muzzle(&self, width: f32) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0 - width / 2.0, self.pos.y)
    }
}

/// A spread-shot projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    /// Displacement per frame
    pub vel: Vec2,
    pub color: u32,
}

impl Bullet {
    /// Projectile leaving `origin` at `angle` radians from straight up
    pub fn new(origin: Vec2, angle: f32) -> Self {
        Self {
            pos: origin,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            vel: Vec2::new(angle.sin() * BULLET_SPEED, -angle.cos() * BULLET_SPEED),
            color: BULLET_COLOR,
        }
    }
}

/// A guided munition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rocket {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// Heading in radians (atan2 convention, screen space); used for drawing
    pub angle: f32,
    pub homing: bool,
    pub color: u32,
}

impl Rocket {
    pub fn new(origin: Vec2) -> Self {
        Self {
            pos: origin,
            size: Vec2::new(ROCKET_WIDTH, ROCKET_HEIGHT),
            speed: ROCKET_SPEED,
            angle: 0.0,
            homing: true,
            color: ROCKET_COLOR,
        }
    }

    /// Fly straight up without steering
    pub fn climb(&mut self) {
        self.pos.y -= self.speed;
        self.angle = HEADING_UP;
    }
}

/// A descending enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward speed per frame
    pub speed: f32,
    pub color: u32,
}

impl Enemy {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            size: Vec2::splat(ENEMY_SIZE),
            speed,
            color: ENEMY_COLOR,
        }
    }
}

/// Explosion visual size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionKind {
    /// Bullet hits and ship impacts
    Small,
    /// Rocket hits
    Large,
}

impl ExplosionKind {
    /// Lifetime used to normalise fade
    pub fn full_life(self) -> i32 {
        match self {
            ExplosionKind::Small => SMALL_EXPLOSION_LIFETIME,
            ExplosionKind::Large => LARGE_EXPLOSION_LIFETIME,
        }
    }
}

/// A fading explosion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    /// Center point
    pub pos: Vec2,
    pub radius: f32,
    /// Frames remaining
    pub life: i32,
    pub kind: ExplosionKind,
}

impl Explosion {
    pub fn new(pos: Vec2, (radius, life): (f32, i32), kind: ExplosionKind) -> Self {
        Self {
            pos,
            radius,
            life,
            kind,
        }
    }

    pub fn alpha(&self) -> f32 {
        (self.life as f32 / self.kind.full_life() as f32).clamp(0.0, 1.0)
    }
}

/// "LEVEL n!" announcement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelBanner {
    pub pos: Vec2,
    pub text: String,
    pub life: i32,
    pub alpha: f32,
}

impl LevelBanner {
    pub fn new(level: u32) -> Self {
        Self {
            pos: Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0),
            text: format!("LEVEL {level}!"),
            life: BANNER_LIFE,
            alpha: 1.0,
        }
    }
}

/// Weapon credited with a kill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weapon {
    Bullet,
    Rocket,
}

impl Weapon {
    pub fn points(self) -> u32 {
        match self {
            Weapon::Bullet => BULLET_POINTS,
            Weapon::Rocket => ROCKET_POINTS,
        }
    }
}

/// Why a life was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeLoss {
    /// An enemy slipped past the bottom edge
    EnemyEscaped,
    /// An enemy rammed the ship
    PlayerHit,
}

/// State-changing events raised during a frame, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted { level: u32 },
    EnemySpawned,
    EnemyDestroyed { weapon: Weapon, points: u32 },
    LifeLost { cause: LifeLoss, lives: u32 },
    LevelUp { level: u32 },
    LevelChanged { level: u32 },
    GameOver { final_score: u32 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    /// Score captured on the last transition to Over
    pub final_score: Option<u32>,
    /// Ticks simulated this session
    pub frame: u64,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub rockets: Vec<Rocket>,
    pub enemies: Vec<Enemy>,
    pub explosions: Vec<Explosion>,
    pub banners: Vec<LevelBanner>,
    pub input: InputState,
    pub(crate) bullet_cooldown: Cooldown,
    pub(crate) rocket_cooldown: Cooldown,
    /// Events raised since the host last drained them; only the newest
    /// [`MAX_PENDING_EVENTS`] are kept
    pub events: VecDeque<GameEvent>,
}

impl GameState {
    /// Fresh, not yet started state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            score: 0,
            lives: START_LIVES,
            level: 0,
            final_score: None,
            frame: 0,
            player: Player::default(),
            bullets: Vec::new(),
            rockets: Vec::new(),
            enemies: Vec::new(),
            explosions: Vec::new(),
            banners: Vec::new(),
            input: InputState::default(),
            bullet_cooldown: Cooldown::new(BULLET_COOLDOWN_MS),
            rocket_cooldown: Cooldown::new(ROCKET_COOLDOWN_MS),
            events: VecDeque::new(),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Begin a new session at the starting level
    pub fn start(&mut self) {
        self.begin_session(START_LEVEL);
    }

    /// Begin a new session, keeping whatever level is currently set
    pub fn restart(&mut self) {
        self.begin_session(self.level);
    }

    fn begin_session(&mut self, level: u32) {
        self.phase = GamePhase::Running;
        self.score = 0;
        self.lives = START_LIVES;
        self.level = level;
        self.final_score = None;
        self.frame = 0;
        self.bullets.clear();
        self.rockets.clear();
        self.enemies.clear();
        self.explosions.clear();
        self.banners.clear();
        self.player.reset();
        self.input.reset();
        self.bullet_cooldown.reset();
        self.rocket_cooldown.reset();
        self.push_event(GameEvent::SessionStarted { level });
        log::info!("Session started at level {} (seed {})", level, self.seed);
    }

    /// Enter the terminal state, freezing the simulation
    pub fn game_over(&mut self) {
        self.phase = GamePhase::Over;
        self.final_score = Some(self.score);
        self.input.firing = false;
        self.push_event(GameEvent::GameOver {
            final_score: self.score,
        });
        log::info!("Game over! Lives: {}, Score: {}", self.lives, self.score);
    }

    /// Nudge the level up or down, never below zero
    pub fn change_level(&mut self, delta: i32) {
        self.level = self.level.saturating_add_signed(delta);
        self.push_event(GameEvent::LevelChanged { level: self.level });
        log::info!("Level set to {}", self.level);
    }

    /// Take one life away. Returns whether the session is still running.
    ///
    /// Outside of Running this is a no-op, so nothing can push lives past zero
    /// once the game is over.
    pub fn lose_life(&mut self, cause: LifeLoss) -> bool {
        if !self.is_running() {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        self.push_event(GameEvent::LifeLost {
            cause,
            lives: self.lives,
        });
        log::debug!("{:?}. Lives remaining: {}", cause, self.lives);
        if self.lives == 0 {
            self.game_over();
            return false;
        }
        true
    }

    /// Apply an input event immediately
    pub fn handle_input(&mut self, event: InputEvent) {
        let running = self.is_running();
        match event {
            InputEvent::KeyDown(key) => self.input.key_down(key, running),
            InputEvent::KeyUp(key) => self.input.key_up(key),
            InputEvent::PointerMoved(x) => self.input.pointer_moved(x, running),
        }
    }

    /// Queue an event for the host, dropping the oldest once the backlog is full
    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
            log::trace!("Event backlog full, dropped oldest event");
        }
        self.events.push_back(event);
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }
}
