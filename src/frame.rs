//! Per-frame snapshots and the sinks that consume them
//!
//! The simulation never draws. After every frame the host captures a
//! [`Frame`] for a [`RenderSink`] and pushes [`Hud`] values to a
//! [`Presenter`] whenever something visible to the player changed.

use std::io::{self, Write};

use glam::Vec2;
use serde::Serialize;

use crate::sim::{
    Bullet, Enemy, ExplosionKind, GamePhase, GameState, LevelBanner, Player, Rocket,
};

/// Numbers shown in the heads-up display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub score: u32,
    pub lives: u32,
    pub level: u32,
}

impl Hud {
    pub fn of(state: &GameState) -> Self {
        Self {
            score: state.score,
            lives: state.lives,
            level: state.level,
        }
    }
}

/// An explosion as it should be drawn this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExplosionSprite {
    pub pos: Vec2,
    pub radius: f32,
    /// Fade in `[0, 1]`
    pub alpha: f32,
    pub kind: ExplosionKind,
}

/// Everything a renderer needs for one frame, borrowed from the state
#[derive(Debug, Clone, Serialize)]
pub struct Frame<'a> {
    pub frame: u64,
    pub phase: GamePhase,
    pub hud: Hud,
    /// Set once a session has ended
    pub final_score: Option<u32>,
    pub player: &'a Player,
    pub bullets: &'a [Bullet],
    pub rockets: &'a [Rocket],
    pub enemies: &'a [Enemy],
    pub explosions: Vec<ExplosionSprite>,
    pub banners: &'a [LevelBanner],
}

impl<'a> Frame<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        Self {
            frame: state.frame,
            phase: state.phase,
            hud: Hud::of(state),
            final_score: state.final_score,
            player: &state.player,
            bullets: &state.bullets,
            rockets: &state.rockets,
            enemies: &state.enemies,
            explosions: state
                .explosions
                .iter()
                .map(|e| ExplosionSprite {
                    pos: e.pos,
                    radius: e.radius,
                    alpha: e.alpha(),
                    kind: e.kind,
                })
                .collect(),
            banners: &state.banners,
        }
    }
}

/// Paints a frame. Called once per display frame, in every phase.
pub trait RenderSink {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()>;
}

/// Receives HUD values whenever they may have changed
pub trait Presenter {
    fn show_hud(&mut self, hud: Hud);

    fn show_game_over(&mut self, _final_score: u32) {}
}

/// Renderer that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl RenderSink for Discard {
    fn render(&mut self, _frame: &Frame<'_>) -> io::Result<()> {
        Ok(())
    }
}

impl Presenter for Discard {
    fn show_hud(&mut self, _hud: Hud) {}
}

/// Writes each frame as one JSON object per line
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for JsonLinesSink<W> {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")
    }
}
