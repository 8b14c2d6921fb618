//! Host-side frame loop
//!
//! Owns the session state plus the render sink and presenter, and runs one
//! tick + render per display frame. Scheduling is up to the host: it keeps
//! calling [`GameLoop::frame`] for as long as that returns `true`.

use std::io;

use crate::frame::{Frame, Hud, Presenter, RenderSink};
use crate::sim::{GameEvent, GamePhase, GameState, InputEvent, tick};

/// What to do once a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopPolicy {
    /// Keep rendering the frozen field until the host stops the loop
    #[default]
    KeepRendering,
    /// Render the final frame, then stop scheduling
    StopOnGameOver,
}

pub struct GameLoop<R: RenderSink, P: Presenter> {
    state: GameState,
    renderer: R,
    presenter: P,
    policy: StopPolicy,
    paused: bool,
    stopped: bool,
    last_hud: Option<Hud>,
}

impl<R: RenderSink, P: Presenter> GameLoop<R, P> {
    pub fn new(state: GameState, renderer: R, presenter: P, policy: StopPolicy) -> Self {
        let mut game = Self {
            state,
            renderer,
            presenter,
            policy,
            paused: false,
            stopped: false,
            last_hud: None,
        };
        game.present();
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        self.state.handle_input(event);
    }

    pub fn start(&mut self) {
        self.state.start();
        self.stopped = false;
        self.present();
    }

    pub fn restart(&mut self) {
        self.state.restart();
        self.stopped = false;
        self.present();
    }

    /// End the session now, as if the last life had been lost
    pub fn game_over(&mut self) {
        if self.state.is_running() {
            self.state.game_over();
            self.present();
        }
    }

    pub fn change_level(&mut self, delta: i32) {
        self.state.change_level(delta);
        self.present();
    }

    /// Stop scheduling frames for good
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Suspend simulation; frames still render
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            log::info!("Resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the host should keep scheduling frames
    pub fn is_scheduled(&self) -> bool {
        !self.stopped
    }

    /// Run one display frame: tick (unless paused), render, present.
    ///
    /// Returns whether the host should schedule another frame.
    pub fn frame(&mut self, now_ms: f64) -> io::Result<bool> {
        if self.stopped {
            return Ok(false);
        }
        if !self.paused {
            tick(&mut self.state, now_ms);
        }
        self.renderer.render(&Frame::capture(&self.state))?;
        self.present();

        if self.policy == StopPolicy::StopOnGameOver && self.state.phase == GamePhase::Over {
            log::info!("Session over, stopping frame loop");
            self.stopped = true;
        }
        Ok(!self.stopped)
    }

    /// Push HUD values if anything changed since the last push
    fn present(&mut self) {
        let events = self.state.drain_events();
        let hud = Hud::of(&self.state);
        if !events.is_empty() || self.last_hud != Some(hud) {
            self.presenter.show_hud(hud);
            self.last_hud = Some(hud);
        }
        for event in events {
            if let GameEvent::GameOver { final_score } = event {
                self.presenter.show_game_over(final_score);
            }
        }
    }
}
