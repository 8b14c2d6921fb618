//! Held keys, pointer position and the fire button

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_WIDTH, PLAYER_SIZE};

/// Logical keys the simulation reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Fire,
    /// Any other key; tracked but unused by the simulation
    Other(char),
}

/// Input events delivered by the host between frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Pointer x in field coordinates
    PointerMoved(f32),
}

#[derive(Debug, Clone)]
pub struct InputState {
    held: HashSet<Key>,
    /// Pointer x, clamped so the ship stays on the field
    pub pointer_x: f32,
    /// Fire button held while a session was running
    pub firing: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            held: HashSet::new(),
            pointer_x: FIELD_WIDTH / 2.0,
            firing: false,
        }
    }
}

impl InputState {
    pub fn key_down(&mut self, key: Key, running: bool) {
        self.held.insert(key);
        if key == Key::Fire && running {
            self.firing = true;
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
        if key == Key::Fire {
            self.firing = false;
        }
    }

    /// Pointer moves are ignored outside of a running session
    pub fn pointer_moved(&mut self, x: f32, running: bool) {
        if running {
            let half = PLAYER_SIZE / 2.0;
            self.pointer_x = x.clamp(half, FIELD_WIDTH - half);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Session reset: center the pointer and drop the fire flag.
    /// Physically held keys stay held.
    pub fn reset(&mut self) {
        self.pointer_x = FIELD_WIDTH / 2.0;
        self.firing = false;
    }
}
