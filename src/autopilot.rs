//! Demo-mode steering
//!
//! Keeps the ship under the enemy closest to escaping and sidesteps anything
//! about to ram it. Rockets fire on their own, so the autopilot only has to
//! aim the spread.

use crate::center_of;
use crate::consts::{FIELD_WIDTH, PLAYER_SIZE};
use crate::sim::{Enemy, GameState, InputEvent, Key};

/// How far above the ship an enemy counts as an immediate threat
const DANGER_ZONE: f32 = 90.0;

/// The enemy lowest on the field, if any has entered it
fn most_urgent(enemies: &[Enemy]) -> Option<&Enemy> {
    enemies
        .iter()
        .filter(|e| e.pos.y + e.size.y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
}

/// Pointer x the ship should move toward this frame
pub fn steer(state: &GameState) -> Option<f32> {
    let target = most_urgent(&state.enemies)?;
    let aim = center_of(target.pos, target.size).x;

    let ship = &state.player;
    let threat_above = target.pos.y + target.size.y > ship.pos.y - DANGER_ZONE;
    if !threat_above {
        return Some(aim);
    }

    // Dodge toward whichever side has more room
    let offset = PLAYER_SIZE + target.size.x;
    let dodge = if aim > FIELD_WIDTH / 2.0 { aim - offset } else { aim + offset };
    Some(dodge)
}

/// Input events for one demo frame
pub fn drive(state: &GameState) -> Vec<InputEvent> {
    let mut events = Vec::with_capacity(2);
    if !state.input.firing {
        events.push(InputEvent::KeyDown(Key::Fire));
    }
    if let Some(x) = steer(state) {
        events.push(InputEvent::PointerMoved(x));
    }
    events
}
