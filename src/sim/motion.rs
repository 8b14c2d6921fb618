//! Per-frame movement and rocket guidance

use glam::Vec2;

use super::input::Key;
use super::state::{Bullet, Enemy, GameState, LifeLoss, Rocket};
use crate::consts::*;

/// Ship follows the pointer horizontally and the held keys vertically
pub fn update_player(state: &mut GameState) {
    let player = &mut state.player;
    player.pos.x = state.input.pointer_x - player.size.x / 2.0;

    if state.input.is_held(Key::Up) && player.pos.y > 0.0 {
        player.pos.y -= player.speed;
    }
    if state.input.is_held(Key::Down) && player.pos.y < FIELD_HEIGHT - player.size.y {
        player.pos.y += player.speed;
    }
}

/// Bullets fly off the top or sides; nothing falls out the bottom
pub fn bullet_in_bounds(bullet: &Bullet) -> bool {
    bullet.pos.y >= 0.0 && bullet.pos.x >= 0.0 && bullet.pos.x <= FIELD_WIDTH
}

pub fn rocket_in_bounds(rocket: &Rocket) -> bool {
    rocket.pos.y >= 0.0
        && rocket.pos.x >= 0.0
        && rocket.pos.x <= FIELD_WIDTH
        && rocket.pos.y <= FIELD_HEIGHT
}

pub fn enemy_in_bounds(enemy: &Enemy) -> bool {
    enemy.pos.y <= FIELD_HEIGHT
}

pub fn update_bullets(state: &mut GameState) {
    for bullet in &mut state.bullets {
        bullet.pos += bullet.vel;
    }
    state.bullets.retain(bullet_in_bounds);
}

/// Closest enemy by top-left distance; the first of equally close enemies wins
pub fn nearest_enemy(from: Vec2, enemies: &[Enemy]) -> Option<&Enemy> {
    let mut best: Option<(&Enemy, f32)> = None;
    for enemy in enemies {
        let dist = from.distance_squared(enemy.pos);
        if best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((enemy, dist));
        }
    }
    best.map(|(enemy, _)| enemy)
}

/// Where a rocket aims: the target's position a couple of frames from now
pub fn predicted_position(target: &Enemy) -> Vec2 {
    Vec2::new(target.pos.x, target.pos.y + target.speed * HOMING_LEAD_FRAMES)
}

/// Steer one step toward the predicted target position.
///
/// A rocket sitting exactly on the aim point has no direction; it holds
/// position and heading for this frame.
pub fn home_toward(rocket: &mut Rocket, target: &Enemy) {
    let delta = predicted_position(target) - rocket.pos;
    let distance = delta.length();
    if distance > 0.0 {
        rocket.angle = delta.y.atan2(delta.x);
        rocket.pos += delta / distance * rocket.speed;
    }
}

pub fn update_rockets(state: &mut GameState) {
    let enemies = &state.enemies;
    for rocket in &mut state.rockets {
        let target = if rocket.homing {
            nearest_enemy(rocket.pos, enemies)
        } else {
            None
        };
        match target {
            Some(target) => home_toward(rocket, target),
            None => rocket.climb(),
        }
    }
    state.rockets.retain(rocket_in_bounds);
}

/// Enemies fall; each one that leaves the bottom costs a life.
///
/// Escapes after the session has ended are still cleared, just not charged.
pub fn update_enemies(state: &mut GameState) {
    for enemy in &mut state.enemies {
        enemy.pos.y += enemy.speed;
    }
    let before = state.enemies.len();
    state.enemies.retain(enemy_in_bounds);
    let escaped = before - state.enemies.len();

    for _ in 0..escaped {
        if !state.lose_life(LifeLoss::EnemyEscaped) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HEADING_UP;
    use crate::sim::{GamePhase, InputEvent};

    fn running_state() -> GameState {
        let mut state = GameState::new(3);
        state.start();
        state
    }

    #[test]
    fn test_player_tracks_pointer_and_keys() {
        let mut state = running_state();
        state.handle_input(InputEvent::PointerMoved(100.0));
        state.handle_input(InputEvent::KeyDown(Key::Up));
        update_player(&mut state);
        assert_eq!(state.player.pos, Vec2::new(80.0, 535.0));

        state.handle_input(InputEvent::KeyUp(Key::Up));
        state.handle_input(InputEvent::KeyDown(Key::Down));
        update_player(&mut state);
        update_player(&mut state);
        assert_eq!(state.player.pos.y, 545.0);
    }

    #[test]
    fn test_player_stops_at_bottom_edge() {
        let mut state = running_state();
        state.handle_input(InputEvent::KeyDown(Key::Down));
        for _ in 0..100 {
            update_player(&mut state);
        }
        assert_eq!(state.player.pos.y, FIELD_HEIGHT - PLAYER_SIZE);
    }

    #[test]
    fn test_bullets_leave_through_top_and_sides() {
        let mut state = running_state();
        state.bullets.push(Bullet::new(Vec2::new(400.0, 4.0), 0.0));
        state.bullets.push(Bullet::new(Vec2::new(2.0, 300.0), (-40.0f32).to_radians()));
        state.bullets.push(Bullet::new(Vec2::new(400.0, 300.0), 0.0));
        update_bullets(&mut state);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].pos, Vec2::new(400.0, 292.0));
    }

    #[test]
    fn test_nearest_enemy_prefers_first_on_tie() {
        let enemies = vec![
            Enemy::new(Vec2::new(10.0, 0.0), 1.0),
            Enemy::new(Vec2::new(-10.0, 0.0), 2.0),
            Enemy::new(Vec2::new(50.0, 50.0), 3.0),
        ];
        let nearest = nearest_enemy(Vec2::ZERO, &enemies).unwrap();
        assert_eq!(nearest.speed, 1.0);
        assert!(nearest_enemy(Vec2::ZERO, &[]).is_none());
    }

    #[test]
    fn test_rocket_homes_on_predicted_position() {
        let mut state = running_state();
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), 3.0));
        state.rockets.push(Rocket::new(Vec2::new(417.0, 540.0)));
        update_rockets(&mut state);

        let rocket = &state.rockets[0];
        let (dx, dy) = (100.0 - 417.0, 106.0 - 540.0);
        let expected: f32 = f32::atan2(dy, dx);
        assert!((rocket.angle - expected).abs() < 1e-6);
        let moved = rocket.pos - Vec2::new(417.0, 540.0);
        assert!((moved.length() - ROCKET_SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_rocket_on_aim_point_holds_still() {
        let target = Enemy::new(Vec2::new(200.0, 100.0), 5.0);
        let mut rocket = Rocket::new(Vec2::new(200.0, 110.0));
        rocket.angle = 1.25;
        home_toward(&mut rocket, &target);
        assert_eq!(rocket.pos, Vec2::new(200.0, 110.0));
        assert_eq!(rocket.angle, 1.25);
    }

    #[test]
    fn test_rocket_climbs_without_targets() {
        let mut state = running_state();
        state.rockets.push(Rocket::new(Vec2::new(300.0, 300.0)));
        let mut unguided = Rocket::new(Vec2::new(500.0, 300.0));
        unguided.homing = false;
        state.rockets.push(unguided);

        update_rockets(&mut state);
        for rocket in &state.rockets {
            assert_eq!(rocket.pos.y, 282.0);
            assert_eq!(rocket.angle, HEADING_UP);
        }
    }

    #[test]
    fn test_rocket_removed_on_any_edge() {
        let mut state = running_state();
        state.rockets.push(Rocket::new(Vec2::new(300.0, 10.0)));
        update_rockets(&mut state);
        assert!(state.rockets.is_empty());
    }

    #[test]
    fn test_escaped_enemy_costs_a_life() {
        let mut state = running_state();
        state.enemies.push(Enemy::new(Vec2::new(100.0, 598.0), 3.0));
        state.enemies.push(Enemy::new(Vec2::new(200.0, 100.0), 3.0));
        update_enemies(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_escapes_stop_charging_after_game_over() {
        let mut state = running_state();
        state.lives = 1;
        for x in [0.0, 100.0, 200.0] {
            state.enemies.push(Enemy::new(Vec2::new(x, 599.0), 5.0));
        }
        update_enemies(&mut state);
        assert!(state.enemies.is_empty());
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::Over);
    }
}
