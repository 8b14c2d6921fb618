use glam::Vec2;

use rocket_barrage::frame::{Discard, Frame, JsonLinesSink};
use rocket_barrage::sim::motion::{predicted_position, update_enemies, update_rockets};
use rocket_barrage::sim::{
    Bullet, Enemy, GameEvent, GamePhase, GameState, InputEvent, Key, LifeLoss, Rocket, Weapon,
    resolve_collisions, tick,
};
use rocket_barrage::{GameLoop, StopPolicy};

fn running(seed: u64) -> GameState {
    let mut state = GameState::new(seed);
    state.start();
    state
}

// ── Session lifecycle ─────────────────────────────────────────────────────────

#[test]
fn start_resets_to_level_twenty() {
    let mut state = GameState::new(1);
    assert_eq!(state.phase, GamePhase::Idle);
    state.start();
    assert_eq!(state.phase, GamePhase::Running);
    assert_eq!((state.score, state.lives, state.level), (0, 3, 20));
    assert_eq!(state.player.pos, Vec2::new(400.0, 540.0));
}

#[test]
fn restart_keeps_current_level() {
    let mut state = running(1);
    state.change_level(5);
    state.score = 420;
    state.game_over();
    assert_eq!(state.final_score, Some(420));

    state.restart();
    assert_eq!(state.phase, GamePhase::Running);
    assert_eq!((state.score, state.lives, state.level), (0, 3, 25));
    assert_eq!(state.final_score, None);

    state.start();
    assert_eq!(state.level, 20);
}

#[test]
fn level_never_drops_below_zero() {
    let mut state = GameState::new(1);
    state.change_level(-3);
    assert_eq!(state.level, 0);
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[test]
fn escaped_enemy_costs_one_life() {
    let mut state = running(1);
    state.enemies.push(Enemy::new(Vec2::new(100.0, -30.0), 3.0));

    // -30 + 3 * 210 = 600 is still on the field
    for _ in 0..210 {
        update_enemies(&mut state);
    }
    assert_eq!(state.enemies.len(), 1);
    assert_eq!(state.lives, 3);

    update_enemies(&mut state);
    assert!(state.enemies.is_empty());
    assert_eq!(state.lives, 2);
    assert_eq!(state.score, 0);
    assert_eq!(state.phase, GamePhase::Running);
    assert!(state.events.contains(&GameEvent::LifeLost {
        cause: LifeLoss::EnemyEscaped,
        lives: 2,
    }));
}

#[test]
fn third_escape_ends_session() {
    let mut state = running(1);
    for x in [100.0, 200.0, 300.0, 400.0] {
        state.enemies.push(Enemy::new(Vec2::new(x, 598.0), 4.0));
    }
    update_enemies(&mut state);
    assert_eq!(state.phase, GamePhase::Over);
    assert_eq!(state.lives, 0);
    assert!(state.enemies.is_empty());
    assert_eq!(state.final_score, Some(0));
}

#[test]
fn ramming_enemy_costs_life_not_points() {
    let mut state = running(1);
    let ship = state.player.pos;
    state.enemies.push(Enemy::new(ship + Vec2::new(5.0, 5.0), 2.0));
    resolve_collisions(&mut state);
    assert!(state.enemies.is_empty());
    assert_eq!(state.lives, 2);
    assert_eq!(state.score, 0);
    assert_eq!(state.explosions.len(), 1);
}

// ── Weapons ───────────────────────────────────────────────────────────────────

#[test]
fn homing_rocket_turns_toward_predicted_position() {
    let mut state = running(1);
    let origin = Vec2::new(400.0, 500.0);
    state.rockets.push(Rocket::new(origin));
    state.enemies.push(Enemy::new(Vec2::new(150.0, 100.0), 4.0));

    let aim = predicted_position(&state.enemies[0]);
    assert_eq!(aim, Vec2::new(150.0, 108.0));
    update_rockets(&mut state);

    let rocket = &state.rockets[0];
    let delta = aim - origin;
    assert!((rocket.angle - delta.y.atan2(delta.x)).abs() < 1e-6);
    assert!((rocket.pos.distance(origin) - 18.0).abs() < 1e-4);
}

#[test]
fn rocket_without_targets_climbs() {
    let mut state = running(1);
    state.rockets.push(Rocket::new(Vec2::new(400.0, 500.0)));
    update_rockets(&mut state);
    assert_eq!(state.rockets[0].pos, Vec2::new(400.0, 482.0));
}

#[test]
fn fire_held_spawns_spread_and_rocket() {
    let mut state = running(1);
    state.enemies.push(Enemy::new(Vec2::new(10.0, 10.0), 0.5));
    state.handle_input(InputEvent::KeyDown(Key::Fire));
    tick(&mut state, 0.0);
    assert_eq!(state.bullets.len(), 5);
    assert_eq!(state.rockets.len(), 1);

    // Both weapons are still cooling down 16ms later
    tick(&mut state, 16.0);
    assert_eq!(state.bullets.len(), 5);
    assert_eq!(state.rockets.len(), 1);
}

#[test]
fn thousand_points_of_bullets_reach_level_twenty_one() {
    let mut state = running(1);
    for i in 0..100 {
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), 1.0));
        state.bullets.push(Bullet::new(Vec2::new(110.0, 110.0), 0.0));
        resolve_collisions(&mut state);
        assert_eq!(state.score, (i + 1) * 10);
    }

    assert_eq!(state.level, 21);
    assert_eq!(state.banners.len(), 1);
    assert_eq!(state.banners[0].text, "LEVEL 21!");
    assert_eq!(state.banners[0].life, 60);
    let kills = state
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::EnemyDestroyed { weapon: Weapon::Bullet, points: 10 }))
        .count();
    assert_eq!(kills, 100);
}

#[test]
fn two_bullets_one_enemy_scores_once() {
    let mut state = running(1);
    state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), 1.0));
    state.bullets.push(Bullet::new(Vec2::new(105.0, 105.0), 0.0));
    state.bullets.push(Bullet::new(Vec2::new(115.0, 105.0), 0.0));
    resolve_collisions(&mut state);
    assert_eq!(state.score, 10);
    assert_eq!(state.bullets.len(), 1);
}

// ── Host loop ─────────────────────────────────────────────────────────────────

#[test]
fn same_seed_same_session() {
    let play = |seed| {
        let mut game = GameLoop::new(GameState::new(seed), Discard, Discard, StopPolicy::default());
        game.start();
        game.handle_input(InputEvent::KeyDown(Key::Fire));
        for i in 0..600 {
            game.handle_input(InputEvent::PointerMoved(100.0 + (i % 600) as f32));
            game.frame(i as f64 * 16.0).unwrap();
        }
        let state = game.state();
        (state.score, state.lives, state.level, state.enemies.len(), state.frame)
    };
    assert_eq!(play(77), play(77));
}

#[test]
fn json_frames_follow_the_session() {
    let mut game = GameLoop::new(
        GameState::new(3),
        JsonLinesSink::new(Vec::new()),
        Discard,
        StopPolicy::StopOnGameOver,
    );
    game.frame(0.0).unwrap();
    game.start();
    game.frame(16.0).unwrap();
    game.game_over();
    assert!(!game.frame(32.0).unwrap());

    let state = game.state();
    let snapshot = serde_json::to_value(Frame::capture(state)).unwrap();
    assert_eq!(snapshot["final_score"], 0);
}
