//! Collision detection and scoring
//!
//! Everything collides as an axis-aligned box. Each weapon resolves against at
//! most one enemy per frame: weapons are walked newest first, and for each one
//! the enemies are walked newest first until the first overlap. Removal is
//! deferred to a single compaction per collection so indices stay stable
//! while a pass runs.

use glam::Vec2;

use super::state::{
    Bullet, Enemy, Explosion, ExplosionKind, GameEvent, GameState, LevelBanner, LifeLoss, Player,
    Rocket, Weapon,
};
use crate::center_of;
use crate::consts::*;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        center_of(self.min, self.size)
    }

    /// Strict overlap: boxes that only touch along an edge do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max().x
            && self.max().x > other.min.x
            && self.min.y < other.max().y
            && self.max().y > other.min.y
    }
}

/// Anything with a collision box
pub trait Hitbox {
    fn hitbox(&self) -> Aabb;
}

macro_rules! impl_hitbox {
    ($($ty:ty),*) => {
        $(impl Hitbox for $ty {
            fn hitbox(&self) -> Aabb {
                Aabb::new(self.pos, self.size)
            }
        })*
    };
}

impl_hitbox!(Player, Bullet, Rocket, Enemy);

/// Level earned by a score
#[inline]
pub fn level_for_score(score: u32) -> u32 {
    score / POINTS_PER_LEVEL + START_LEVEL
}

/// Drop every element whose flag is set, keeping order
fn compact<T>(items: &mut Vec<T>, removed: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !removed[index];
        index += 1;
        keep
    });
}

/// Match weapons against enemies, removing both sides of every hit.
///
/// Returns the centers of destroyed enemies in the order they were hit.
fn sweep<W: Hitbox>(weapons: &mut Vec<W>, enemies: &mut Vec<Enemy>) -> Vec<Vec2> {
    let mut spent = vec![false; weapons.len()];
    let mut destroyed = vec![false; enemies.len()];
    let mut hits = Vec::new();

    for wi in (0..weapons.len()).rev() {
        let weapon_box = weapons[wi].hitbox();
        for ei in (0..enemies.len()).rev() {
            if destroyed[ei] {
                continue;
            }
            let enemy_box = enemies[ei].hitbox();
            if weapon_box.overlaps(&enemy_box) {
                spent[wi] = true;
                destroyed[ei] = true;
                hits.push(enemy_box.center());
                break;
            }
        }
    }

    compact(weapons, &spent);
    compact(enemies, &destroyed);
    hits
}

/// Credit a kill and raise the level if the new score earns it
pub fn award_kill(state: &mut GameState, weapon: Weapon) {
    let points = weapon.points();
    state.score += points;
    state.push_event(GameEvent::EnemyDestroyed { weapon, points });
    log::debug!("{:?} kill (+{}), score {}", weapon, points, state.score);

    let earned = level_for_score(state.score);
    if earned > state.level {
        state.level = earned;
        state.banners.push(LevelBanner::new(earned));
        state.push_event(GameEvent::LevelUp { level: earned });
        log::info!("Level up! Now level {}", earned);
    }
}

/// Ship against every enemy. Ramming costs a life instead of scoring, and
/// the ship itself survives.
fn ram_pass(state: &mut GameState) {
    let ship = state.player.hitbox();
    let mut destroyed = vec![false; state.enemies.len()];

    for ei in (0..state.enemies.len()).rev() {
        let enemy_box = state.enemies[ei].hitbox();
        if !ship.overlaps(&enemy_box) {
            continue;
        }
        destroyed[ei] = true;
        state.explosions.push(Explosion::new(
            enemy_box.center(),
            PLAYER_EXPLOSION,
            ExplosionKind::Small,
        ));
        if !state.lose_life(LifeLoss::PlayerHit) {
            break;
        }
    }

    compact(&mut state.enemies, &destroyed);
}

/// Bullets, then rockets, then the ship, each against the surviving enemies
pub fn resolve_collisions(state: &mut GameState) {
    for center in sweep(&mut state.bullets, &mut state.enemies) {
        state
            .explosions
            .push(Explosion::new(center, BULLET_EXPLOSION, ExplosionKind::Small));
        award_kill(state, Weapon::Bullet);
    }

    for center in sweep(&mut state.rockets, &mut state.enemies) {
        state
            .explosions
            .push(Explosion::new(center, ROCKET_EXPLOSION, ExplosionKind::Large));
        award_kill(state, Weapon::Rocket);
    }

    if state.is_running() {
        ram_pass(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    fn running_state() -> GameState {
        let mut state = GameState::new(11);
        state.start();
        state
    }

    fn bullet_at(x: f32, y: f32) -> Bullet {
        Bullet::new(Vec2::new(x, y), 0.0)
    }

    #[test]
    fn test_aabb_overlap_is_strict() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        assert!(a.overlaps(&Aabb::new(Vec2::splat(9.0), Vec2::splat(10.0))));
        assert!(!a.overlaps(&Aabb::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0))));
        assert!(!a.overlaps(&Aabb::new(Vec2::new(0.0, 20.0), Vec2::splat(10.0))));
    }

    #[test]
    fn test_level_for_score() {
        assert_eq!(level_for_score(0), 20);
        assert_eq!(level_for_score(999), 20);
        assert_eq!(level_for_score(1000), 21);
        assert_eq!(level_for_score(5430), 25);
    }

    #[test]
    fn test_bullet_kill_scores_and_explodes() {
        let mut state = running_state();
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), 3.0));
        state.bullets.push(bullet_at(110.0, 110.0));
        resolve_collisions(&mut state);

        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 10);
        assert_eq!(state.explosions.len(), 1);
        let explosion = &state.explosions[0];
        assert_eq!(explosion.pos, Vec2::new(115.0, 115.0));
        assert_eq!(explosion.radius, 20.0);
        assert_eq!(explosion.life, 10);
        assert_eq!(explosion.kind, ExplosionKind::Small);
    }

    #[test]
    fn test_rocket_kill_is_worth_more() {
        let mut state = running_state();
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), 3.0));
        state.rockets.push(Rocket::new(Vec2::new(110.0, 110.0)));
        resolve_collisions(&mut state);

        assert_eq!(state.score, 20);
        assert!(state.rockets.is_empty());
        let explosion = &state.explosions[0];
        assert_eq!(explosion.radius, 50.0);
        assert_eq!(explosion.life, 25);
        assert_eq!(explosion.kind, ExplosionKind::Large);
    }

    #[test]
    fn test_one_enemy_per_bullet_and_one_bullet_per_enemy() {
        let mut state = running_state();
        // Two overlapping enemies, three bullets all touching both
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), 3.0));
        state.enemies.push(Enemy::new(Vec2::new(105.0, 100.0), 3.0));
        for _ in 0..3 {
            state.bullets.push(bullet_at(115.0, 110.0));
        }
        resolve_collisions(&mut state);

        assert!(state.enemies.is_empty());
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.score, 20);
        // Newest bullet takes the newest enemy first
        assert_eq!(state.explosions[0].pos, Vec2::new(120.0, 115.0));
    }

    #[test]
    fn test_rockets_only_see_enemies_bullets_missed() {
        let mut state = running_state();
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), 3.0));
        state.bullets.push(bullet_at(110.0, 110.0));
        state.rockets.push(Rocket::new(Vec2::new(110.0, 110.0)));
        resolve_collisions(&mut state);

        assert_eq!(state.score, 10);
        assert_eq!(state.rockets.len(), 1, "rocket survives with nothing to hit");
    }

    #[test]
    fn test_ramming_costs_lives_not_score() {
        let mut state = running_state();
        let ship = state.player.pos;
        state.enemies.push(Enemy::new(ship, 3.0));
        state.enemies.push(Enemy::new(ship + Vec2::new(5.0, 5.0), 3.0));
        resolve_collisions(&mut state);

        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 1);
        assert!(state.enemies.is_empty());
        assert_eq!(state.explosions.len(), 2);
        assert_eq!(state.explosions[0].radius, 25.0);
        assert_eq!(state.explosions[0].life, 15);
    }

    #[test]
    fn test_ramming_stops_at_game_over() {
        let mut state = running_state();
        state.lives = 1;
        let ship = state.player.pos;
        state.enemies.push(Enemy::new(ship, 3.0));
        state.enemies.push(Enemy::new(ship, 3.0));
        resolve_collisions(&mut state);

        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(state.lives, 0);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_level_up_banner_on_thousand() {
        let mut state = running_state();
        state.score = 990;
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), 3.0));
        state.bullets.push(bullet_at(110.0, 110.0));
        resolve_collisions(&mut state);

        assert_eq!(state.score, 1000);
        assert_eq!(state.level, 21);
        assert_eq!(state.banners.len(), 1);
        assert_eq!(state.banners[0].text, "LEVEL 21!");
        assert_eq!(state.banners[0].life, 60);
        assert!(state.events.contains(&GameEvent::LevelUp { level: 21 }));
    }

    #[test]
    fn test_no_level_up_below_preserved_level() {
        let mut state = running_state();
        state.level = 30;
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), 3.0));
        state.bullets.push(bullet_at(110.0, 110.0));
        resolve_collisions(&mut state);

        assert_eq!(state.level, 30);
        assert!(state.banners.is_empty());
    }
}
