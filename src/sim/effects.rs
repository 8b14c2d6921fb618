//! Explosion and banner countdowns

use super::state::{Explosion, GameState, LevelBanner};
use crate::consts::BANNER_LIFE;

pub fn decay_explosions(explosions: &mut Vec<Explosion>) {
    for explosion in explosions.iter_mut() {
        explosion.life -= 1;
    }
    explosions.retain(|e| e.life > 0);
}

/// Count banners down and refresh their fade
pub fn decay_banners(banners: &mut Vec<LevelBanner>) {
    for banner in banners.iter_mut() {
        banner.life -= 1;
        banner.alpha = banner.life as f32 / BANNER_LIFE as f32;
    }
    banners.retain(|b| b.life > 0);
}

pub fn decay_effects(state: &mut GameState) {
    decay_explosions(&mut state.explosions);
    decay_banners(&mut state.banners);
}
