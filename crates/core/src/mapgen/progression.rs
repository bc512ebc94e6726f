//! Difficulty profiles and the level-size scaling rules derived from them.

use serde::{Deserialize, Serialize};

/// Multipliers scaling enemy count, enemy composition and the gold target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub enemy_mult: f64,
    /// Probability in `[0, 1]` that a placed enemy is a spitter.
    pub spitter_chance: f64,
    pub target_mult: f64,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Difficulty::Normal.profile()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => {
                DifficultyProfile { enemy_mult: 0.7, spitter_chance: 0.15, target_mult: 0.8 }
            }
            Difficulty::Normal => {
                DifficultyProfile { enemy_mult: 1.0, spitter_chance: 0.3, target_mult: 1.0 }
            }
            Difficulty::Hard => {
                DifficultyProfile { enemy_mult: 1.4, spitter_chance: 0.45, target_mult: 1.25 }
            }
        }
    }
}

pub const MIN_TARGET_GOLD: u32 = 200;
pub const MIN_BASE_ENEMY_COUNT: usize = 8;
pub const MIN_ENEMY_TARGET: usize = 4;

const GOLD_PER_TILE: f64 = 0.12;
const TILES_PER_ENEMY: usize = 160;

pub fn target_gold(width: usize, height: usize, profile: &DifficultyProfile) -> u32 {
    let base_target = ((width * height) as f64 * GOLD_PER_TILE).floor();
    let scaled = (base_target * profile.target_mult).floor();
    // Saturating float-to-int cast; NaN lands on zero and then the floor.
    (scaled as u32).max(MIN_TARGET_GOLD)
}

pub fn base_enemy_count(width: usize, height: usize) -> usize {
    ((width * height) / TILES_PER_ENEMY).max(MIN_BASE_ENEMY_COUNT)
}

pub fn enemy_target(base_count: usize, profile: &DifficultyProfile) -> usize {
    let scaled = (base_count as f64 * profile.enemy_mult).floor() as usize;
    scaled.max(MIN_ENEMY_TARGET)
}
