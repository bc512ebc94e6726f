//! Procedural floor generation split into one submodule per pipeline stage.

pub mod model;
pub mod progression;

mod exit;
mod generator;
mod grid;
mod layout;
mod loot;
mod rng;
mod seed;
mod spawns;

use crate::config::GenerationConfig;
use crate::types::GenerationError;

pub use generator::FloorGenerator;
pub use grid::{DEFAULT_BODY_RADIUS, TileGrid};
pub use model::{
    BreakableWalls, EXIT_SIZE_TILES, Enemy, EnemyKind, EnemyState, FloorState,
    SHOP_HEIGHT_TILES, SHOP_WIDTH_TILES, Treasure,
};
pub use progression::{Difficulty, DifficultyProfile, base_enemy_count, enemy_target, target_gold};
pub use rng::GenRng;
pub use seed::derive_floor_seed;

/// Generates level `level_index` of the run seeded by `run_seed`.
pub fn generate_floor(
    run_seed: u64,
    level_index: u32,
    config: &GenerationConfig,
) -> Result<FloorState, GenerationError> {
    let mut rng = GenRng::from_seed(derive_floor_seed(run_seed, level_index));
    FloorGenerator::new(config.clone()).generate(&mut rng)
}
