//! High-level floor generation that sequences carving, loot, enemies and exit.

use crate::config::GenerationConfig;
use crate::types::GenerationError;

use super::exit::place_exit;
use super::layout::carve_level;
use super::loot::{LootContext, enforce_gold_target, scatter_treasures};
use super::model::{BreakableWalls, FloorState};
use super::progression::{base_enemy_count, target_gold};
use super::rng::GenRng;
use super::spawns::{SpawnContext, place_enemies};

pub struct FloorGenerator {
    config: GenerationConfig,
}

impl FloorGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Runs every stage once, in order, and returns the finished floor.
    ///
    /// Each stage accepts whatever the previous one produced; nothing is
    /// retried or rolled back, so an absent exit is possible.
    pub fn generate(&self, rng: &mut GenRng) -> Result<FloorState, GenerationError> {
        let config = &self.config;
        let layout = carve_level(config.width, config.height, &config.carve, rng)?;
        let target_gold = target_gold(config.width, config.height, &config.difficulty);

        let loot_context = LootContext {
            grid: &layout.grid,
            spawn: layout.spawn,
            catalog: &config.treasure_types,
        };
        let mut treasures = scatter_treasures(&loot_context, config.effective_density(), rng);
        enforce_gold_target(&loot_context, &mut treasures, target_gold, rng);

        let spawn_context = SpawnContext { grid: &layout.grid, spawn: layout.spawn };
        let base_count = base_enemy_count(config.width, config.height);
        let enemies = place_enemies(&spawn_context, base_count, &config.difficulty, rng);

        let exit = place_exit(&layout.grid, layout.spawn, config.exit_samples, rng);

        let floor = FloorState {
            grid: layout.grid,
            spawn: layout.spawn,
            shop: layout.shop,
            treasures,
            enemies,
            exit,
            target_gold,
            breakable_walls: BreakableWalls::new(),
        };
        tracing::info!(
            width = config.width,
            height = config.height,
            treasures = floor.treasures.len(),
            enemies = floor.enemies.len(),
            target_gold,
            has_exit = floor.is_winnable(),
            "generated floor"
        );
        Ok(floor)
    }

    /// Regenerates until a floor has an exit, up to `max_attempts` floors.
    pub fn generate_with_exit(
        &self,
        rng: &mut GenRng,
        max_attempts: usize,
    ) -> Result<FloorState, GenerationError> {
        for attempt in 1..=max_attempts {
            let floor = self.generate(rng)?;
            if floor.is_winnable() {
                return Ok(floor);
            }
            tracing::warn!(attempt, max_attempts, "floor has no exit; regenerating");
        }
        Err(GenerationError::NoExit { attempts: max_attempts })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;
    use crate::config::CarveParams;
    use crate::content::{TreasureCatalog, TreasureType};
    use crate::mapgen::DifficultyProfile;
    use crate::mapgen::loot::{BACKFILL_SPAWN_CLEARANCE, SCATTER_SPAWN_CLEARANCE};
    use crate::mapgen::progression::{Difficulty, enemy_target};
    use crate::mapgen::spawns::ENEMY_SPAWN_CLEARANCE;
    use crate::types::{Pos, Tile};

    fn generate(config: GenerationConfig, seed: u64) -> FloorState {
        FloorGenerator::new(config)
            .generate(&mut GenRng::from_seed(seed))
            .expect("positive dimensions generate")
    }

    #[test]
    fn same_seed_produces_byte_identical_floor() {
        let config = GenerationConfig::default();
        let a = generate(config.clone(), 123_456);
        let b = generate(config, 123_456);
        assert_eq!(a.canonical_bytes(), b.canonical_bytes());
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn different_seeds_produce_different_floors() {
        let config = GenerationConfig::default();
        assert_ne!(generate(config.clone(), 1).fingerprint(), generate(config, 2).fingerprint());
    }

    #[test]
    fn generated_floor_meets_gold_target_and_keeps_breakables_empty() {
        let config = GenerationConfig::default();
        let floor = generate(config.clone(), 77);
        assert!(floor.total_treasure_value(&config.treasure_types) >= u64::from(floor.target_gold));
        assert!(floor.breakable_walls.is_empty());
        assert_eq!(floor.target_gold, 737);
    }

    #[test]
    fn enemy_count_never_exceeds_scaled_target() {
        let config = GenerationConfig::default();
        let floor = generate(config, 5);
        // 96 * 64 / 160 = 38 enemies at normal difficulty.
        assert!(floor.enemies.len() <= 38);
        for enemy in &floor.enemies {
            assert!(enemy.tile().manhattan(floor.spawn) > ENEMY_SPAWN_CLEARANCE);
        }
    }

    #[test]
    fn density_scenario_tops_up_to_two_hundred_gold() {
        let catalog =
            TreasureCatalog::new(vec![TreasureType::new("Coin", [255, 215, 0], 1, 10)]);
        let config = GenerationConfig {
            width: 60,
            height: 40,
            treasure_density: 0.05,
            treasure_types: catalog.clone(),
            difficulty: DifficultyProfile {
                enemy_mult: 1.0,
                spitter_chance: 0.3,
                target_mult: 1.0,
            },
            ..GenerationConfig::default()
        };
        let floor = generate(config, 2_024);

        assert_eq!(floor.target_gold, 288);
        assert!(floor.treasures.len() >= 20);
        assert!(floor.total_treasure_value(&catalog) >= 200);
        assert!(floor.total_treasure_value(&catalog) >= u64::from(floor.target_gold));
    }

    #[test]
    fn tiny_grid_with_huge_density_terminates() {
        let config = GenerationConfig { treasure_density: 0.9, ..GenerationConfig::default() }
            .with_size(10, 10);
        let floor = generate(config, 9);
        assert_eq!(floor.target_gold, 200);
        assert!(floor.grid.is_floor(floor.spawn));
        assert!(floor.treasures.len() <= floor.grid.floor_count());
    }

    #[test]
    fn zero_sized_config_is_rejected() {
        let generator = FloorGenerator::new(GenerationConfig::default().with_size(0, 12));
        let result = generator.generate(&mut GenRng::from_seed(1));
        assert_eq!(result, Err(GenerationError::InvalidDimensions { width: 0, height: 12 }));
    }

    #[test]
    fn regeneration_reports_unwinnable_configurations() {
        let config = GenerationConfig { exit_samples: 0, ..GenerationConfig::default() };
        let generator = FloorGenerator::new(config);
        let result = generator.generate_with_exit(&mut GenRng::from_seed(3), 3);
        assert_eq!(result, Err(GenerationError::NoExit { attempts: 3 }));
    }

    #[test]
    fn regeneration_returns_first_winnable_floor() {
        let generator = FloorGenerator::new(GenerationConfig::default());
        let floor = generator.generate_with_exit(&mut GenRng::from_seed(3), 3).expect("exit");
        assert!(floor.is_winnable());
    }

    #[test]
    fn closed_carve_still_yields_an_open_spawn_room() {
        let config = GenerationConfig {
            carve: CarveParams { rooms: 0, walk_steps: Some(0), ..CarveParams::default() },
            ..GenerationConfig::default()
        };
        let floor = generate(config, 4);
        // Only the 11x9 spawn room survives; smoothing cannot open solid rock.
        assert_eq!(floor.grid.floor_count(), 99);
        // Only the four spawn-room corners lie beyond the enemy clearance.
        assert!(floor.enemies.len() <= 4);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]
        #[test]
        fn generation_invariants_hold_across_seeds_and_sizes(
            seed in any::<u64>(),
            width in 1_usize..72,
            height in 1_usize..56,
            density in 0.01_f64..=1.0,
        ) {
            let config = GenerationConfig {
                treasure_density: density,
                ..GenerationConfig::default()
            }
            .with_size(width, height);
            let floor = generate(config.clone(), seed);

            prop_assert_eq!(floor.grid.tile_at(floor.spawn), Tile::Floor);

            let treasure_tiles: BTreeSet<Pos> =
                floor.treasures.iter().map(|treasure| treasure.tile()).collect();
            prop_assert_eq!(treasure_tiles.len(), floor.treasures.len());
            for treasure in &floor.treasures {
                prop_assert!(floor.grid.is_floor(treasure.tile()));
                prop_assert!(treasure.tile().manhattan(floor.spawn) > BACKFILL_SPAWN_CLEARANCE);
            }

            let base = base_enemy_count(width, height);
            let target = enemy_target(base, &config.difficulty);
            prop_assert!(floor.enemies.len() <= target);

            if let Some(exit) = floor.exit {
                prop_assert!(floor.grid.is_floor(exit.origin()));
            }
        }

        #[test]
        fn scattered_treasure_and_enemies_keep_clear_of_spawn(
            seed in any::<u64>(),
            width in 20_usize..90,
            height in 20_usize..70,
            density in 0.01_f64..=1.0,
        ) {
            let catalog = TreasureCatalog::default();
            let mut rng = GenRng::from_seed(seed);
            let layout =
                carve_level(width, height, &CarveParams::default(), &mut rng).expect("valid size");
            let loot = LootContext { grid: &layout.grid, spawn: layout.spawn, catalog: &catalog };
            for treasure in scatter_treasures(&loot, density, &mut rng) {
                prop_assert!(treasure.tile().manhattan(layout.spawn) > SCATTER_SPAWN_CLEARANCE);
            }

            let spawns = SpawnContext { grid: &layout.grid, spawn: layout.spawn };
            let profile = Difficulty::Hard.profile();
            let base = base_enemy_count(width, height);
            let enemies = place_enemies(&spawns, base, &profile, &mut rng);
            prop_assert!(enemies.len() <= enemy_target(base, &profile));
            for enemy in &enemies {
                prop_assert!(enemy.tile().manhattan(layout.spawn) > ENEMY_SPAWN_CLEARANCE);
            }
        }
    }
}
