use std::collections::BTreeSet;

use anyhow::{Result, ensure};
use clap::Parser;
use delve_core::mapgen::{base_enemy_count, enemy_target};
use delve_core::{Difficulty, FloorState, GenerationConfig, Tile, generate_floor};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const BACKFILL_SPAWN_CLEARANCE: u32 = 4;
const ENEMY_SPAWN_CLEARANCE: u32 = 8;
/// Floors at least this many tiles on each edge always have room for the gold target.
const ROOMY_EDGE: usize = 30;

/// Generates many floors over random sizes and difficulties and checks the
/// generation invariants on each one.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 500)]
    floors: u32,
}

fn pick<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    slice[rng.next_u64() as usize % slice.len()]
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("soak=info,delve_core=warn"));
    tracing_subscriber::registry().with(env_filter).with(fmt::layer().with_target(true)).init();

    let args = Args::parse();
    println!("Soaking {} floors from seed {}...", args.floors, args.seed);

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut without_exit = 0;
    for level in 0..args.floors {
        let width = 8 + (rng.next_u64() % 120) as usize;
        let height = 8 + (rng.next_u64() % 80) as usize;
        let difficulty = pick(&mut rng, &[Difficulty::Easy, Difficulty::Normal, Difficulty::Hard]);
        let density = pick(&mut rng, &[0.01, 0.03, 0.1, 0.5, 1.0]);
        let config = GenerationConfig {
            difficulty: difficulty.profile(),
            treasure_density: density,
            ..GenerationConfig::default()
        }
        .with_size(width, height);

        let floor = generate_floor(args.seed, level, &config)?;
        check_invariants(&floor, &config)?;
        let again = generate_floor(args.seed, level, &config)?;
        ensure!(floor.fingerprint() == again.fingerprint(), "level {level} is not reproducible");

        if floor.exit.is_none() {
            without_exit += 1;
            tracing::warn!(level, width, height, "floor generated without an exit");
        }
    }

    println!("Soak completed: {} floors, {} without exit.", args.floors, without_exit);
    Ok(())
}

fn check_invariants(floor: &FloorState, config: &GenerationConfig) -> Result<()> {
    let grid = &floor.grid;
    ensure!(grid.tile_at(floor.spawn) == Tile::Floor, "spawn is not floor");
    ensure!(floor.breakable_walls.is_empty(), "generated floor has breakable walls");

    let mut seen = BTreeSet::new();
    for treasure in &floor.treasures {
        let tile = treasure.tile();
        ensure!(grid.is_floor(tile), "treasure on wall at {tile:?}");
        ensure!(seen.insert(tile), "two treasures share {tile:?}");
        ensure!(treasure.kind < config.treasure_types.len(), "treasure type out of range");
        ensure!(
            tile.manhattan(floor.spawn) > BACKFILL_SPAWN_CLEARANCE,
            "treasure at {tile:?} crowds spawn"
        );
    }
    if config.width >= ROOMY_EDGE && config.height >= ROOMY_EDGE {
        let total = floor.total_treasure_value(&config.treasure_types);
        ensure!(
            total >= u64::from(floor.target_gold),
            "treasure worth {total} misses target {}",
            floor.target_gold
        );
    }

    let target = enemy_target(base_enemy_count(config.width, config.height), &config.difficulty);
    let placed = floor.enemies.len();
    ensure!(placed <= target, "{placed} enemies exceed target {target}");
    for enemy in &floor.enemies {
        let tile = enemy.tile();
        ensure!(grid.is_floor(tile), "enemy on wall at {tile:?}");
        ensure!(
            tile.manhattan(floor.spawn) > ENEMY_SPAWN_CLEARANCE,
            "enemy at {tile:?} crowds spawn"
        );
    }

    if let Some(exit) = floor.exit {
        let anchor = exit.origin();
        ensure!(grid.is_floor(anchor), "exit anchor {anchor:?} is not floor");
    }
    Ok(())
}
