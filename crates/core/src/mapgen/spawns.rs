//! Enemy placement: bounded rejection sampling with hard spacing against
//! already-accepted enemies, then one soft relaxation sweep.

use crate::types::{Pos, WorldPos};

use super::grid::TileGrid;
use super::model::{Enemy, EnemyKind};
use super::progression::{DifficultyProfile, enemy_target};
use super::rng::GenRng;

/// Enemies are only accepted beyond this Manhattan distance of spawn.
pub(super) const ENEMY_SPAWN_CLEARANCE: u32 = 8;
pub(super) const ATTEMPTS_PER_ENEMY: usize = 400;
/// Hard minimum spacing, in world units, checked at insertion time.
pub(super) const MIN_ENEMY_SPACING: f32 = 24.0;
/// Pairs closer than this are nudged apart once after sampling.
pub(super) const RELAX_DISTANCE: f32 = 20.0;
pub(super) const RELAX_PUSH: f32 = 2.0;

const SAMPLE_BORDER: i32 = 2;
const PHASE_RANGE: f32 = 10.0;
const ATTACK_COOLDOWN_JITTER: f32 = 1.2;

pub(super) struct SpawnContext<'a> {
    pub(super) grid: &'a TileGrid,
    pub(super) spawn: Pos,
}

pub(super) fn place_enemies(
    context: &SpawnContext<'_>,
    base_count: usize,
    profile: &DifficultyProfile,
    rng: &mut GenRng,
) -> Vec<Enemy> {
    let target = enemy_target(base_count, profile);
    // At most one enemy per floor tile.
    let reachable = target.min(context.grid.floor_count());
    let budget = reachable.saturating_mul(ATTEMPTS_PER_ENEMY);
    let mut enemies = Vec::with_capacity(reachable);

    let max_x = context.grid.width() as i32 - SAMPLE_BORDER - 1;
    let max_y = context.grid.height() as i32 - SAMPLE_BORDER - 1;
    if max_x < SAMPLE_BORDER || max_y < SAMPLE_BORDER {
        tracing::warn!(target, "grid too small to sample enemy positions");
        return enemies;
    }

    let mut attempts = 0;
    while enemies.len() < reachable && attempts < budget {
        attempts += 1;
        let tile = Pos {
            y: rng.range_i32(SAMPLE_BORDER, max_y),
            x: rng.range_i32(SAMPLE_BORDER, max_x),
        };
        if !context.grid.is_floor(tile) || tile.manhattan(context.spawn) <= ENEMY_SPAWN_CLEARANCE {
            continue;
        }
        let pos = tile.center();
        if crowds_existing(&enemies, pos) {
            continue;
        }
        enemies.push(roll_enemy(pos, profile, rng));
    }

    if enemies.len() < target {
        tracing::warn!(target, placed = enemies.len(), attempts, "enemy attempt budget exhausted");
    }
    relax_spacing(&mut enemies);
    tracing::debug!(target, placed = enemies.len(), attempts, "placed enemies");
    enemies
}

fn crowds_existing(enemies: &[Enemy], pos: WorldPos) -> bool {
    let min_distance_squared = MIN_ENEMY_SPACING * MIN_ENEMY_SPACING;
    enemies.iter().any(|enemy| enemy.pos.distance_squared(pos) < min_distance_squared)
}

fn roll_enemy(pos: WorldPos, profile: &DifficultyProfile, rng: &mut GenRng) -> Enemy {
    let kind =
        if rng.chance(profile.spitter_chance) { EnemyKind::Spitter } else { EnemyKind::Chaser };
    let mut enemy = Enemy::new(pos, kind);
    enemy.phase = rng.uniform_f32(PHASE_RANGE);
    enemy.attack_cooldown = rng.uniform_f32(ATTACK_COOLDOWN_JITTER);
    enemy
}

/// Pushes every pair closer than [`RELAX_DISTANCE`] apart by [`RELAX_PUSH`]
/// along their separation. Runs once; overlaps it creates are not revisited.
pub(super) fn relax_spacing(enemies: &mut [Enemy]) {
    let relax_distance_squared = RELAX_DISTANCE * RELAX_DISTANCE;
    for first in 0..enemies.len() {
        for second in (first + 1)..enemies.len() {
            let delta = enemies[first].pos - enemies[second].pos;
            if delta.length_squared() >= relax_distance_squared {
                continue;
            }
            let direction = delta.normalized().unwrap_or(WorldPos::new(1.0, 0.0));
            let push = direction * RELAX_PUSH;
            enemies[first].pos += push;
            enemies[second].pos -= push;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::progression::Difficulty;
    use crate::types::Tile;

    fn open_grid(width: usize, height: usize) -> TileGrid {
        let mut grid = TileGrid::filled(width, height, Tile::WallSolid).expect("valid size");
        for y in 1..(height as i32 - 1) {
            for x in 1..(width as i32 - 1) {
                grid.set(Pos::new(x, y), Tile::Floor);
            }
        }
        grid
    }

    #[test]
    fn fills_target_on_open_ground() {
        let grid = open_grid(60, 40);
        let context = SpawnContext { grid: &grid, spawn: grid.center() };
        let profile = Difficulty::Normal.profile();
        let enemies = place_enemies(&context, 8, &profile, &mut GenRng::from_seed(3));
        assert_eq!(enemies.len(), 8);
    }

    #[test]
    fn accepted_enemies_respect_spawn_clearance_and_spacing() {
        let grid = open_grid(60, 40);
        let context = SpawnContext { grid: &grid, spawn: grid.center() };
        let profile = DifficultyProfile { enemy_mult: 3.0, spitter_chance: 0.5, target_mult: 1.0 };
        let enemies = place_enemies(&context, 10, &profile, &mut GenRng::from_seed(21));

        assert!(enemies.len() <= 30);
        for enemy in &enemies {
            assert!(enemy.tile().manhattan(context.spawn) > ENEMY_SPAWN_CLEARANCE);
            assert!(grid.is_floor(enemy.tile()));
            assert_eq!(enemy.hp, enemy.kind.base_hp());
            assert!((0.0..PHASE_RANGE).contains(&enemy.phase));
            assert!((0.0..ATTACK_COOLDOWN_JITTER).contains(&enemy.attack_cooldown));
        }
        // Tile centers are a full tile apart, so no relaxation push moves them.
        for (index, enemy) in enemies.iter().enumerate() {
            for other in &enemies[index + 1..] {
                assert!(enemy.pos.distance_squared(other.pos) >= MIN_ENEMY_SPACING.powi(2));
            }
        }
    }

    #[test]
    fn spitter_chance_controls_composition() {
        let grid = open_grid(60, 40);
        let context = SpawnContext { grid: &grid, spawn: grid.center() };
        let all_spitters =
            DifficultyProfile { enemy_mult: 1.0, spitter_chance: 1.0, target_mult: 1.0 };
        let enemies = place_enemies(&context, 8, &all_spitters, &mut GenRng::from_seed(5));
        assert!(enemies.iter().all(|enemy| enemy.kind == EnemyKind::Spitter && enemy.hp == 2));

        let no_spitters =
            DifficultyProfile { enemy_mult: 1.0, spitter_chance: 0.0, target_mult: 1.0 };
        let enemies = place_enemies(&context, 8, &no_spitters, &mut GenRng::from_seed(5));
        assert!(enemies.iter().all(|enemy| enemy.kind == EnemyKind::Chaser && enemy.hp == 3));
    }

    #[test]
    fn crowded_map_under_delivers_instead_of_hanging() {
        let grid = open_grid(24, 24);
        let context = SpawnContext { grid: &grid, spawn: grid.center() };
        let profile = DifficultyProfile { enemy_mult: 50.0, spitter_chance: 0.0, target_mult: 1.0 };
        let enemies = place_enemies(&context, 8, &profile, &mut GenRng::from_seed(13));
        assert!(enemies.len() < 400);
    }

    #[test]
    fn absurd_enemy_multiplier_is_capped_by_floor_space() {
        let grid = open_grid(30, 30);
        let context = SpawnContext { grid: &grid, spawn: grid.center() };
        let profile = DifficultyProfile { enemy_mult: 1e18, spitter_chance: 0.3, target_mult: 1.0 };
        let enemies = place_enemies(&context, 8, &profile, &mut GenRng::from_seed(30));
        assert!(!enemies.is_empty());
        assert!(enemies.len() <= grid.floor_count());
    }

    #[test]
    fn tiny_grids_place_no_enemies() {
        let grid = open_grid(4, 4);
        let context = SpawnContext { grid: &grid, spawn: grid.center() };
        let profile = Difficulty::Hard.profile();
        assert!(place_enemies(&context, 8, &profile, &mut GenRng::from_seed(1)).is_empty());
    }

    #[test]
    fn relaxation_pushes_close_pairs_apart_once() {
        let mut enemies = vec![
            Enemy::new(WorldPos::new(100.0, 100.0), EnemyKind::Chaser),
            Enemy::new(WorldPos::new(110.0, 100.0), EnemyKind::Chaser),
        ];
        relax_spacing(&mut enemies);
        assert_eq!(enemies[0].pos, WorldPos::new(98.0, 100.0));
        assert_eq!(enemies[1].pos, WorldPos::new(112.0, 100.0));
    }

    #[test]
    fn relaxation_uses_fixed_axis_for_coincident_enemies() {
        let mut enemies = vec![
            Enemy::new(WorldPos::new(50.0, 50.0), EnemyKind::Chaser),
            Enemy::new(WorldPos::new(50.0, 50.0), EnemyKind::Spitter),
        ];
        relax_spacing(&mut enemies);
        assert_eq!(enemies[0].pos, WorldPos::new(52.0, 50.0));
        assert_eq!(enemies[1].pos, WorldPos::new(48.0, 50.0));
    }

    #[test]
    fn relaxation_ignores_pairs_already_far_apart() {
        let mut enemies = vec![
            Enemy::new(WorldPos::new(0.0, 0.0), EnemyKind::Chaser),
            Enemy::new(WorldPos::new(20.0, 0.0), EnemyKind::Chaser),
        ];
        relax_spacing(&mut enemies);
        assert_eq!(enemies[0].pos, WorldPos::new(0.0, 0.0));
        assert_eq!(enemies[1].pos, WorldPos::new(20.0, 0.0));
    }
}
