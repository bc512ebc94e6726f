//! Treasure placement: density-driven scattering followed by a greedy
//! backfill that tops the level up to its gold target.

use std::collections::BTreeSet;

use crate::content::TreasureCatalog;
use crate::types::Pos;

use super::grid::TileGrid;
use super::model::Treasure;
use super::rng::GenRng;

/// Scattered treasure never lands within this Manhattan distance of spawn.
pub(super) const SCATTER_SPAWN_CLEARANCE: u32 = 6;
/// Backfilled treasure never lands within this Manhattan distance of spawn.
pub(super) const BACKFILL_SPAWN_CLEARANCE: u32 = 4;

pub(super) struct LootContext<'a> {
    pub(super) grid: &'a TileGrid,
    pub(super) spawn: Pos,
    pub(super) catalog: &'a TreasureCatalog,
}

/// Places `floor(density * floor_tiles)` treasures on shuffled floor tiles.
///
/// Tiles near spawn are skipped while the quota is consumed, so the result
/// can fall short of the quota; that shortfall is not re-sampled.
pub(super) fn scatter_treasures(
    context: &LootContext<'_>,
    density: f64,
    rng: &mut GenRng,
) -> Vec<Treasure> {
    let mut floor_tiles = context.grid.floor_tiles();
    rng.shuffle(&mut floor_tiles);
    let quota = (floor_tiles.len() as f64 * density).floor() as usize;
    let weights = context.catalog.weights();

    let mut treasures = Vec::with_capacity(quota);
    for tile in floor_tiles {
        if treasures.len() >= quota {
            break;
        }
        if tile.manhattan(context.spawn) <= SCATTER_SPAWN_CLEARANCE {
            continue;
        }
        let Some(kind) = rng.weighted_index(&weights) else {
            break;
        };
        treasures.push(Treasure::at_tile(tile, kind));
    }

    if treasures.len() < quota {
        tracing::debug!(quota, placed = treasures.len(), "treasure quota undershot near spawn");
    }
    tracing::debug!(placed = treasures.len(), quota, "scattered treasures");
    treasures
}

/// Appends copies of the most valuable catalog type on unused floor tiles
/// until the total value reaches `target_gold` or tiles run out.
///
/// Only the top-value type is used for backfill, regardless of the weights
/// that shaped the scattered set.
pub(super) fn enforce_gold_target(
    context: &LootContext<'_>,
    treasures: &mut Vec<Treasure>,
    target_gold: u32,
    rng: &mut GenRng,
) {
    let catalog = context.catalog;
    let target = u64::from(target_gold);
    let mut current: u64 =
        treasures.iter().map(|treasure| u64::from(catalog.value_of(treasure.kind))).sum();
    if current >= target {
        return;
    }

    let Some(top_kind) = catalog.most_valuable() else {
        tracing::warn!(current, target, "empty treasure catalog; gold target unreachable");
        return;
    };
    let top_value = u64::from(catalog.value_of(top_kind));
    if top_value == 0 {
        tracing::warn!(current, target, "catalog has no valuable type; gold target unreachable");
        return;
    }

    let used: BTreeSet<Pos> = treasures.iter().map(Treasure::tile).collect();
    let mut candidates: Vec<Pos> = context
        .grid
        .floor_tiles()
        .into_iter()
        .filter(|tile| {
            !used.contains(tile) && tile.manhattan(context.spawn) > BACKFILL_SPAWN_CLEARANCE
        })
        .collect();
    rng.shuffle(&mut candidates);

    let before = treasures.len();
    for tile in candidates {
        treasures.push(Treasure::at_tile(tile, top_kind));
        current += top_value;
        if current >= target {
            break;
        }
    }

    if current < target {
        tracing::warn!(current, target, "ran out of floor tiles before reaching gold target");
    }
    tracing::debug!(added = treasures.len() - before, total_value = current, "backfilled treasure");
}
