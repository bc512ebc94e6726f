//! Exit placement by streaming-max over randomly sampled floor tiles.

use crate::types::{Pos, TileRect};

use super::grid::TileGrid;
use super::model::EXIT_SIZE_TILES;
use super::rng::GenRng;

/// Samples up to `samples` interior tiles and anchors a 2x2 exit on the floor
/// tile farthest (Manhattan) from spawn. Returns `None` when no sample hits floor.
pub(super) fn place_exit(
    grid: &TileGrid,
    spawn: Pos,
    samples: usize,
    rng: &mut GenRng,
) -> Option<TileRect> {
    if !grid.has_interior() {
        tracing::warn!("grid has no interior; exit left unset");
        return None;
    }
    let max_x = grid.width() as i32 - 2;
    let max_y = grid.height() as i32 - 2;

    let mut best: Option<(Pos, u32)> = None;
    for _ in 0..samples {
        let tile = Pos { y: rng.range_i32(1, max_y), x: rng.range_i32(1, max_x) };
        if !grid.is_floor(tile) {
            continue;
        }
        let distance = tile.manhattan(spawn);
        if best.is_none_or(|(_, best_distance)| distance > best_distance) {
            best = Some((tile, distance));
        }
    }

    match best {
        Some((tile, distance)) => {
            tracing::debug!(x = tile.x, y = tile.y, distance, "placed exit");
            Some(TileRect::new(tile.x, tile.y, EXIT_SIZE_TILES, EXIT_SIZE_TILES))
        }
        None => {
            tracing::warn!(samples, "no floor tile sampled; exit left unset");
            None
        }
    }
}
