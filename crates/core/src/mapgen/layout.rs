//! Grid carving: overlapping rooms, a random walk, cellular smoothing and a
//! guaranteed spawn room with the shop anchored beside it.

use crate::config::CarveParams;
use crate::types::{GenerationError, Pos, Tile, TileRect};

use super::grid::{TileGrid, clamp_interior};
use super::model::{SHOP_HEIGHT_TILES, SHOP_WIDTH_TILES};
use super::rng::GenRng;

const ROOM_BORDER_MARGIN: i32 = 2;
const SMOOTHING_PASSES: usize = 2;
/// A tile whose 3x3 neighborhood holds at most this many walls becomes floor.
const SMOOTHING_WALL_LIMIT: usize = 3;
const SPAWN_ROOM_HALF_WIDTH: i32 = 5;
const SPAWN_ROOM_HALF_HEIGHT: i32 = 4;
const SHOP_OFFSET_X: i32 = -3;
const SHOP_OFFSET_Y: i32 = -2;

const WALK_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct CarvedLayout {
    pub(super) grid: TileGrid,
    pub(super) spawn: Pos,
    pub(super) shop: TileRect,
}

pub(super) fn carve_level(
    width: usize,
    height: usize,
    params: &CarveParams,
    rng: &mut GenRng,
) -> Result<CarvedLayout, GenerationError> {
    let mut grid = TileGrid::filled(width, height, Tile::WallSolid)?;
    let center = grid.center();

    if grid.has_interior() {
        for _ in 0..params.rooms {
            let room = roll_room(&grid, center, params, rng);
            carve_rect(&mut grid, room);
        }
        random_walk(&mut grid, center, params.steps_for(width, height), rng);
        for _ in 0..SMOOTHING_PASSES {
            smooth(&mut grid);
        }
        carve_rect(
            &mut grid,
            TileRect::new(
                center.x - SPAWN_ROOM_HALF_WIDTH,
                center.y - SPAWN_ROOM_HALF_HEIGHT,
                SPAWN_ROOM_HALF_WIDTH * 2 + 1,
                SPAWN_ROOM_HALF_HEIGHT * 2 + 1,
            ),
        );
    }
    // Grids too thin for an interior still get a standable spawn tile.
    grid.set(center, Tile::Floor);

    let shop = TileRect::new(
        center.x + SHOP_OFFSET_X,
        center.y + SHOP_OFFSET_Y,
        SHOP_WIDTH_TILES,
        SHOP_HEIGHT_TILES,
    );

    tracing::debug!(
        width,
        height,
        floor_tiles = grid.floor_count(),
        spawn_x = center.x,
        spawn_y = center.y,
        "carved tile grid"
    );

    Ok(CarvedLayout { grid, spawn: center, shop })
}

fn roll_room(grid: &TileGrid, center: Pos, params: &CarveParams, rng: &mut GenRng) -> TileRect {
    let max_size = params.room_size + params.room_size_spread;
    let room_width = rng.range_usize(params.room_size, max_size) as i32;
    let room_height = rng.range_usize(params.room_size, max_size) as i32;
    let jitter_x = params.room_jitter_x.abs();
    let jitter_y = params.room_jitter_y.abs();
    let offset_x = rng.range_i32(-jitter_x, jitter_x);
    let offset_y = rng.range_i32(-jitter_y, jitter_y);

    let max_x = grid.width() as i32 - room_width - ROOM_BORDER_MARGIN;
    let max_y = grid.height() as i32 - room_height - ROOM_BORDER_MARGIN;
    let x = (center.x + offset_x).min(max_x).max(ROOM_BORDER_MARGIN);
    let y = (center.y + offset_y).min(max_y).max(ROOM_BORDER_MARGIN);
    TileRect::new(x, y, room_width, room_height)
}

/// Sets every tile of `rect` that lies inside the border band to floor.
fn carve_rect(grid: &mut TileGrid, rect: TileRect) {
    if rect.width <= 0 || rect.height <= 0 {
        return;
    }
    let left = clamp_interior(rect.x, grid.width());
    let right = clamp_interior(rect.right(), grid.width());
    let top = clamp_interior(rect.y, grid.height());
    let bottom = clamp_interior(rect.bottom(), grid.height());
    for y in top..=bottom {
        for x in left..=right {
            grid.set(Pos { y, x }, Tile::Floor);
        }
    }
}

fn random_walk(grid: &mut TileGrid, start: Pos, steps: usize, rng: &mut GenRng) {
    let mut pos = start;
    for _ in 0..steps {
        grid.set(pos, Tile::Floor);
        let (dx, dy) = WALK_DIRECTIONS[rng.range_usize(0, WALK_DIRECTIONS.len() - 1)];
        pos = Pos {
            y: clamp_interior(pos.y + dy, grid.height()),
            x: clamp_interior(pos.x + dx, grid.width()),
        };
        grid.set(pos, Tile::Floor);
    }
}

/// One in-place erosion pass over the interior; earlier rewrites are visible
/// to later neighborhoods within the same pass.
fn smooth(grid: &mut TileGrid) {
    for y in 1..(grid.height() as i32 - 1) {
        for x in 1..(grid.width() as i32 - 1) {
            let pos = Pos { y, x };
            if wall_neighbors(grid, pos) <= SMOOTHING_WALL_LIMIT {
                grid.set(pos, Tile::Floor);
            }
        }
    }
}

/// Walls in the 3x3 block centered on `pos`, the tile itself included.
fn wall_neighbors(grid: &TileGrid, pos: Pos) -> usize {
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if grid.tile_at(Pos { y: pos.y + dy, x: pos.x + dx }).is_wall() {
                count += 1;
            }
        }
    }
    count
}
