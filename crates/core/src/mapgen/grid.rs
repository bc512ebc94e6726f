//! Tile grid storage plus tile- and world-space queries over it.

use crate::types::{GenerationError, Pos, Tile, WorldPos};

/// Probe radius used by [`TileGrid::slide_move`] when callers have no better value.
pub const DEFAULT_BODY_RADIUS: f32 = 10.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn filled(width: usize, height: usize, tile: Tile) -> Result<Self, GenerationError> {
        if width == 0 || height == 0 {
            return Err(GenerationError::InvalidDimensions {
                width: width as i64,
                height: height as i64,
            });
        }
        Ok(Self { width, height, tiles: vec![tile; width * height] })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Out-of-bounds reads as solid wall.
    pub fn tile_at(&self, pos: Pos) -> Tile {
        if !self.in_bounds(pos) {
            return Tile::WallSolid;
        }
        self.tiles[self.index(pos)]
    }

    pub fn is_floor(&self, pos: Pos) -> bool {
        self.tile_at(pos) == Tile::Floor
    }

    /// Writes are ignored outside the grid.
    pub fn set(&mut self, pos: Pos, tile: Tile) {
        if self.in_bounds(pos) {
            let index = self.index(pos);
            self.tiles[index] = tile;
        }
    }

    /// True when the grid has at least one non-border tile.
    pub fn has_interior(&self) -> bool {
        self.width >= 3 && self.height >= 3
    }

    pub fn center(&self) -> Pos {
        Pos { y: (self.height / 2) as i32, x: (self.width / 2) as i32 }
    }

    /// Every floor tile in row-major order.
    pub fn floor_tiles(&self) -> Vec<Pos> {
        self.positions().filter(|&pos| self.is_floor(pos)).collect()
    }

    pub fn floor_count(&self) -> usize {
        self.tiles.iter().filter(|&&tile| tile == Tile::Floor).count()
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Pos { y: y as i32, x: x as i32 })
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width)
    }

    pub fn is_wall_at_world(&self, point: WorldPos) -> bool {
        self.tile_at(point.tile()).is_wall()
    }

    /// Moves a round body by `delta`, resolving each axis separately so the
    /// body slides along walls instead of stopping dead.
    pub fn slide_move(&self, from: WorldPos, delta: WorldPos, radius: f32) -> WorldPos {
        let mut moved = WorldPos { x: from.x + delta.x, y: from.y };
        if self.body_touches_wall(moved, radius) {
            moved.x = from.x;
        }
        moved.y = from.y + delta.y;
        if self.body_touches_wall(moved, radius) {
            moved.y = from.y;
        }
        moved
    }

    fn body_touches_wall(&self, center: WorldPos, radius: f32) -> bool {
        [
            WorldPos::new(center.x - radius, center.y),
            WorldPos::new(center.x + radius, center.y),
            WorldPos::new(center.x, center.y - radius),
            WorldPos::new(center.x, center.y + radius),
        ]
        .into_iter()
        .any(|point| self.is_wall_at_world(point))
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

/// Clamps a tile coordinate into the non-border band `[1, dimension - 2]`.
pub(super) fn clamp_interior(value: i32, dimension: usize) -> i32 {
    let upper = (dimension as i32 - 2).max(1);
    value.clamp(1, upper)
}
