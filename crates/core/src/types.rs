use std::error::Error;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// World units per tile edge.
pub const TILE_SIZE: f32 = 32.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// World-space center of this tile.
    pub fn center(self) -> WorldPos {
        WorldPos {
            x: self.x as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            y: self.y as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn distance_squared(self, other: WorldPos) -> f32 {
        (self - other).length_squared()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn normalized(self) -> Option<Self> {
        let length = self.length();
        if length == 0.0 || !length.is_finite() {
            return None;
        }
        Some(Self { x: self.x / length, y: self.y / length })
    }

    /// Tile containing this point, using floor division so negative
    /// coordinates land in negative tiles.
    pub fn tile(self) -> Pos {
        Pos { y: (self.y / TILE_SIZE).floor() as i32, x: (self.x / TILE_SIZE).floor() as i32 }
    }
}

impl Add for WorldPos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for WorldPos {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Mul<f32> for WorldPos {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl AddAssign for WorldPos {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for WorldPos {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tile {
    Floor,
    #[default]
    WallSolid,
    WallBreakable,
}

impl Tile {
    pub fn is_wall(self) -> bool {
        matches!(self, Tile::WallSolid | Tile::WallBreakable)
    }

    pub fn code(self) -> u8 {
        match self {
            Tile::Floor => 0,
            Tile::WallSolid => 1,
            Tile::WallBreakable => 2,
        }
    }

    /// Unknown codes read as solid wall.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Tile::Floor,
            2 => Tile::WallBreakable,
            _ => Tile::WallSolid,
        }
    }
}

/// Axis-aligned rectangle in tile units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl TileRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(self) -> Pos {
        Pos { y: self.y, x: self.x }
    }

    pub fn right(self) -> i32 {
        self.x + self.width - 1
    }

    pub fn bottom(self) -> i32 {
        self.y + self.height - 1
    }

    pub fn contains(self, pos: Pos) -> bool {
        pos.x >= self.x && pos.x <= self.right() && pos.y >= self.y && pos.y <= self.bottom()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationError {
    /// Grid dimensions must both be positive.
    InvalidDimensions { width: i64, height: i64 },
    /// No floor produced an exit within the regeneration budget.
    NoExit { attempts: usize },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {width}x{height}: both must be positive")
            }
            Self::NoExit { attempts } => {
                write!(f, "no floor with a reachable exit after {attempts} attempts")
            }
        }
    }
}

impl Error for GenerationError {}
