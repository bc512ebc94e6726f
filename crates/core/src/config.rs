//! Generation inputs: grid size, difficulty, treasure density, catalog and
//! carving tuning. Every field has a default so partial config files work.

use serde::{Deserialize, Serialize};

use crate::content::TreasureCatalog;
use crate::mapgen::DifficultyProfile;

pub const DEFAULT_WIDTH: usize = 96;
pub const DEFAULT_HEIGHT: usize = 64;
pub const DEFAULT_TREASURE_DENSITY: f64 = 0.03;
pub const DEFAULT_EXIT_SAMPLES: usize = 1200;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub width: usize,
    pub height: usize,
    pub difficulty: DifficultyProfile,
    /// Fraction of floor tiles to seed with treasure, in `(0, 1]`.
    pub treasure_density: f64,
    pub exit_samples: usize,
    pub carve: CarveParams,
    pub treasure_types: TreasureCatalog,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            difficulty: DifficultyProfile::default(),
            treasure_density: DEFAULT_TREASURE_DENSITY,
            exit_samples: DEFAULT_EXIT_SAMPLES,
            carve: CarveParams::default(),
            treasure_types: TreasureCatalog::default(),
        }
    }
}

impl GenerationConfig {
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Density clamped into `[0, 1]`; NaN counts as zero.
    pub fn effective_density(&self) -> f64 {
        if self.treasure_density.is_nan() { 0.0 } else { self.treasure_density.clamp(0.0, 1.0) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarveParams {
    pub rooms: usize,
    /// Smallest room edge in tiles.
    pub room_size: usize,
    /// Rooms grow up to `room_size + room_size_spread` tiles per edge.
    pub room_size_spread: usize,
    pub room_jitter_x: i32,
    pub room_jitter_y: i32,
    /// Random-walk length; `None` walks `width * height / 2` steps.
    pub walk_steps: Option<usize>,
}

impl Default for CarveParams {
    fn default() -> Self {
        Self {
            rooms: 7,
            room_size: 6,
            room_size_spread: 5,
            room_jitter_x: 12,
            room_jitter_y: 8,
            walk_steps: None,
        }
    }
}

impl CarveParams {
    pub fn steps_for(&self, width: usize, height: usize) -> usize {
        self.walk_steps.unwrap_or(width * height / 2)
    }
}
