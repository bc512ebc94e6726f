//! Public data models for a generated floor and the entities placed on it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::content::TreasureCatalog;
use crate::types::{Pos, TileRect, WorldPos};

use super::grid::TileGrid;

pub const SHOP_WIDTH_TILES: i32 = 6;
pub const SHOP_HEIGHT_TILES: i32 = 4;
pub const EXIT_SIZE_TILES: i32 = 2;

/// Tile coordinate to remaining hit points.
pub type BreakableWalls = BTreeMap<Pos, u32>;

#[derive(Clone, Debug, PartialEq)]
pub struct Treasure {
    /// Tile center in world space.
    pub pos: WorldPos,
    /// Index into the treasure catalog.
    pub kind: usize,
}

impl Treasure {
    pub fn at_tile(tile: Pos, kind: usize) -> Self {
        Self { pos: tile.center(), kind }
    }

    pub fn tile(&self) -> Pos {
        self.pos.tile()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    #[default]
    Chaser,
    Spitter,
}

impl EnemyKind {
    pub fn base_hp(self) -> u32 {
        match self {
            EnemyKind::Chaser => 3,
            EnemyKind::Spitter => 2,
        }
    }
}

/// Behavior tag owned by gameplay systems; generation only sets the default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnemyState {
    #[default]
    Wander,
    Chase,
    Attack,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub pos: WorldPos,
    pub hp: u32,
    pub kind: EnemyKind,
    pub state: EnemyState,
    /// Animation/behavior phase offset.
    pub phase: f32,
    pub attack_cooldown: f32,
}

impl Enemy {
    pub fn new(pos: WorldPos, kind: EnemyKind) -> Self {
        Self {
            pos,
            hp: kind.base_hp(),
            kind,
            state: EnemyState::default(),
            phase: 0.0,
            attack_cooldown: 0.0,
        }
    }

    pub fn tile(&self) -> Pos {
        self.pos.tile()
    }
}

/// Everything a level needs: grid, anchors, entities and the gold goal.
/// Built whole by the generator or the map loader and replaced wholesale.
#[derive(Clone, Debug, PartialEq)]
pub struct FloorState {
    pub grid: TileGrid,
    pub spawn: Pos,
    pub shop: TileRect,
    pub treasures: Vec<Treasure>,
    pub enemies: Vec<Enemy>,
    pub exit: Option<TileRect>,
    pub target_gold: u32,
    pub breakable_walls: BreakableWalls,
}

impl FloorState {
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// A floor without an exit cannot be won; callers regenerate or report it.
    pub fn is_winnable(&self) -> bool {
        self.exit.is_some()
    }

    pub fn total_treasure_value(&self, catalog: &TreasureCatalog) -> u64 {
        self.treasures.iter().map(|treasure| u64::from(catalog.value_of(treasure.kind))).sum()
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.width() as u32).to_le_bytes());
        bytes.extend((self.height() as u32).to_le_bytes());
        for row in self.grid.rows() {
            bytes.extend(row.iter().map(|tile| tile.code()));
        }
        bytes.extend(self.spawn.y.to_le_bytes());
        bytes.extend(self.spawn.x.to_le_bytes());
        push_rect(&mut bytes, self.shop);
        match self.exit {
            Some(exit) => {
                bytes.push(1);
                push_rect(&mut bytes, exit);
            }
            None => bytes.push(0),
        }
        bytes.extend(self.target_gold.to_le_bytes());

        bytes.extend((self.treasures.len() as u32).to_le_bytes());
        for treasure in &self.treasures {
            bytes.extend((treasure.kind as u32).to_le_bytes());
            bytes.extend(treasure.pos.x.to_bits().to_le_bytes());
            bytes.extend(treasure.pos.y.to_bits().to_le_bytes());
        }

        bytes.extend((self.enemies.len() as u32).to_le_bytes());
        for enemy in &self.enemies {
            bytes.push(match enemy.kind {
                EnemyKind::Chaser => 0,
                EnemyKind::Spitter => 1,
            });
            bytes.extend(enemy.hp.to_le_bytes());
            bytes.extend(enemy.pos.x.to_bits().to_le_bytes());
            bytes.extend(enemy.pos.y.to_bits().to_le_bytes());
        }

        bytes.extend((self.breakable_walls.len() as u32).to_le_bytes());
        for (pos, hp) in &self.breakable_walls {
            bytes.extend(pos.y.to_le_bytes());
            bytes.extend(pos.x.to_le_bytes());
            bytes.extend(hp.to_le_bytes());
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

fn push_rect(bytes: &mut Vec<u8>, rect: TileRect) {
    bytes.extend(rect.x.to_le_bytes());
    bytes.extend(rect.y.to_le_bytes());
    bytes.extend(rect.width.to_le_bytes());
    bytes.extend(rect.height.to_le_bytes());
}
