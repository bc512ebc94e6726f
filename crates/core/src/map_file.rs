//! JSON map files: the record shape shared by generated and hand-edited levels.
//!
//! A record stores tile coordinates only. Loading rebuilds world positions at
//! tile centers, and every field is optional: anything missing or ill-typed
//! falls back to the matching field of a caller-supplied floor instead of
//! failing the whole file. Only non-positive (or absurdly large) dimensions
//! are rejected.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::mapgen::{
    EXIT_SIZE_TILES, Enemy, EnemyKind, FloorState, SHOP_HEIGHT_TILES, SHOP_WIDTH_TILES, TileGrid,
    Treasure,
};
use crate::types::{Pos, Tile, TileRect};

/// Largest edge length accepted from a file.
pub const MAX_MAP_DIMENSION: i64 = 4096;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MapRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub map_w: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub map_h: Option<i64>,
    /// Rows of tile codes, top to bottom.
    #[serde(default, deserialize_with = "lenient_rows")]
    pub tiles: Option<Vec<Vec<u8>>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub treasures: Option<Vec<TreasureEntry>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub enemies: Option<Vec<EnemyEntry>>,
    #[serde(default, deserialize_with = "lenient")]
    pub exit: Option<RectEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub shop: Option<RectEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub spawn: Option<SpawnEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub target_gold: Option<u32>,
    /// Keys are `"(x, y)"` tile coordinates.
    #[serde(default, deserialize_with = "lenient_walls")]
    pub breakable_walls: Option<BTreeMap<String, u32>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TreasureEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub tx: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub ty: Option<i32>,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EnemyEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub tx: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub ty: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub kind: Option<EnemyKind>,
    #[serde(default, deserialize_with = "lenient")]
    pub hp: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RectEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub tx: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub ty: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub w: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub h: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub tx: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub ty: Option<i32>,
}

/// Treats any value that does not fit `T` (including `null`) as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Keeps the grid when single cells are bad: a cell that is not a `u8` code
/// reads as solid wall and a row that is not an array reads as empty.
fn lenient_rows<'de, D>(deserializer: D) -> Result<Option<Vec<Vec<u8>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(rows) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let solid = Tile::WallSolid.code();
    let rows = rows
        .into_iter()
        .map(|row| match row {
            Value::Array(cells) => cells
                .iter()
                .map(|cell| {
                    cell.as_u64().and_then(|code| u8::try_from(code).ok()).unwrap_or(solid)
                })
                .collect(),
            _ => Vec::new(),
        })
        .collect();
    Ok(Some(rows))
}

/// Drops list entries that do not fit `T` instead of the whole list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(items.into_iter().filter_map(|item| serde_json::from_value(item).ok()).collect()))
}

/// Drops walls whose hit points are not a `u32`.
fn lenient_walls<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(walls) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let walls = walls
        .into_iter()
        .filter_map(|(key, hp)| Some((key, serde_json::from_value(hp).ok()?)))
        .collect();
    Ok(Some(walls))
}

impl RectEntry {
    fn from_rect(rect: TileRect) -> Self {
        Self { tx: Some(rect.x), ty: Some(rect.y), w: Some(rect.width), h: Some(rect.height) }
    }

    fn to_rect(&self, default_width: i32, default_height: i32) -> Option<TileRect> {
        let (x, y) = (self.tx?, self.ty?);
        Some(TileRect::new(
            x,
            y,
            self.w.unwrap_or(default_width),
            self.h.unwrap_or(default_height),
        ))
    }
}

impl MapRecord {
    pub fn from_floor(floor: &FloorState) -> Self {
        let tiles = floor
            .grid
            .rows()
            .map(|row| row.iter().map(|tile| tile.code()).collect())
            .collect();

        let treasures = floor
            .treasures
            .iter()
            .map(|treasure| {
                let tile = treasure.tile();
                TreasureEntry { tx: Some(tile.x), ty: Some(tile.y), kind: Some(treasure.kind) }
            })
            .collect();

        let enemies = floor
            .enemies
            .iter()
            .map(|enemy| {
                let tile = enemy.tile();
                EnemyEntry {
                    tx: Some(tile.x),
                    ty: Some(tile.y),
                    kind: Some(enemy.kind),
                    hp: Some(enemy.hp),
                }
            })
            .collect();

        let breakable_walls = floor
            .breakable_walls
            .iter()
            .map(|(pos, hp)| (format_wall_key(*pos), *hp))
            .collect();

        Self {
            map_w: Some(floor.width() as i64),
            map_h: Some(floor.height() as i64),
            tiles: Some(tiles),
            treasures: Some(treasures),
            enemies: Some(enemies),
            exit: floor.exit.map(RectEntry::from_rect),
            shop: Some(RectEntry::from_rect(floor.shop)),
            spawn: Some(SpawnEntry { tx: Some(floor.spawn.x), ty: Some(floor.spawn.y) }),
            target_gold: Some(floor.target_gold),
            breakable_walls: Some(breakable_walls),
        }
    }

    /// Rebuilds a floor, taking each absent field from `fallback`.
    ///
    /// Entries without both coordinates are dropped. The spawn tile is forced
    /// to floor so a loaded level always has somewhere to stand.
    pub fn into_floor(self, fallback: &FloorState) -> Result<FloorState, MapFileError> {
        let rows = self.tiles.as_deref();
        let width = self
            .map_w
            .or_else(|| {
                rows.and_then(|rows| rows.iter().map(Vec::len).max()).map(|len| len as i64)
            })
            .unwrap_or(fallback.width() as i64);
        let height = self
            .map_h
            .or_else(|| rows.map(|rows| rows.len() as i64))
            .unwrap_or(fallback.height() as i64);
        if width <= 0 || height <= 0 || width > MAX_MAP_DIMENSION || height > MAX_MAP_DIMENSION {
            return Err(MapFileError::InvalidDimensions { width, height });
        }
        let (width, height) = (width as usize, height as usize);

        let mut grid = match rows {
            Some(rows) => grid_from_rows(rows, width, height)?,
            None if fallback.width() == width && fallback.height() == height => {
                fallback.grid.clone()
            }
            None => blank_grid(width, height)?,
        };

        let spawn = self
            .spawn
            .and_then(|entry| Some(Pos { y: entry.ty?, x: entry.tx? }))
            .unwrap_or(fallback.spawn);
        grid.set(spawn, Tile::Floor);

        let treasures = match self.treasures {
            Some(entries) => entries
                .into_iter()
                .filter_map(|entry| {
                    let tile = Pos { y: entry.ty?, x: entry.tx? };
                    Some(Treasure::at_tile(tile, entry.kind.unwrap_or(0)))
                })
                .collect(),
            None => fallback.treasures.clone(),
        };

        let enemies = match self.enemies {
            Some(entries) => entries
                .into_iter()
                .filter_map(|entry| {
                    let tile = Pos { y: entry.ty?, x: entry.tx? };
                    let mut enemy = Enemy::new(tile.center(), entry.kind.unwrap_or_default());
                    enemy.hp = entry.hp.unwrap_or(EnemyKind::Chaser.base_hp());
                    Some(enemy)
                })
                .collect(),
            None => fallback.enemies.clone(),
        };

        let shop = self
            .shop
            .and_then(|entry| entry.to_rect(SHOP_WIDTH_TILES, SHOP_HEIGHT_TILES))
            .unwrap_or(fallback.shop);
        let exit = self.exit.and_then(|entry| entry.to_rect(EXIT_SIZE_TILES, EXIT_SIZE_TILES));

        let breakable_walls = match self.breakable_walls {
            Some(walls) => walls
                .into_iter()
                .filter_map(|(key, hp)| Some((parse_wall_key(&key)?, hp)))
                .collect(),
            None => fallback.breakable_walls.clone(),
        };

        Ok(FloorState {
            grid,
            spawn,
            shop,
            treasures,
            enemies,
            exit,
            target_gold: self.target_gold.unwrap_or(fallback.target_gold),
            breakable_walls,
        })
    }
}

fn blank_grid(width: usize, height: usize) -> Result<TileGrid, MapFileError> {
    TileGrid::filled(width, height, Tile::WallSolid).map_err(|_| {
        MapFileError::InvalidDimensions { width: width as i64, height: height as i64 }
    })
}

/// Missing cells in short rows and rows past the end read as solid wall.
fn grid_from_rows(rows: &[Vec<u8>], width: usize, height: usize) -> Result<TileGrid, MapFileError> {
    let mut grid = blank_grid(width, height)?;
    for (y, row) in rows.iter().take(height).enumerate() {
        for (x, &code) in row.iter().take(width).enumerate() {
            grid.set(Pos { y: y as i32, x: x as i32 }, Tile::from_code(code));
        }
    }
    Ok(grid)
}

fn format_wall_key(pos: Pos) -> String {
    format!("({}, {})", pos.x, pos.y)
}

/// Accepts `"(x, y)"` as well as bare `"x,y"`.
fn parse_wall_key(key: &str) -> Option<Pos> {
    let trimmed = key.trim().trim_start_matches('(').trim_end_matches(')');
    let (x, y) = trimmed.split_once(',')?;
    Some(Pos { y: y.trim().parse().ok()?, x: x.trim().parse().ok()? })
}

/// Describes why a map file could not be read or written.
#[derive(Debug)]
pub enum MapFileError {
    /// Underlying I/O failure.
    Io(io::Error),
    /// The file is not a JSON object.
    Parse(String),
    /// The record's dimensions are non-positive or beyond [`MAX_MAP_DIMENSION`].
    InvalidDimensions { width: i64, height: i64 },
}

impl fmt::Display for MapFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "map file I/O error: {e}"),
            Self::Parse(message) => write!(f, "map file is not valid JSON: {message}"),
            Self::InvalidDimensions { width, height } => {
                write!(f, "map dimensions {width}x{height} are out of range")
            }
        }
    }
}

impl Error for MapFileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MapFileError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

/// Writes `record` as pretty JSON through a temporary file and a rename,
/// creating parent directories as needed.
pub fn save_map_file(path: &Path, record: &MapRecord) -> Result<(), MapFileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(record).map_err(io::Error::other)?;

    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;

    Ok(())
}

pub fn load_map_file(path: &Path) -> Result<MapRecord, MapFileError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| MapFileError::Parse(e.to_string()))
}

pub fn save_floor(path: &Path, floor: &FloorState) -> Result<(), MapFileError> {
    save_map_file(path, &MapRecord::from_floor(floor))
}

pub fn load_floor(path: &Path, fallback: &FloorState) -> Result<FloorState, MapFileError> {
    load_map_file(path)?.into_floor(fallback)
}

/// Names of `*.json` files in `dir`, sorted. A missing directory lists nothing.
pub fn list_map_files(dir: &Path) -> Result<Vec<String>, MapFileError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.to_ascii_lowercase().ends_with(".json") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
