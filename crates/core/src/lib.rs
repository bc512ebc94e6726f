pub mod config;
pub mod content;
pub mod map_file;
pub mod mapgen;
pub mod types;

pub use config::{CarveParams, GenerationConfig};
pub use content::{TreasureCatalog, TreasureType};
pub use map_file::{MapFileError, MapRecord, list_map_files, load_map_file, save_map_file};
pub use mapgen::{
    Difficulty, DifficultyProfile, Enemy, EnemyKind, FloorGenerator, FloorState, GenRng,
    TileGrid, Treasure, generate_floor,
};
pub use types::*;
