mod config;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use delve_core::mapgen::derive_floor_seed;
use delve_core::{
    Difficulty, FloorGenerator, FloorState, GenRng, GenerationConfig, MapRecord, generate_floor,
    list_map_files, load_map_file, save_map_file,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Overrides;
use crate::render::render_ascii;

#[derive(Parser)]
#[command(author, version, about = "Generate, inspect and list dungeon floors", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a floor from a seed and optionally save it as a map file
    Generate {
        #[command(flatten)]
        generation: GenerationArgs,
        /// Run seed
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Level index within the run
        #[arg(short, long, default_value_t = 0)]
        level: u32,
        /// Floors to try before giving up on finding an exit
        #[arg(long, default_value_t = 5)]
        attempts: usize,
        /// Write the floor to this JSON map file
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Print the floor as text
        #[arg(long)]
        render: bool,
    },
    /// Load a map file and summarize it
    Inspect {
        /// Map file to load
        path: PathBuf,
        #[command(flatten)]
        generation: GenerationArgs,
        /// Seed of the fallback floor that fills missing fields
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
        /// Print the floor as text
        #[arg(long)]
        render: bool,
    },
    /// List map files in a directory
    List {
        #[arg(default_value = "maps")]
        dir: PathBuf,
    },
}

#[derive(clap::Args)]
struct GenerationArgs {
    /// TOML generation config
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,
    /// Fraction of floor tiles seeded with treasure
    #[arg(long)]
    density: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

impl GenerationArgs {
    fn resolve(&self) -> Result<GenerationConfig> {
        let overrides = Overrides {
            width: self.width,
            height: self.height,
            difficulty: self.difficulty.map(Difficulty::from),
            density: self.density,
        };
        config::resolve(self.config.as_deref(), &overrides)
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    match args.command {
        Command::Generate { generation, seed, level, attempts, out, render } => {
            let config = generation.resolve()?;
            let floor = generate(config.clone(), seed, level, attempts)?;
            print_summary(&floor, &config);
            if render {
                print!("{}", render_ascii(&floor));
            }
            if let Some(path) = out {
                save_map_file(&path, &MapRecord::from_floor(&floor))
                    .with_context(|| format!("failed to save map to {}", path.display()))?;
                println!("Saved: {}", path.display());
            }
        }
        Command::Inspect { path, generation, seed, render } => {
            let config = generation.resolve()?;
            let floor = inspect(&path, &config, seed)?;
            print_summary(&floor, &config);
            if render {
                print!("{}", render_ascii(&floor));
            }
        }
        Command::List { dir } => {
            let names = list_map_files(&dir)
                .with_context(|| format!("failed to list maps in {}", dir.display()))?;
            if names.is_empty() {
                println!("No maps in {}", dir.display());
            }
            for name in names {
                println!("{name}");
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("delve=info,delve_core=info"));

    tracing_subscriber::registry().with(env_filter).with(fmt::layer().with_target(true)).init();
}

fn generate(
    config: GenerationConfig,
    seed: u64,
    level: u32,
    attempts: usize,
) -> Result<FloorState> {
    if attempts == 0 {
        bail!("--attempts must be at least 1");
    }
    let floor_seed = derive_floor_seed(seed, level);
    tracing::info!(seed, level, floor_seed, "generating floor");

    let mut rng = GenRng::from_seed(floor_seed);
    FloorGenerator::new(config)
        .generate_with_exit(&mut rng, attempts)
        .with_context(|| format!("generation failed for seed {seed} level {level}"))
}

fn inspect(path: &Path, config: &GenerationConfig, seed: u64) -> Result<FloorState> {
    let fallback = generate_floor(seed, 0, config).context("failed to build fallback floor")?;
    let record = load_map_file(path)
        .with_context(|| format!("failed to load map file {}", path.display()))?;
    record
        .into_floor(&fallback)
        .with_context(|| format!("map file {} is not a usable level", path.display()))
}

fn print_summary(floor: &FloorState, config: &GenerationConfig) {
    println!("Size: {}x{}", floor.width(), floor.height());
    println!("Floor tiles: {}", floor.grid.floor_count());
    println!("Spawn: ({}, {})", floor.spawn.x, floor.spawn.y);
    match floor.exit {
        Some(exit) => println!("Exit: ({}, {})", exit.x, exit.y),
        None => println!("Exit: none"),
    }
    println!("Treasures: {}", floor.treasures.len());
    println!(
        "Gold: {} / target {}",
        floor.total_treasure_value(&config.treasure_types),
        floor.target_gold
    );
    println!("Enemies: {}", floor.enemies.len());
    println!("Fingerprint: {:016x}", floor.fingerprint());
}
