use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use delve_core::{Difficulty, GenerationConfig};
use serde::Deserialize;

/// TOML schema for a generation config file.
///
/// ```toml
/// difficulty = "hard"
///
/// [generation]
/// width = 80
/// height = 48
/// treasure_density = 0.05
/// ```
///
/// A `difficulty` preset replaces any `[generation.difficulty]` table.
#[derive(Deserialize, Default, Debug)]
#[serde(default)]
pub struct ConfigFile {
    pub difficulty: Option<Difficulty>,
    pub generation: GenerationConfig,
}

impl ConfigFile {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse generation config TOML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn into_generation_config(self) -> GenerationConfig {
        let mut config = self.generation;
        if let Some(preset) = self.difficulty {
            config.difficulty = preset.profile();
        }
        config
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Default, Debug)]
pub struct Overrides {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub difficulty: Option<Difficulty>,
    pub density: Option<f64>,
}

impl Overrides {
    pub fn apply(&self, config: &mut GenerationConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty.profile();
        }
        if let Some(density) = self.density {
            config.treasure_density = density;
        }
    }
}

pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<GenerationConfig> {
    let file = match path {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let mut config = file.into_generation_config();
    overrides.apply(&mut config);
    Ok(config)
}
