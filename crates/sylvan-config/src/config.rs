//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub worldgen: WorldGenConfig,
    /// Candidate disc packing.
    pub density: DensityConfig,
    pub demo: DemoConfig,
    pub debug: DebugConfig,
}

/// World generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldGenConfig {
    /// World seed. Every generated block is a function of this value.
    pub seed: u64,
    /// Paint disc outlines and outcome markers into the world.
    pub debug: bool,
    /// Base terrain height the heightmap varies around.
    pub sea_level: i32,
}

/// Disc sampling settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DensityConfig {
    pub min_radius: i32,
    pub max_radius: i32,
    /// Extra blocks kept free between neighbouring discs.
    pub gap: i32,
    /// Probability in `[0, 1]` that a grid cell holds a disc.
    pub occupancy: f64,
    /// Region side length in blocks.
    pub region_size: i32,
}

/// Settings for the demo binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Regions within this Chebyshev distance of the origin are generated.
    pub region_radius: i32,
    /// Worker threads; 0 picks a count from the number of CPUs.
    pub worker_threads: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g., "debug", "info,sylvan_worldgen=trace").
    pub log_level: String,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            debug: false,
            sea_level: 64,
        }
    }
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            min_radius: 2,
            max_radius: 8,
            gap: 0,
            occupancy: 1.0,
            region_size: 16,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            region_radius: 2,
            worker_threads: 0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for the demo, e.g. `~/.config/sylvan` on Linux.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sylvan")
}

// --- Load / Save / Reload ---

impl Config {
    /// Load `config.ron` from `config_dir`, writing a default one if absent.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }

    /// Re-read the file; `Some` only if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}
