//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Command-line arguments. Values given here override `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "sylvan", about = "Procedural tree placement demo")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Paint disc outlines and outcome markers.
    #[arg(long)]
    pub debug_worldgen: bool,

    /// Generate regions within this distance of the origin.
    #[arg(long)]
    pub region_radius: Option<i32>,

    /// Worker thread count (0 = automatic).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.worldgen.seed = seed;
        }
        if args.debug_worldgen {
            self.worldgen.debug = true;
        }
        if let Some(radius) = args.region_radius {
            self.demo.region_radius = radius;
        }
        if let Some(threads) = args.threads {
            self.demo.worker_threads = threads;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
