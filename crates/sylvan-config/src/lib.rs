//! Configuration for the tree generator and its demo.
//!
//! Settings persist to disk as `config.ron` and can be overridden from the
//! command line. Missing sections and fields fall back to their defaults, and
//! unknown fields are ignored.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, DemoConfig, DensityConfig, WorldGenConfig, default_config_dir};
pub use error::ConfigError;
