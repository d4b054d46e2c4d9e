//! Configuration system for the Citadel blueprint viewer.
//!
//! Holds the viewer, labeling and structure-generation parameters. Settings
//! persist to disk as RON, accept CLI overrides via clap, and tolerate missing
//! or unknown fields so old config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, FortressConfig, LabelConfig, PlatformBand, ProwConfig, TowerConfig,
    ViewerConfig, default_config_dir,
};
pub use error::ConfigError;
