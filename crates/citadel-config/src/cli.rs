//! Command-line argument parsing for the Citadel viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Citadel command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "citadel", about = "Procedural citadel blueprint viewer")]
pub struct CliArgs {
    /// Structure to generate (`fortress` or `tower`).
    #[arg(long, default_value = "fortress")]
    pub variant: String,

    /// Elevation layer to render.
    #[arg(long)]
    pub layer: Option<i32>,

    /// Zoom in pixels per voxel edge.
    #[arg(long)]
    pub zoom: Option<f64>,

    /// Horizontal pan in pixels, relative to the centred view.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub pan_x: f64,

    /// Vertical pan in pixels, relative to the centred view.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub pan_z: f64,

    /// Canvas width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Hide a material by identifier (repeatable).
    #[arg(long = "hide")]
    pub hidden: Vec<String>,

    /// Write the rendered slice to this PNG file.
    #[arg(long)]
    pub output: Option<PathBuf>,

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
        if let Some(w) = args.width {
            self.viewer.canvas_width = w;
        }
        if let Some(h) = args.height {
            self.viewer.canvas_height = h;
        }
        if let Some(zoom) = args.zoom {
            self.viewer.default_zoom = zoom;
        }
        if let Some(layer) = args.layer {
            self.viewer.initial_layer = layer;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
