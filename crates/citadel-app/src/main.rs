//! Citadel: generate a voxel structure and render one blueprint slice.
//!
//! Loads `config.ron`, applies CLI overrides, generates the requested variant,
//! renders the selected layer, logs its material tally, and optionally writes
//! the frame to a PNG.
//!
//! Run with: `cargo run -p citadel-app -- --variant tower --layer 60 --output tower.png`

mod platform;

use std::process::ExitCode;

use citadel_blueprint::{BlueprintViewer, ExportError, PixelCanvas, ViewCommand, save_png};
use citadel_config::{CliArgs, Config};
use citadel_structures::{StructureError, StructureVariant};
use clap::Parser;
use thiserror::Error;
use tracing::{error, info};

use crate::platform::AppDirs;

/// Failures that end the run with a non-zero exit code.
#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("unknown material: {0:?}")]
    UnknownMaterial(String),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let setup = AppDirs::resolve(args.config.as_deref()).and_then(|dirs| {
        dirs.create_dirs()?;
        let config = Config::load_or_create(&dirs.config_dir)?;
        Ok((dirs, config))
    });
    let (dirs, mut config, load_error) = match setup {
        Ok((dirs, config)) => (Some(dirs), config, None),
        Err(e) => (None, Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args);

    let log_dir = dirs.as_ref().map(|d| d.log_dir.as_path());
    citadel_log::init_logging(log_dir, cfg!(debug_assertions), Some(&config));

    if let Some(e) = load_error {
        error!(error = %e, "failed to load config");
        return ExitCode::FAILURE;
    }

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "citadel failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs, config: &Config) -> Result<(), AppError> {
    let variant: StructureVariant = args.variant.parse()?;
    let mut viewer = BlueprintViewer::new(config);

    let ticket = viewer.begin_generation(variant);
    info!(variant = %variant, "generating");
    viewer.complete_generation(ticket);

    if let Some(layer) = args.layer {
        viewer.apply(ViewCommand::SetLayer(layer));
    }
    if args.pan_x != 0.0 || args.pan_z != 0.0 {
        viewer.apply(ViewCommand::Pan {
            dx: args.pan_x,
            dy: args.pan_z,
        });
    }
    for name in &args.hidden {
        let material = viewer
            .palette()
            .lookup(name)
            .ok_or_else(|| AppError::UnknownMaterial(name.clone()))?;
        viewer.viewport_mut().hide(material);
    }

    let frame = viewer.render();
    info!(
        layer = frame.layer,
        total = frame.total,
        zoom = viewer.viewport().zoom(),
        labels = frame.labels_placed,
        dropped = frame.labels_dropped,
        "slice rendered"
    );
    for row in &frame.tally_rows {
        info!(
            material = row.identifier.as_str(),
            name = row.display_name.as_str(),
            color = %row.color,
            count = row.count,
            hidden = row.hidden,
            "tally"
        );
    }

    if let Some(path) = &args.output {
        let canvas_size = viewer.viewport().canvas();
        let mut canvas = PixelCanvas::new(canvas_size.width, canvas_size.height);
        canvas.execute(&frame.commands);
        save_png(&canvas, path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tower_config() -> Config {
        let mut config = Config::default();
        config.viewer.canvas_width = 200;
        config.viewer.canvas_height = 150;
        config.tower.total_height = 30;
        config.tower.antenna_height = 6;
        config.tower.merge_elevation = 25;
        config.tower.platform_bands = vec![citadel_config::PlatformBand::new(10, 11)];
        config
    }

    #[test]
    fn test_run_writes_png() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("slice.png");
        let args = CliArgs::parse_from([
            "citadel",
            "--variant",
            "tower",
            "--layer",
            "10",
            "--hide",
            "wall_outline",
            "--output",
            output.to_str().unwrap(),
        ]);
        run(&args, &small_tower_config()).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn test_unknown_variant_fails() {
        let args = CliArgs::parse_from(["citadel", "--variant", "castle"]);
        let err = run(&args, &small_tower_config()).unwrap_err();
        assert!(matches!(err, AppError::Structure(_)));
    }

    #[test]
    fn test_unknown_material_fails() {
        let args = CliArgs::parse_from(["citadel", "--variant", "tower", "--hide", "lava"]);
        let err = run(&args, &small_tower_config()).unwrap_err();
        assert!(matches!(err, AppError::UnknownMaterial(ref name) if name == "lava"));
    }
}
