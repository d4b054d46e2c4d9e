//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";
const APP_NAME: &str = "citadel";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Canvas, zoom and layer-navigation settings.
    pub viewer: ViewerConfig,
    /// Dimension-label settings.
    pub labels: LabelConfig,
    /// Tiered fortress generation parameters.
    pub fortress: FortressConfig,
    /// Lattice tower generation parameters.
    pub tower: TowerConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Blueprint viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Zoom used at startup and by "reset view" (pixels per voxel edge).
    pub default_zoom: f64,
    /// Lower zoom clamp.
    pub min_zoom: f64,
    /// Upper zoom clamp.
    pub max_zoom: f64,
    /// Multiplier applied by a single zoom-in / zoom-out step.
    pub zoom_step: f64,
    /// Layer selected before a world has been generated.
    pub initial_layer: i32,
    /// Extra layers selectable above the highest generated elevation.
    pub layer_margin: i32,
    /// Background grid spacing in world units.
    pub grid_spacing: i32,
}

/// Run-length dimension label configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LabelConfig {
    /// Labels are only produced when zoom is strictly above this value.
    pub legibility_zoom: f64,
    /// Below this zoom short runs (`< sparse_min_length`) are suppressed.
    pub dense_zoom: f64,
    /// Shortest run labelled at high zoom.
    pub min_length: u32,
    /// Shortest run labelled below `dense_zoom`.
    pub sparse_min_length: u32,
    /// Distance in pixels labels keep from the canvas edges.
    pub edge_margin: f64,
    /// World cells scanned beyond each canvas edge.
    pub scan_padding: i32,
    /// Label text height in pixels.
    pub font_px: f64,
    /// Runs longer than this also get a dimension line with arrowheads.
    pub dimension_line_min: u32,
}

/// Prow (keel) thresholds. Each generation pass has its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProwConfig {
    /// Half-width of the tapering floor wedge at `x = 0`.
    pub floor_start_width: f64,
    /// Distance along +X over which the floor wedge tapers.
    pub floor_extension: f64,
    /// Constant added to the tapered floor half-width.
    pub floor_pad: f64,
    /// Half-width of the gap cut into ring walls.
    pub wall_half_width: i32,
    /// Half-width of the solid keel inside each foundation.
    pub foundation_half_width: i32,
}

/// Tiered fortress generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FortressConfig {
    /// Elevation of the outermost ring floor.
    pub base_elevation: i32,
    /// Ring radii, outermost first.
    pub ring_radii: Vec<i32>,
    /// Height of each ring's cliff (distance to the next floor).
    pub ring_heights: Vec<i32>,
    /// How far the ground disc extends beyond the outermost ring.
    pub ground_margin: i32,
    /// Wall height above each ring floor.
    pub wall_height: i32,
    /// Radial thickness of ring walls.
    pub wall_thickness: i32,
    /// Road ring starts this far inside the ring edge.
    pub road_inner_inset: i32,
    /// Road ring stops this far inside the ring edge.
    pub road_outer_inset: i32,
    /// Prow thresholds.
    pub prow: ProwConfig,
    /// Radius of the central tower.
    pub tower_radius: i32,
    /// Radial thickness of the tower shell.
    pub tower_wall_thickness: i32,
    /// Height of the central tower.
    pub tower_height: i32,
    /// Radius of the solid pillar in the tower core.
    pub pillar_radius: i32,
}

/// An inclusive elevation range rendered as a platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformBand {
    /// First elevation of the band.
    pub start: i32,
    /// Last elevation of the band.
    pub end: i32,
}

impl PlatformBand {
    /// Creates a band covering `start..=end`.
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `y` lies inside the band.
    pub fn contains(&self, y: i32) -> bool {
        (self.start..=self.end).contains(&y)
    }
}

/// Lattice tower generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TowerConfig {
    /// Height of the tower body (antenna excluded).
    pub total_height: i32,
    /// Extra elevations occupied by the antenna.
    pub antenna_height: i32,
    /// Taper scale `k` in `w = k * (1 - progress)^exponent + w_min`.
    pub taper_scale: f64,
    /// Taper exponent.
    pub taper_exponent: f64,
    /// Minimum taper width `w_min`.
    pub min_width: f64,
    /// Leg centre offset as a fraction of the taper width.
    pub leg_spread: f64,
    /// Leg half-thickness at the base.
    pub leg_base_thickness: f64,
    /// From this elevation upward all leg centres sit on the origin.
    pub merge_elevation: i32,
    /// Horizontal bracing every this many elevations.
    pub brace_interval: i32,
    /// Period of the diagonal bracing pattern.
    pub diagonal_period: i32,
    /// Platform bands, bottom to top. The last one is the top platform.
    pub platform_bands: Vec<PlatformBand>,
    /// Platform overhang beyond the taper width.
    pub platform_margin: i32,
    /// Overhang of the topmost platform.
    pub top_platform_margin: i32,
    /// Radial depth of each platform deck.
    pub deck_depth: i32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file next to the config in debug builds.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1280,
            canvas_height: 720,
            default_zoom: 2.0,
            min_zoom: 1.0,
            max_zoom: 40.0,
            zoom_step: 1.5,
            initial_layer: 70,
            layer_margin: 50,
            grid_spacing: 10,
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            legibility_zoom: 6.0,
            dense_zoom: 12.0,
            min_length: 3,
            sparse_min_length: 5,
            edge_margin: 24.0,
            scan_padding: 32,
            font_px: 12.0,
            dimension_line_min: 3,
        }
    }
}

impl Default for ProwConfig {
    fn default() -> Self {
        Self {
            floor_start_width: 40.0,
            floor_extension: 320.0,
            floor_pad: 10.0,
            wall_half_width: 20,
            foundation_half_width: 15,
        }
    }
}

impl Default for FortressConfig {
    fn default() -> Self {
        Self {
            base_elevation: 64,
            ring_radii: vec![280, 230, 185, 145, 110, 80, 45],
            ring_heights: vec![15, 15, 15, 15, 15, 15, 60],
            ground_margin: 50,
            wall_height: 8,
            wall_thickness: 3,
            road_inner_inset: 6,
            road_outer_inset: 1,
            prow: ProwConfig::default(),
            tower_radius: 15,
            tower_wall_thickness: 2,
            tower_height: 100,
            pillar_radius: 3,
        }
    }
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            total_height: 280,
            antenna_height: 40,
            taper_scale: 60.0,
            taper_exponent: 1.8,
            min_width: 3.0,
            leg_spread: 0.85,
            leg_base_thickness: 8.0,
            merge_elevation: 200,
            brace_interval: 6,
            diagonal_period: 4,
            platform_bands: vec![
                PlatformBand::new(60, 62),
                PlatformBand::new(120, 122),
                PlatformBand::new(250, 252),
            ],
            platform_margin: 4,
            top_platform_margin: 2,
            deck_depth: 6,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

/// Platform config directory for the viewer (`<os config dir>/citadel`).
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("canvas_width: 1280"));
        assert!(ron_str.contains("base_elevation: 64"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_default_fortress_matches_seven_rings() {
        let fortress = FortressConfig::default();
        assert_eq!(fortress.ring_radii.len(), 7);
        assert_eq!(fortress.ring_radii.len(), fortress.ring_heights.len());
        assert_eq!(fortress.ring_radii[0], 280);
        assert_eq!(fortress.ring_heights.iter().sum::<i32>(), 150);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(viewer: (canvas_width: 800))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.viewer.canvas_width, 800);
        assert_eq!(config.viewer.canvas_height, 720);
        assert_eq!(config.tower, TowerConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_platform_band_contains_is_inclusive() {
        let band = PlatformBand::new(60, 62);
        assert!(!band.contains(59));
        assert!(band.contains(60));
        assert!(band.contains(62));
        assert!(!band.contains(63));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.viewer.canvas_width = 1920;
        config.fortress.wall_height = 12;
        config.tower.platform_bands.push(PlatformBand::new(270, 271));

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.labels.legibility_zoom = 10.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().labels.legibility_zoom, 10.0);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }
}
