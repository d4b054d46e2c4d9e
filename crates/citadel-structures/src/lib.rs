//! Procedural structure generators that fill a [`VoxelWorld`].
//!
//! Two variants exist: a seven-tier concentric fortress and a tapering
//! four-legged lattice tower. Both are pure functions of their configuration,
//! so the same parameters always produce an identical world.

mod fortress;
mod lattice_tower;

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use citadel_config::{Config, FortressConfig, TowerConfig};
use citadel_voxel::VoxelWorld;
use thiserror::Error;

pub use fortress::generate_fortress;
pub use lattice_tower::{generate_lattice_tower, taper_width};

/// Which structure to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StructureVariant {
    /// Concentric ring city with walls, cliffs and a central tower.
    TieredFortress,
    /// Four-legged tapering lattice tower with platforms and an antenna.
    LatticeTower,
}

impl StructureVariant {
    /// Every variant, in menu order.
    pub const ALL: [StructureVariant; 2] = [Self::TieredFortress, Self::LatticeTower];

    /// Canonical name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::TieredFortress => "fortress",
            Self::LatticeTower => "tower",
        }
    }
}

impl fmt::Display for StructureVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised when selecting a structure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    /// The name does not match any variant.
    #[error("unknown structure variant: {0:?} (expected \"fortress\" or \"tower\")")]
    UnknownVariant(String),
}

impl FromStr for StructureVariant {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fortress" | "tiered-fortress" | "tiered_fortress" => Ok(Self::TieredFortress),
            "tower" | "lattice-tower" | "lattice_tower" => Ok(Self::LatticeTower),
            _ => Err(StructureError::UnknownVariant(s.to_string())),
        }
    }
}

/// Parameters for every variant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StructureConfig {
    /// Tiered fortress parameters.
    pub fortress: FortressConfig,
    /// Lattice tower parameters.
    pub tower: TowerConfig,
}

impl From<&Config> for StructureConfig {
    fn from(config: &Config) -> Self {
        Self {
            fortress: config.fortress.clone(),
            tower: config.tower.clone(),
        }
    }
}

/// Generate a variant with the built-in parameters.
pub fn generate(variant: StructureVariant) -> VoxelWorld {
    generate_with(variant, &StructureConfig::default())
}

/// Generate a variant with explicit parameters.
pub fn generate_with(variant: StructureVariant, config: &StructureConfig) -> VoxelWorld {
    let started = Instant::now();
    let world = match variant {
        StructureVariant::TieredFortress => generate_fortress(&config.fortress),
        StructureVariant::LatticeTower => generate_lattice_tower(&config.tower),
    };
    tracing::info!(
        variant = variant.name(),
        voxels = world.voxel_count(),
        layers = world.layer_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "structure generated"
    );
    world
}

/// Euclidean distance of a column from the structure axis.
pub(crate) fn radial_distance(x: i32, z: i32) -> f64 {
    let (x, z) = (i64::from(x), i64::from(z));
    ((x * x + z * z) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parsing() {
        assert_eq!("fortress".parse(), Ok(StructureVariant::TieredFortress));
        assert_eq!("Tiered-Fortress".parse(), Ok(StructureVariant::TieredFortress));
        assert_eq!("tower".parse(), Ok(StructureVariant::LatticeTower));
        assert_eq!(" lattice_tower ".parse(), Ok(StructureVariant::LatticeTower));
        assert_eq!(
            "castle".parse::<StructureVariant>(),
            Err(StructureError::UnknownVariant("castle".to_string()))
        );
    }

    #[test]
    fn test_variant_names_roundtrip() {
        for variant in StructureVariant::ALL {
            assert_eq!(variant.to_string().parse(), Ok(variant));
        }
    }

    #[test]
    fn test_radial_distance() {
        assert_eq!(radial_distance(3, 4), 5.0);
        assert_eq!(radial_distance(-280, 0), 280.0);
        assert_eq!(radial_distance(0, 0), 0.0);
    }

    #[test]
    fn test_structure_config_from_config() {
        let mut config = Config::default();
        config.fortress.wall_height = 11;
        config.tower.total_height = 99;
        let structures = StructureConfig::from(&config);
        assert_eq!(structures.fortress.wall_height, 11);
        assert_eq!(structures.tower.total_height, 99);
    }

    #[test]
    fn test_generation_is_deterministic() {
        for variant in StructureVariant::ALL {
            assert_eq!(generate(variant), generate(variant), "{variant} differs");
        }
    }

    #[test]
    fn test_no_air_is_ever_stored() {
        for variant in StructureVariant::ALL {
            let world = generate(variant);
            assert!(!world.is_empty());
            assert!(world.iter().all(|(_, _, _, material)| !material.is_air()));
        }
    }
}
