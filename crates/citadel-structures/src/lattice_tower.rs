//! Lattice tower: four braced legs tapering into a single spire.
//!
//! Every elevation is one of three things: a platform band (square deck with a
//! dashed railing), a leg slice, or (above the tower body) the antenna.

use citadel_config::TowerConfig;
use citadel_voxel::{MaterialId, VoxelWorld};

const LEG: MaterialId = MaterialId::IRON_LATTICE;
const DECK: MaterialId = MaterialId::STONE_BRICK;
const RAILING: MaterialId = MaterialId::WALL_OUTLINE;
const ANTENNA: MaterialId = MaterialId::GOLD_BLOCK;

/// Fraction of the antenna allowance that keeps the full antenna width.
const ANTENNA_FULL_WIDTH_FRACTION: f64 = 0.75;

/// Taper width at `progress` (0 at the base, 1 at the top of the body).
///
/// `w = k * (1 - progress)^exponent + w_min`, so `taper_width(config, 1.0)`
/// is exactly `w_min`.
pub fn taper_width(config: &TowerConfig, progress: f64) -> f64 {
    let progress = progress.clamp(0.0, 1.0);
    config.taper_scale * (1.0 - progress).powf(config.taper_exponent) + config.min_width
}

/// Build the tower described by `config`.
pub fn generate_lattice_tower(config: &TowerConfig) -> VoxelWorld {
    let mut world = VoxelWorld::new();
    let top = config.total_height + config.antenna_height;

    for y in 0..=top {
        if y > config.total_height {
            antenna_slice(&mut world, config, y);
            continue;
        }
        let progress = if config.total_height > 0 {
            f64::from(y) / f64::from(config.total_height)
        } else {
            1.0
        };
        let width = taper_width(config, progress);

        let band = config.platform_bands.iter().position(|b| b.contains(y));
        match band {
            Some(index) => {
                let margin = if index + 1 == config.platform_bands.len() {
                    config.top_platform_margin
                } else {
                    config.platform_margin
                };
                platform_slice(&mut world, config, y, width.round() as i32 + margin);
            }
            None => leg_slice(&mut world, config, y, progress, width),
        }
    }
    world
}

fn antenna_slice(world: &mut VoxelWorld, config: &TowerConfig, y: i32) {
    let climbed = f64::from(y - config.total_height);
    let half = if climbed <= ANTENNA_FULL_WIDTH_FRACTION * f64::from(config.antenna_height) {
        1
    } else {
        0
    };
    for x in -half..=half {
        for z in -half..=half {
            world.set_block(x, y, z, ANTENNA);
        }
    }
}

/// Square annular deck; the outermost ring is a dashed railing.
fn platform_slice(world: &mut VoxelWorld, config: &TowerConfig, y: i32, outer: i32) {
    for x in -outer..=outer {
        for z in -outer..=outer {
            let ring = x.abs().max(z.abs());
            if ring == outer {
                if (x + z).rem_euclid(2) == 0 {
                    world.set_block(x, y, z, RAILING);
                }
            } else if ring > outer - config.deck_depth {
                world.set_block(x, y, z, DECK);
            }
        }
    }
}

fn leg_slice(world: &mut VoxelWorld, config: &TowerConfig, y: i32, progress: f64, width: f64) {
    let thickness = ((config.leg_base_thickness * (1.0 - progress)).round() as i32).max(1);
    let offset = if y >= config.merge_elevation {
        0
    } else {
        (config.leg_spread * width).round() as i32
    };
    let horizontal_brace = config.brace_interval > 0 && y % config.brace_interval == 0;

    for (cx, cz) in [(offset, offset), (offset, -offset), (-offset, offset), (-offset, -offset)] {
        for dx in -thickness..=thickness {
            for dz in -thickness..=thickness {
                let on_edge = dx.abs() == thickness || dz.abs() == thickness;
                let diagonal_brace = config.diagonal_period > 0
                    && (dx + dz + y).rem_euclid(config.diagonal_period) == 0;
                if on_edge || horizontal_brace || diagonal_brace {
                    world.set_block(cx + dx, y, cz + dz, LEG);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taper_reaches_minimum_at_top() {
        let config = TowerConfig::default();
        assert_eq!(taper_width(&config, 1.0), config.min_width);
        assert_eq!(taper_width(&config, 0.0), config.taper_scale + config.min_width);
        assert!(taper_width(&config, 0.5) < taper_width(&config, 0.25));
        // Clamped outside [0, 1].
        assert_eq!(taper_width(&config, 2.0), config.min_width);
    }

    #[test]
    fn test_only_antenna_above_body() {
        let config = TowerConfig::default();
        let world = generate_lattice_tower(&config);
        let above: Vec<_> = world
            .iter()
            .filter(|&(_, y, _, _)| y > config.total_height)
            .collect();
        assert!(!above.is_empty());
        for (x, _, z, material) in above {
            assert!(x.abs().max(z.abs()) <= 1, "antenna too wide at ({x}, {z})");
            assert_eq!(material, ANTENNA);
        }
    }

    #[test]
    fn test_antenna_tapers_to_single_column() {
        let config = TowerConfig::default();
        let world = generate_lattice_tower(&config);
        let tip = config.total_height + config.antenna_height;
        assert_eq!(world.layer(tip).map(|l| l.len()), Some(1));
        assert_eq!(world.layer(config.total_height + 1).map(|l| l.len()), Some(9));
        assert_eq!(world.elevation_bounds(), Some((0, tip)));
    }

    #[test]
    fn test_base_has_four_separate_legs() {
        let config = TowerConfig::default();
        let world = generate_lattice_tower(&config);
        // y = 0 is a horizontal brace, so each leg is a solid square.
        let offset = (config.leg_spread * taper_width(&config, 0.0)).round() as i32;
        let layer = world.layer(0).expect("base layer");
        let legs = [
            (offset, offset),
            (-offset, offset),
            (offset, -offset),
            (-offset, -offset),
        ];
        for (cx, cz) in legs {
            assert_eq!(layer.get(cx, cz), Some(LEG));
            assert_eq!(layer.get(cx + 8, cz), Some(LEG));
            assert_eq!(layer.get(cx + 9, cz), None);
        }
        assert_eq!(layer.get(0, 0), None);
        assert_eq!(layer.len(), 4 * 17 * 17);
    }

    #[test]
    fn test_legs_are_lattice_not_solid() {
        let config = TowerConfig::default();
        let world = generate_lattice_tower(&config);
        // y = 1: not a brace level; interior cells follow the diagonal pattern.
        let offset = (config.leg_spread * taper_width(&config, 1.0 / 280.0)).round() as i32;
        let layer = world.layer(1).expect("leg layer");
        // dx + dz + y = 3 -> not a multiple of 4.
        assert_eq!(layer.get(offset + 1, offset + 1), None);
        // dx + dz + y = 4 -> brace.
        assert_eq!(layer.get(offset + 2, offset + 1), Some(LEG));
    }

    #[test]
    fn test_legs_merge_above_merge_elevation() {
        let config = TowerConfig::default();
        let world = generate_lattice_tower(&config);
        let layer = world.layer(config.merge_elevation).expect("spire layer");
        assert_eq!(layer.get(0, 0), Some(LEG));
        assert!(layer.iter().all(|(x, z, _)| x.abs() <= 8 && z.abs() <= 8));
    }

    #[test]
    fn test_platform_has_deck_and_dashed_railing() {
        let config = TowerConfig::default();
        let world = generate_lattice_tower(&config);
        let band = config.platform_bands[0];
        let progress = f64::from(band.start) / f64::from(config.total_height);
        let outer = taper_width(&config, progress).round() as i32 + config.platform_margin;
        let layer = world.layer(band.start).expect("platform layer");

        assert_eq!(layer.get(outer - 1, 0), Some(DECK));
        assert_eq!(layer.get(outer - config.deck_depth + 1, 0), Some(DECK));
        assert_eq!(layer.get(outer - config.deck_depth, 0), None);
        // Railing alternates along the rim.
        let rim: Vec<_> = (0..4).map(|z| layer.get(outer, z)).collect();
        let expected_even = if outer % 2 == 0 { Some(RAILING) } else { None };
        let expected_odd = if outer % 2 == 0 { None } else { Some(RAILING) };
        assert_eq!(rim, vec![expected_even, expected_odd, expected_even, expected_odd]);
    }

    #[test]
    fn test_top_platform_uses_its_own_margin() {
        let config = TowerConfig::default();
        let world = generate_lattice_tower(&config);
        let band = *config.platform_bands.last().expect("top band");
        let progress = f64::from(band.start) / f64::from(config.total_height);
        let outer = taper_width(&config, progress).round() as i32 + config.top_platform_margin;
        let layer = world.layer(band.start).expect("top platform");
        let max_ring = layer.iter().map(|(x, z, _)| x.abs().max(z.abs())).max();
        assert_eq!(max_ring, Some(outer));
    }
}
