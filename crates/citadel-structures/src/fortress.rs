//! Tiered fortress: concentric rings stepping up towards a central tower.
//!
//! Each ring is a floor annulus with a road near its rim, a wall shell at the
//! rim, and a cliff rising to the next ring. A prow on the +X side cuts the
//! lower walls and forms a solid keel through every cliff. Passes run in a
//! fixed order because later writes cover earlier ones.

use citadel_config::{FortressConfig, ProwConfig};
use citadel_voxel::{MaterialId, VoxelWorld};

use crate::radial_distance;

const GROUND: MaterialId = MaterialId::GRASS_BLOCK;
const FLOOR: MaterialId = MaterialId::GRASS_BLOCK;
const ROAD: MaterialId = MaterialId::STONE;
const WALL: MaterialId = MaterialId::WHITE_CONCRETE;
const CLIFF: MaterialId = MaterialId::STONE;
const KEEL: MaterialId = MaterialId::WHITE_CONCRETE;
const TOWER_SHELL: MaterialId = MaterialId::WHITE_CONCRETE;
const PILLAR: MaterialId = MaterialId::STONE;

/// Support grid spacing inside cliffs.
const SUPPORT_SPACING: i32 = 10;
/// Cells this close to a cliff edge form its solid shell.
const CLIFF_SHELL: f64 = 2.0;
/// Cells this close to a cliff edge get inner reinforcement.
const CLIFF_REINFORCEMENT: f64 = 3.0;

/// Build the fortress described by `config`.
pub fn generate_fortress(config: &FortressConfig) -> VoxelWorld {
    let mut world = VoxelWorld::new();
    let mut builder = FortressBuilder {
        config,
        world: &mut world,
    };
    builder.ground_pass();

    let rings = config.ring_radii.len().min(config.ring_heights.len());
    let mut elevation = config.base_elevation;
    for ring in 0..rings {
        builder.floor_pass(ring, rings, elevation);
        builder.wall_pass(ring, rings, elevation);
        builder.foundation_pass(ring, rings, elevation);
        elevation += config.ring_heights[ring];
    }

    builder.tower_pass(elevation);
    world
}

/// The tapering wedge that defines the prow footprint on a floor.
fn in_floor_wedge(prow: &ProwConfig, x: i32, z: i32) -> bool {
    let half_width =
        prow.floor_start_width * (1.0 - f64::from(x) / prow.floor_extension) + prow.floor_pad;
    x > 0 && f64::from(z.abs()) < half_width
}

fn in_wall_cut(prow: &ProwConfig, x: i32, z: i32) -> bool {
    x > 0 && z.abs() < prow.wall_half_width
}

fn in_keel(prow: &ProwConfig, x: i32, z: i32) -> bool {
    x > 0 && z.abs() < prow.foundation_half_width
}

struct FortressBuilder<'a> {
    config: &'a FortressConfig,
    world: &'a mut VoxelWorld,
}

impl FortressBuilder<'_> {
    fn inner_radius(&self, ring: usize, rings: usize) -> i32 {
        if ring + 1 < rings {
            self.config.ring_radii[ring + 1]
        } else {
            0
        }
    }

    /// Flat disc one below the base, reaching past the outermost ring.
    fn ground_pass(&mut self) {
        let Some(&outermost) = self.config.ring_radii.first() else {
            return;
        };
        let radius = outermost + self.config.ground_margin;
        let elevation = self.config.base_elevation - 1;
        for x in -radius..=radius {
            for z in -radius..=radius {
                if radial_distance(x, z) <= f64::from(radius) {
                    self.world.set_block(x, elevation, z, GROUND);
                }
            }
        }
    }

    fn floor_pass(&mut self, ring: usize, rings: usize, elevation: i32) {
        let outer = self.config.ring_radii[ring];
        let inner = self.inner_radius(ring, rings);
        let (outer_f, inner_f) = (f64::from(outer), f64::from(inner));
        let road_min = f64::from(outer - self.config.road_inner_inset);
        let road_max = f64::from(outer - self.config.road_outer_inset);
        let mut prow_cells = 0usize;

        for x in -outer..=outer {
            for z in -outer..=outer {
                let dist = radial_distance(x, z);
                if dist > outer_f || dist <= inner_f {
                    continue;
                }
                self.world.set_block(x, elevation, z, FLOOR);
                if dist > road_min && dist < road_max {
                    self.world.set_block(x, elevation, z, ROAD);
                }
                if in_floor_wedge(&self.config.prow, x, z) {
                    prow_cells += 1;
                }
            }
        }
        tracing::debug!(ring, elevation, prow_cells, "floor laid");
    }

    fn wall_pass(&mut self, ring: usize, rings: usize, elevation: i32) {
        let outer = self.config.ring_radii[ring];
        let outer_f = f64::from(outer);
        let inner_f = f64::from(outer - self.config.wall_thickness);
        let wraps_fully = ring + 1 == rings;

        for x in -outer..=outer {
            for z in -outer..=outer {
                let dist = radial_distance(x, z);
                if dist > outer_f || dist <= inner_f {
                    continue;
                }
                if !wraps_fully && in_wall_cut(&self.config.prow, x, z) {
                    continue;
                }
                for h in 0..self.config.wall_height {
                    self.world.set_block(x, elevation + h, z, WALL);
                }
            }
        }
    }

    /// Cliff from this ring's floor up to the next ring's floor.
    fn foundation_pass(&mut self, ring: usize, rings: usize, elevation: i32) {
        if ring + 1 >= rings {
            return;
        }
        let next = self.config.ring_radii[ring + 1];
        let next_f = f64::from(next);
        let height = self.config.ring_heights[ring];

        for x in -next..=next {
            for z in -next..=next {
                let dist = radial_distance(x, z);
                if dist > next_f {
                    continue;
                }
                let material = if dist > next_f - CLIFF_SHELL {
                    CLIFF
                } else if in_keel(&self.config.prow, x, z) {
                    KEEL
                } else if (x % SUPPORT_SPACING == 0 && z % SUPPORT_SPACING == 0)
                    || dist > next_f - CLIFF_REINFORCEMENT
                {
                    CLIFF
                } else {
                    continue;
                };
                for h in 1..=height {
                    self.world.set_block(x, elevation + h, z, material);
                }
            }
        }
    }

    /// Hollow tower with a solid core on top of the innermost ring.
    fn tower_pass(&mut self, elevation: i32) {
        let radius = self.config.tower_radius;
        let radius_f = f64::from(radius);
        let shell_inner = f64::from(radius - self.config.tower_wall_thickness);
        let pillar = f64::from(self.config.pillar_radius);

        for h in 0..self.config.tower_height {
            for x in -radius..=radius {
                for z in -radius..=radius {
                    let dist = radial_distance(x, z);
                    if dist <= radius_f && dist > shell_inner {
                        self.world.set_block(x, elevation + h, z, TOWER_SHELL);
                    }
                    if dist < pillar {
                        self.world.set_block(x, elevation + h, z, PILLAR);
                    }
                }
            }
        }
        tracing::debug!(elevation, radius, "tower raised");
    }
}
