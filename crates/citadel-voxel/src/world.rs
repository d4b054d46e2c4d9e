//! Sparse three-level voxel map: elevation → column X → column Z → material.
//!
//! Only occupied cells are stored. A missing entry at any level is air, which
//! keeps a mostly hollow structure spanning hundreds of cells per axis cheap.
//! Elevations sit in an ordered map so the observed height range is available
//! without a scan; columns use [`FxHashMap`](rustc_hash::FxHashMap).

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::palette::MaterialId;

/// One horizontal slice of the world: column X → column Z → material.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layer {
    columns: FxHashMap<i32, FxHashMap<i32, MaterialId>>,
    len: usize,
}

impl Layer {
    /// Returns the material at `(x, z)`, or `None` for air.
    pub fn get(&self, x: i32, z: i32) -> Option<MaterialId> {
        self.columns.get(&x).and_then(|column| column.get(&z)).copied()
    }

    /// Number of stored voxels in this layer.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the layer stores no voxels.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over `(x, z, material)` for every stored voxel.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, MaterialId)> + '_ {
        self.columns
            .iter()
            .flat_map(|(&x, column)| column.iter().map(move |(&z, &m)| (x, z, m)))
    }

    /// Per-material voxel counts, ordered by material id.
    pub fn material_counts(&self) -> BTreeMap<MaterialId, usize> {
        let mut counts = BTreeMap::new();
        for (_, _, material) in self.iter() {
            *counts.entry(material).or_insert(0) += 1;
        }
        counts
    }

    fn insert(&mut self, x: i32, z: i32, material: MaterialId) {
        if self
            .columns
            .entry(x)
            .or_default()
            .insert(z, material)
            .is_none()
        {
            self.len += 1;
        }
    }
}

/// A generated structure. Written once by a generator, read by the viewer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoxelWorld {
    layers: BTreeMap<i32, Layer>,
    voxel_count: usize,
}

impl VoxelWorld {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts the voxel at `(x, elevation, z)`.
    ///
    /// Air is never stored: passing [`MaterialId::AIR`] is a no-op. Otherwise
    /// any previous material at that cell is overwritten (last write wins), so
    /// generation order decides which feature covers which.
    pub fn set_block(&mut self, x: i32, elevation: i32, z: i32, material: MaterialId) {
        if material.is_air() {
            return;
        }
        let layer = self.layers.entry(elevation).or_default();
        let before = layer.len();
        layer.insert(x, z, material);
        self.voxel_count += layer.len() - before;
    }

    /// Returns the material at `(x, elevation, z)`, or `None` for air.
    pub fn get_block(&self, x: i32, elevation: i32, z: i32) -> Option<MaterialId> {
        self.layers.get(&elevation).and_then(|layer| layer.get(x, z))
    }

    /// Returns the layer at `elevation`, or `None` if nothing is stored there.
    pub fn layer(&self, elevation: i32) -> Option<&Layer> {
        self.layers.get(&elevation)
    }

    /// Lowest and highest elevations holding any voxel.
    pub fn elevation_bounds(&self) -> Option<(i32, i32)> {
        let min = *self.layers.keys().next()?;
        let max = *self.layers.keys().next_back()?;
        Some((min, max))
    }

    /// Occupied elevations in ascending order.
    pub fn elevations(&self) -> impl Iterator<Item = i32> + '_ {
        self.layers.keys().copied()
    }

    /// Number of occupied elevations.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total number of stored voxels.
    pub fn voxel_count(&self) -> usize {
        self.voxel_count
    }

    /// Returns `true` if no voxel is stored.
    pub fn is_empty(&self) -> bool {
        self.voxel_count == 0
    }

    /// Iterates over `(x, elevation, z, material)` for every stored voxel.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, i32, MaterialId)> + '_ {
        self.layers
            .iter()
            .flat_map(|(&y, layer)| layer.iter().map(move |(x, z, m)| (x, y, z, m)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut world = VoxelWorld::new();
        world.set_block(3, 64, -7, MaterialId::STONE);
        assert_eq!(world.get_block(3, 64, -7), Some(MaterialId::STONE));
        assert_eq!(world.voxel_count(), 1);
    }

    #[test]
    fn test_air_is_never_stored() {
        let mut world = VoxelWorld::new();
        world.set_block(0, 0, 0, MaterialId::AIR);
        assert!(world.is_empty());
        assert!(world.layer(0).is_none());
        assert_eq!(world.elevation_bounds(), None);
    }

    #[test]
    fn test_last_write_wins() {
        let mut world = VoxelWorld::new();
        world.set_block(1, 2, 3, MaterialId::GRASS_BLOCK);
        world.set_block(1, 2, 3, MaterialId::STONE);
        assert_eq!(world.get_block(1, 2, 3), Some(MaterialId::STONE));
        assert_eq!(world.voxel_count(), 1);
        assert_eq!(world.layer(2).map(Layer::len), Some(1));
    }

    #[test]
    fn test_missing_levels_are_absent() {
        let mut world = VoxelWorld::new();
        world.set_block(0, 10, 0, MaterialId::WOOD);
        // Missing elevation, missing column, missing cell.
        assert_eq!(world.get_block(0, 11, 0), None);
        assert_eq!(world.get_block(5, 10, 0), None);
        assert_eq!(world.get_block(0, 10, 5), None);
        assert!(world.layer(11).is_none());
    }

    #[test]
    fn test_elevation_bounds_and_counts() {
        let mut world = VoxelWorld::new();
        world.set_block(0, 63, 0, MaterialId::GRASS_BLOCK);
        world.set_block(0, 214, 0, MaterialId::STONE);
        world.set_block(1, 100, 0, MaterialId::STONE);
        assert_eq!(world.elevation_bounds(), Some((63, 214)));
        assert_eq!(world.layer_count(), 3);
        assert_eq!(world.elevations().collect::<Vec<_>>(), vec![63, 100, 214]);
    }

    #[test]
    fn test_layer_material_counts() {
        let mut world = VoxelWorld::new();
        for x in 0..4 {
            world.set_block(x, 0, 0, MaterialId::STONE);
        }
        world.set_block(0, 0, 1, MaterialId::WATER);
        let counts = world.layer(0).unwrap().material_counts();
        assert_eq!(counts.get(&MaterialId::STONE), Some(&4));
        assert_eq!(counts.get(&MaterialId::WATER), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_iter_visits_every_voxel_once() {
        let mut world = VoxelWorld::new();
        world.set_block(0, 0, 0, MaterialId::STONE);
        world.set_block(1, 0, 0, MaterialId::STONE);
        world.set_block(0, 5, 0, MaterialId::DIRT);
        let mut triples: Vec<_> = world.iter().collect();
        triples.sort_by_key(|&(x, y, z, _)| (y, x, z));
        assert_eq!(
            triples,
            vec![
                (0, 0, 0, MaterialId::STONE),
                (1, 0, 0, MaterialId::STONE),
                (0, 5, 0, MaterialId::DIRT),
            ]
        );
    }

    #[test]
    fn test_worlds_with_same_writes_compare_equal() {
        let mut a = VoxelWorld::new();
        let mut b = VoxelWorld::new();
        a.set_block(1, 1, 1, MaterialId::STONE);
        a.set_block(2, 1, 1, MaterialId::DIRT);
        b.set_block(2, 1, 1, MaterialId::DIRT);
        b.set_block(1, 1, 1, MaterialId::STONE);
        assert_eq!(a, b);
    }
}
