//! Pan/zoom/layer state shared by the slice renderer and the labeler.
//!
//! Screen space is `offset + world * zoom`, with world X to the right and
//! world Z downwards. Every mutator clamps, so no request can put the
//! viewport into an invalid state.

use std::collections::BTreeSet;

use citadel_config::ViewerConfig;
use citadel_voxel::{MaterialId, VoxelWorld};
use glam::DVec2;

/// Bounds used before any world has been generated.
const DEFAULT_BOUNDS: LayerBounds = LayerBounds { min: 0, max: 300 };

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Creates a canvas size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Centre of the canvas.
    pub fn center(self) -> DVec2 {
        DVec2::new(f64::from(self.width), f64::from(self.height)) * 0.5
    }

    /// Extent as a float vector.
    pub fn extent(self) -> DVec2 {
        DVec2::new(f64::from(self.width), f64::from(self.height))
    }
}

/// Inclusive range of selectable elevations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerBounds {
    /// Lowest selectable elevation.
    pub min: i32,
    /// Highest selectable elevation.
    pub max: i32,
}

impl Default for LayerBounds {
    fn default() -> Self {
        DEFAULT_BOUNDS
    }
}

impl LayerBounds {
    /// Observed elevation range of `world`, with `margin` of headroom on top.
    ///
    /// An empty world keeps the default range.
    pub fn from_world(world: &VoxelWorld, margin: i32) -> Self {
        match world.elevation_bounds() {
            Some((min, max)) => Self {
                min,
                max: max.saturating_add(margin),
            },
            None => DEFAULT_BOUNDS,
        }
    }

    /// Clamp `elevation` into the range.
    pub fn clamp(self, elevation: i32) -> i32 {
        elevation.clamp(self.min, self.max.max(self.min))
    }
}

/// View state for one canvas.
#[derive(Debug, Clone)]
pub struct Viewport {
    canvas: CanvasSize,
    offset: DVec2,
    zoom: f64,
    layer: i32,
    bounds: LayerBounds,
    hidden: BTreeSet<MaterialId>,
    default_zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
}

impl Viewport {
    /// Creates a viewport centred on the world origin.
    #[must_use]
    pub fn new(canvas: CanvasSize, config: &ViewerConfig) -> Self {
        let bounds = LayerBounds::default();
        let min_zoom = config.min_zoom;
        let max_zoom = config.max_zoom.max(min_zoom);
        Self {
            canvas,
            offset: canvas.center(),
            zoom: config.default_zoom.clamp(min_zoom, max_zoom),
            layer: bounds.clamp(config.initial_layer),
            bounds,
            hidden: BTreeSet::new(),
            default_zoom: config.default_zoom.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
            zoom_step: config.zoom_step,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// Pixels per world unit.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Screen position of the world origin.
    pub fn offset(&self) -> DVec2 {
        self.offset
    }

    /// Selected elevation.
    pub fn layer(&self) -> i32 {
        self.layer
    }

    /// Current canvas size.
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Selectable elevation range.
    pub fn bounds(&self) -> LayerBounds {
        self.bounds
    }

    /// Materials currently hidden.
    pub fn hidden(&self) -> &BTreeSet<MaterialId> {
        &self.hidden
    }

    /// Returns `true` if `material` is hidden.
    pub fn is_hidden(&self, material: MaterialId) -> bool {
        self.hidden.contains(&material)
    }

    // ── Mutators ────────────────────────────────────────────────────

    /// Shift the view by a screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset += DVec2::new(dx, dy);
    }

    /// Set the zoom level, keeping the world point under `cursor` fixed.
    pub fn zoom_to(&mut self, zoom: f64, cursor: DVec2) {
        let anchor = (cursor - self.offset) / self.zoom;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.offset = cursor - anchor * self.zoom;
    }

    /// Multiply the zoom by `factor` about `cursor`.
    pub fn zoom_at(&mut self, factor: f64, cursor: DVec2) {
        self.zoom_to(self.zoom * factor, cursor);
    }

    /// One zoom step in, about the canvas centre.
    pub fn zoom_in(&mut self) {
        self.zoom_at(self.zoom_step, self.canvas.center());
    }

    /// One zoom step out, about the canvas centre.
    pub fn zoom_out(&mut self) {
        self.zoom_at(1.0 / self.zoom_step, self.canvas.center());
    }

    /// Select an elevation. Returns the clamped layer actually selected.
    pub fn set_layer(&mut self, elevation: i32) -> i32 {
        self.layer = self.bounds.clamp(elevation);
        self.layer
    }

    /// Move the selected elevation by `delta`.
    pub fn step_layer(&mut self, delta: i32) -> i32 {
        self.set_layer(self.layer.saturating_add(delta))
    }

    /// Replace the selectable range and re-clamp the current layer.
    pub fn set_bounds(&mut self, bounds: LayerBounds) {
        self.bounds = bounds;
        self.layer = bounds.clamp(self.layer);
    }

    /// Flip the visibility of `material`. Returns `true` if it is now hidden.
    pub fn toggle_material(&mut self, material: MaterialId) -> bool {
        if self.hidden.remove(&material) {
            false
        } else {
            self.hidden.insert(material);
            true
        }
    }

    /// Hide `material` (idempotent).
    pub fn hide(&mut self, material: MaterialId) {
        self.hidden.insert(material);
    }

    /// Make every material visible again.
    pub fn show_all(&mut self) {
        self.hidden.clear();
    }

    /// Restore the default zoom and centre the origin on `canvas`.
    pub fn reset(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
        self.zoom = self.default_zoom;
        self.offset = canvas.center();
    }

    /// Record a new canvas size and re-centre the origin.
    pub fn resize(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
        self.offset = canvas.center();
    }

    // ── Projection ──────────────────────────────────────────────────

    /// Screen position of the corner of world cell `(x, z)`.
    pub fn world_to_screen(&self, x: f64, z: f64) -> DVec2 {
        self.offset + DVec2::new(x, z) * self.zoom
    }

    /// World cell under a screen position.
    pub fn screen_to_world(&self, px: f64, py: f64) -> (i32, i32) {
        let world = (DVec2::new(px, py) - self.offset) / self.zoom;
        (world.x.floor() as i32, world.y.floor() as i32)
    }

    /// Inclusive world cell range `(min_x, min_z, max_x, max_z)` covered by
    /// the canvas.
    pub fn visible_cells(&self) -> (i32, i32, i32, i32) {
        let (min_x, min_z) = self.screen_to_world(0.0, 0.0);
        let extent = self.canvas.extent();
        let (max_x, max_z) = self.screen_to_world(extent.x, extent.y);
        (min_x, min_z, max_x, max_z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(CanvasSize::new(800, 600), &ViewerConfig::default())
    }

    #[test]
    fn test_new_viewport_defaults() {
        let vp = viewport();
        assert_eq!(vp.zoom(), 2.0);
        assert_eq!(vp.offset(), DVec2::new(400.0, 300.0));
        assert_eq!(vp.layer(), 70);
        assert_eq!(vp.bounds(), LayerBounds { min: 0, max: 300 });
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut vp = viewport();
        for _ in 0..20 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom(), 40.0);
        for _ in 0..40 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom(), 1.0);
        vp.zoom_to(1000.0, DVec2::ZERO);
        assert_eq!(vp.zoom(), 40.0);
    }

    #[test]
    fn test_zoom_at_keeps_cursor_anchor() {
        let mut vp = viewport();
        let cursor = DVec2::new(123.0, 456.0);
        let before = (cursor - vp.offset()) / vp.zoom();
        vp.zoom_at(3.0, cursor);
        let after = (cursor - vp.offset()) / vp.zoom();
        assert!((before - after).length() < 1e-9);
        assert_eq!(vp.zoom(), 6.0);
    }

    #[test]
    fn test_layer_clamping() {
        let mut vp = viewport();
        assert_eq!(vp.set_layer(-10), 0);
        assert_eq!(vp.set_layer(1000), 300);

        let mut world = VoxelWorld::new();
        world.set_block(0, 63, 0, MaterialId::STONE);
        world.set_block(0, 214, 0, MaterialId::STONE);
        vp.set_bounds(LayerBounds::from_world(&world, 50));
        assert_eq!(vp.layer(), 264);
        assert_eq!(vp.step_layer(10), 264);
        assert_eq!(vp.set_layer(0), 63);
        assert_eq!(vp.step_layer(-1), 63);
    }

    #[test]
    fn test_bounds_of_empty_world_are_default() {
        assert_eq!(
            LayerBounds::from_world(&VoxelWorld::new(), 50),
            LayerBounds::default()
        );
    }

    #[test]
    fn test_toggle_and_show_all() {
        let mut vp = viewport();
        assert!(vp.toggle_material(MaterialId::STONE));
        assert!(vp.is_hidden(MaterialId::STONE));
        assert!(!vp.toggle_material(MaterialId::STONE));
        assert!(!vp.is_hidden(MaterialId::STONE));
        vp.hide(MaterialId::WATER);
        vp.hide(MaterialId::DIRT);
        vp.show_all();
        assert!(vp.hidden().is_empty());
    }

    #[test]
    fn test_screen_to_world_floors() {
        let mut vp = viewport();
        vp.zoom_to(10.0, vp.offset());
        assert_eq!(vp.screen_to_world(400.0, 300.0), (0, 0));
        assert_eq!(vp.screen_to_world(399.0, 300.0), (-1, 0));
        assert_eq!(vp.screen_to_world(419.9, 289.0), (1, -2));
    }

    #[test]
    fn test_reset_and_resize_recentre() {
        let mut vp = viewport();
        vp.pan(50.0, -20.0);
        vp.zoom_in();
        vp.resize(CanvasSize::new(1000, 500));
        assert_eq!(vp.offset(), DVec2::new(500.0, 250.0));
        assert_eq!(vp.zoom(), 3.0);
        vp.reset(CanvasSize::new(200, 100));
        assert_eq!(vp.offset(), DVec2::new(100.0, 50.0));
        assert_eq!(vp.zoom(), 2.0);
        assert_eq!(vp.canvas(), CanvasSize::new(200, 100));
    }

    #[test]
    fn test_visible_cells() {
        let vp = viewport();
        // 800x600 at zoom 2 centred on the origin.
        assert_eq!(vp.visible_cells(), (-200, -150, 200, 150));
    }
}
