//! Orthographic top-down rendering of one elevation layer.

use std::collections::BTreeMap;

use citadel_config::ViewerConfig;
use citadel_voxel::{MaterialId, MaterialPalette, Rgb, VoxelWorld};
use glam::DVec2;

use crate::draw::DrawCommand;
use crate::viewport::Viewport;

/// Colours and spacing of the blueprint background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceStyle {
    /// Canvas clear colour.
    pub background: Rgb,
    /// Background grid colour.
    pub grid: Rgb,
    /// Colour of the two axes through the world origin.
    pub axes: Rgb,
    /// Grid spacing in world units.
    pub grid_spacing: i32,
}

impl Default for SliceStyle {
    fn default() -> Self {
        Self {
            background: Rgb(0x020617),
            grid: Rgb(0x1e293b),
            axes: Rgb(0x6366f1),
            grid_spacing: 10,
        }
    }
}

impl SliceStyle {
    /// Default colours with the configured grid spacing.
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            grid_spacing: config.grid_spacing,
            ..Self::default()
        }
    }
}

/// Per-material voxel counts of one layer.
///
/// Hidden materials are still counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerTally {
    counts: BTreeMap<MaterialId, usize>,
    total: usize,
}

/// One row of the material list shown next to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct TallyRow {
    /// Material id.
    pub material: MaterialId,
    /// Palette identifier, e.g. `stone_brick`.
    pub identifier: String,
    /// Human-readable name, e.g. `Stone Brick`.
    pub display_name: String,
    /// Swatch colour.
    pub color: Rgb,
    /// Voxels of this material in the layer.
    pub count: usize,
    /// Whether the material is currently hidden.
    pub hidden: bool,
}

impl LayerTally {
    /// Voxels of `material` in the layer.
    pub fn count(&self, material: MaterialId) -> usize {
        self.counts.get(&material).copied().unwrap_or(0)
    }

    /// Voxels in the layer, across all materials.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns `true` for an empty layer.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// `(material, count)` pairs ordered by material id.
    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, usize)> + '_ {
        self.counts.iter().map(|(&m, &c)| (m, c))
    }

    /// List rows ordered by palette id.
    pub fn rows(&self, palette: &MaterialPalette, viewport: &Viewport) -> Vec<TallyRow> {
        self.iter()
            .map(|(material, count)| TallyRow {
                material,
                identifier: palette.name(material).unwrap_or("unknown").to_string(),
                display_name: palette.display_name(material),
                color: palette.color(material),
                count,
                hidden: viewport.is_hidden(material),
            })
            .collect()
    }
}

/// Output of [`render_layer`].
#[derive(Debug, Clone, Default)]
pub struct SliceFrame {
    /// Display list: background, grid, axes, then voxels.
    pub commands: Vec<DrawCommand>,
    /// Material tally of the layer.
    pub tally: LayerTally,
    /// Voxel rectangles emitted.
    pub painted: usize,
    /// Visible voxels skipped because they fall outside the canvas.
    pub culled: usize,
}

/// Render layer `elevation` of `world` under `viewport`.
pub fn render_layer(
    world: &VoxelWorld,
    elevation: i32,
    viewport: &Viewport,
    palette: &MaterialPalette,
    style: &SliceStyle,
) -> SliceFrame {
    let mut frame = SliceFrame::default();
    background(viewport, style, &mut frame.commands);

    let Some(layer) = world.layer(elevation) else {
        return frame;
    };

    let zoom = viewport.zoom();
    let extent = viewport.canvas().extent();
    let size = zoom.ceil() as u32;

    for (x, z, material) in layer.iter() {
        *frame.tally.counts.entry(material).or_insert(0) += 1;
        frame.tally.total += 1;

        if viewport.is_hidden(material) {
            continue;
        }
        let screen = viewport.world_to_screen(f64::from(x), f64::from(z));
        if screen.x < -zoom || screen.x > extent.x || screen.y < -zoom || screen.y > extent.y {
            frame.culled += 1;
            continue;
        }
        frame.commands.push(DrawCommand::FillRect {
            x: screen.x.floor() as i32,
            y: screen.y.floor() as i32,
            width: size,
            height: size,
            color: palette.color(material),
        });
        frame.painted += 1;
    }

    tracing::trace!(
        elevation,
        painted = frame.painted,
        culled = frame.culled,
        total = frame.tally.total,
        "layer rendered"
    );
    frame
}

/// Clear, grid lines, and the two origin axes.
fn background(viewport: &Viewport, style: &SliceStyle, commands: &mut Vec<DrawCommand>) {
    let extent = viewport.canvas().extent();
    let offset = viewport.offset();
    commands.push(DrawCommand::Clear {
        color: style.background,
    });

    let spacing = f64::from(style.grid_spacing) * viewport.zoom();
    if spacing > 0.0 {
        let mut x = offset.x.rem_euclid(spacing);
        while x < extent.x {
            commands.push(DrawCommand::Line {
                from: DVec2::new(x, 0.0),
                to: DVec2::new(x, extent.y),
                color: style.grid,
                width: 1.0,
            });
            x += spacing;
        }
        let mut y = offset.y.rem_euclid(spacing);
        while y < extent.y {
            commands.push(DrawCommand::Line {
                from: DVec2::new(0.0, y),
                to: DVec2::new(extent.x, y),
                color: style.grid,
                width: 1.0,
            });
            y += spacing;
        }
    }

    commands.push(DrawCommand::Line {
        from: DVec2::new(offset.x, 0.0),
        to: DVec2::new(offset.x, extent.y),
        color: style.axes,
        width: 2.0,
    });
    commands.push(DrawCommand::Line {
        from: DVec2::new(0.0, offset.y),
        to: DVec2::new(extent.x, offset.y),
        color: style.axes,
        width: 2.0,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::CanvasSize;

    fn setup() -> (VoxelWorld, Viewport, MaterialPalette, SliceStyle) {
        let mut world = VoxelWorld::new();
        for x in 0..3 {
            world.set_block(x, 5, 0, MaterialId::STONE);
        }
        world.set_block(0, 5, 1, MaterialId::WATER);
        // Far outside the default 200x100 canvas.
        world.set_block(5000, 5, 0, MaterialId::STONE);
        let viewport = Viewport::new(CanvasSize::new(200, 100), &ViewerConfig::default());
        (world, viewport, MaterialPalette::standard(), SliceStyle::default())
    }

    fn rects(frame: &SliceFrame) -> Vec<&DrawCommand> {
        frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .collect()
    }

    #[test]
    fn test_background_comes_first() {
        let (world, viewport, palette, style) = setup();
        let frame = render_layer(&world, 5, &viewport, &palette, &style);
        assert_eq!(
            frame.commands[0],
            DrawCommand::Clear {
                color: style.background
            }
        );
        let axes = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { color, .. } if *color == style.axes))
            .count();
        assert_eq!(axes, 2);
    }

    #[test]
    fn test_voxels_project_and_cull() {
        let (world, viewport, palette, style) = setup();
        let frame = render_layer(&world, 5, &viewport, &palette, &style);
        assert_eq!(frame.painted, 4);
        assert_eq!(frame.culled, 1);
        assert!(rects(&frame).contains(&&DrawCommand::FillRect {
            x: 102,
            y: 50,
            width: 2,
            height: 2,
            color: palette.color(MaterialId::STONE),
        }));
        assert_eq!(frame.tally.total(), 5);
        assert_eq!(frame.tally.count(MaterialId::STONE), 4);
    }

    #[test]
    fn test_hidden_material_is_counted_but_not_painted() {
        let (world, mut viewport, palette, style) = setup();
        viewport.hide(MaterialId::STONE);
        let frame = render_layer(&world, 5, &viewport, &palette, &style);
        let stone = palette.color(MaterialId::STONE);
        assert!(rects(&frame).iter().all(|c| c.fill_color() != Some(stone)));
        assert_eq!(frame.painted, 1);
        assert_eq!(frame.tally.count(MaterialId::STONE), 4);

        let rows = frame.tally.rows(&palette, &viewport);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].identifier, "stone");
        assert!(rows[0].hidden);
        assert_eq!(rows[1].display_name, "Water");
        assert!(!rows[1].hidden);
    }

    #[test]
    fn test_missing_layer_renders_background_only() {
        let (world, viewport, palette, style) = setup();
        let frame = render_layer(&world, 6, &viewport, &palette, &style);
        assert!(frame.tally.is_empty());
        assert!(rects(&frame).is_empty());
        assert!(!frame.commands.is_empty());
    }

    #[test]
    fn test_unknown_material_uses_fallback_colour() {
        let (mut world, viewport, palette, style) = setup();
        world.set_block(0, 9, 0, MaterialId(999));
        let frame = render_layer(&world, 9, &viewport, &palette, &style);
        assert_eq!(
            rects(&frame)[0].fill_color(),
            Some(citadel_voxel::FALLBACK_COLOR)
        );
        let rows = frame.tally.rows(&palette, &viewport);
        assert_eq!(rows[0].identifier, "unknown");
    }

    #[test]
    fn test_grid_phase_follows_offset() {
        let (world, mut viewport, palette, style) = setup();
        viewport.pan(-3.0, 0.0);
        let frame = render_layer(&world, 5, &viewport, &palette, &style);
        // Offset x = 97, spacing 20 -> first vertical grid line at 17.
        let first = frame.commands.iter().find_map(|c| match c {
            DrawCommand::Line { from, to, color, .. }
                if *color == style.grid && from.x == to.x =>
            {
                Some(from.x)
            }
            _ => None,
        });
        assert_eq!(first, Some(17.0));
    }
}
