//! Dimension labels for runs of identical voxels.
//!
//! A run is a maximal line of same-material cells along X (horizontal) or Z
//! (vertical). Runs with the same start, length, and material on consecutive
//! lines merge into one [`RunGroup`], so a solid wall gets one label per axis
//! instead of one per row. Each surviving group gets its length as text,
//! slid along the run to stay on screen, plus a dimension line for longer
//! runs. Labels that would overlap an earlier label are dropped.

use citadel_config::LabelConfig;
use citadel_voxel::{Layer, MaterialId, Rgb, VoxelWorld};
use glam::DVec2;
use rustc_hash::FxHashMap;

use crate::draw::{DrawCommand, dimension_line};
use crate::viewport::Viewport;

/// Character width as a fraction of the font size, for box estimates.
const CHAR_WIDTH_FACTOR: f64 = 0.6;
/// Padding added to both box dimensions.
const BOX_PADDING: f64 = 4.0;

/// Run axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Along X, at a fixed Z.
    Horizontal,
    /// Along Z, at a fixed X.
    Vertical,
}

/// A maximal line of one material in one row or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// Run axis.
    pub orientation: Orientation,
    /// Material of every cell in the run.
    pub material: MaterialId,
    /// The fixed coordinate: Z for horizontal runs, X for vertical ones.
    pub line: i32,
    /// First cell along the run axis.
    pub start: i32,
    /// Number of cells.
    pub length: u32,
}

/// Identical runs on consecutive lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunGroup {
    /// Run axis.
    pub orientation: Orientation,
    /// Material shared by every run.
    pub material: MaterialId,
    /// First cell along the run axis.
    pub start: i32,
    /// Run length in cells.
    pub length: u32,
    /// First line covered.
    pub first_line: i32,
    /// Last line covered (inclusive).
    pub last_line: i32,
}

impl RunGroup {
    fn open(run: Run) -> Self {
        Self {
            orientation: run.orientation,
            material: run.material,
            start: run.start,
            length: run.length,
            first_line: run.line,
            last_line: run.line,
        }
    }

    /// Number of merged lines.
    pub fn line_count(&self) -> u32 {
        self.last_line.abs_diff(self.first_line) + 1
    }

    /// World-space centre as `(x, z)`.
    pub fn world_center(&self) -> DVec2 {
        let along = f64::from(self.start) + f64::from(self.length) / 2.0;
        let across = f64::from(self.first_line + self.last_line + 1) / 2.0;
        match self.orientation {
            Orientation::Horizontal => DVec2::new(along, across),
            Orientation::Vertical => DVec2::new(across, along),
        }
    }

    /// World-space rectangle as `(min, max)` corners.
    fn world_rect(&self) -> (DVec2, DVec2) {
        let along = (
            f64::from(self.start),
            f64::from(self.start) + f64::from(self.length),
        );
        let across = (f64::from(self.first_line), f64::from(self.last_line) + 1.0);
        match self.orientation {
            Orientation::Horizontal => (
                DVec2::new(along.0, across.0),
                DVec2::new(along.1, across.1),
            ),
            Orientation::Vertical => (
                DVec2::new(across.0, along.0),
                DVec2::new(across.1, along.1),
            ),
        }
    }
}

/// Tuning for the labeler.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSettings {
    /// Labels appear only above this zoom.
    pub legibility_zoom: f64,
    /// Below this zoom the stricter `sparse_min_length` applies.
    pub dense_zoom: f64,
    /// Shortest run labelled at dense zoom.
    pub min_length: u32,
    /// Shortest run labelled below dense zoom.
    pub sparse_min_length: u32,
    /// Distance labels keep from the canvas edge while sliding.
    pub edge_margin: f64,
    /// Cells scanned beyond each canvas edge.
    pub scan_padding: i32,
    /// Text height in pixels.
    pub font_px: f64,
    /// Runs longer than this get a dimension line.
    pub dimension_line_min: u32,
    /// Label text colour.
    pub text_color: Rgb,
    /// Dimension line colour.
    pub line_color: Rgb,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self::from(&LabelConfig::default())
    }
}

impl From<&LabelConfig> for LabelSettings {
    fn from(config: &LabelConfig) -> Self {
        Self {
            legibility_zoom: config.legibility_zoom,
            dense_zoom: config.dense_zoom,
            min_length: config.min_length,
            sparse_min_length: config.sparse_min_length,
            edge_margin: config.edge_margin,
            scan_padding: config.scan_padding,
            font_px: config.font_px,
            dimension_line_min: config.dimension_line_min,
            text_color: Rgb(0xffffff),
            line_color: Rgb(0x94a3b8),
        }
    }
}

/// Estimated screen-space box of a label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBox {
    /// Top-left corner.
    pub min: DVec2,
    /// Bottom-right corner.
    pub max: DVec2,
}

impl LabelBox {
    fn centered(center: DVec2, size: DVec2) -> Self {
        Self {
            min: center - size * 0.5,
            max: center + size * 0.5,
        }
    }

    /// Strict overlap; touching boxes do not overlap.
    pub fn overlaps(&self, other: &LabelBox) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// A label that survived placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    /// The group being labelled.
    pub group: RunGroup,
    /// Label text.
    pub text: String,
    /// Screen position of the text centre.
    pub position: DVec2,
    /// Estimated text box.
    pub bounds: LabelBox,
}

/// Result of one labeling pass.
#[derive(Debug, Clone, Default)]
pub struct LabelPass {
    /// Groups that passed the length filter, rows first.
    pub groups: Vec<RunGroup>,
    /// Labels placed, in placement order.
    pub labels: Vec<PlacedLabel>,
    /// Labels dropped on collision.
    pub dropped: usize,
    /// Dimension lines and text.
    pub commands: Vec<DrawCommand>,
}

/// Label layer `elevation` of `world` under `viewport`.
pub fn label_layer(
    world: &VoxelWorld,
    elevation: i32,
    viewport: &Viewport,
    settings: &LabelSettings,
) -> LabelPass {
    let mut pass = LabelPass::default();
    if viewport.zoom() <= settings.legibility_zoom {
        return pass;
    }
    let Some(layer) = world.layer(elevation) else {
        return pass;
    };

    pass.groups = collect_groups(layer, viewport, settings);
    for group in &pass.groups {
        place(
            group,
            viewport,
            settings,
            &mut pass.labels,
            &mut pass.dropped,
            &mut pass.commands,
        );
    }

    tracing::debug!(
        elevation,
        groups = pass.groups.len(),
        placed = pass.labels.len(),
        dropped = pass.dropped,
        "labels placed"
    );
    pass
}

/// Scan the visible part of `layer` (plus padding) for runs and merge them
/// into groups. Horizontal groups come first, then vertical ones.
pub fn collect_groups(
    layer: &Layer,
    viewport: &Viewport,
    settings: &LabelSettings,
) -> Vec<RunGroup> {
    let (min_x, min_z, max_x, max_z) = viewport.visible_cells();
    let pad = settings.scan_padding.max(0);
    let window = Window {
        min_x: min_x.saturating_sub(pad),
        min_z: min_z.saturating_sub(pad),
        max_x: max_x.saturating_add(pad),
        max_z: max_z.saturating_add(pad),
    };
    let min_length = if viewport.zoom() < settings.dense_zoom {
        settings.sparse_min_length
    } else {
        settings.min_length
    };
    let probe = |x: i32, z: i32| {
        layer
            .get(x, z)
            .filter(|material| !viewport.is_hidden(*material))
    };

    let mut groups: Vec<RunGroup> = Vec::new();
    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
        let (lines, along) = match orientation {
            Orientation::Horizontal => (
                (window.min_z, window.max_z),
                (window.min_x, window.max_x),
            ),
            Orientation::Vertical => (
                (window.min_x, window.max_x),
                (window.min_z, window.max_z),
            ),
        };
        let cell = |line: i32, pos: i32| match orientation {
            Orientation::Horizontal => probe(pos, line),
            Orientation::Vertical => probe(line, pos),
        };

        let mut open: FxHashMap<(i32, u32, MaterialId), usize> = FxHashMap::default();
        for line in lines.0..=lines.1 {
            let mut next_open = FxHashMap::default();
            for run in scan_line(&cell, orientation, line, along) {
                if run.length < min_length.max(1) {
                    continue;
                }
                let key = (run.start, run.length, run.material);
                let index = match open.get(&key) {
                    Some(&index) => {
                        groups[index].last_line = line;
                        index
                    }
                    None => {
                        groups.push(RunGroup::open(run));
                        groups.len() - 1
                    }
                };
                next_open.insert(key, index);
            }
            open = next_open;
        }
    }
    groups
}

#[derive(Debug, Clone, Copy)]
struct Window {
    min_x: i32,
    min_z: i32,
    max_x: i32,
    max_z: i32,
}

/// Runs on one line. A run touching the window edge is followed outward so
/// it reports its full length.
///
/// Positions are walked as `i64` so a window pinned at the `i32` limits ends
/// runs there instead of overflowing.
fn scan_line(
    cell: &impl Fn(i32, i32) -> Option<MaterialId>,
    orientation: Orientation,
    line: i32,
    (lo, hi): (i32, i32),
) -> Vec<Run> {
    let at = |pos: i64| i32::try_from(pos).ok().and_then(|pos| cell(line, pos));
    let (lo, hi) = (i64::from(lo), i64::from(hi));
    let mut runs = Vec::new();
    let mut pos = lo;
    while pos <= hi {
        let Some(material) = at(pos) else {
            pos += 1;
            continue;
        };
        let mut start = pos;
        if pos == lo {
            while at(start - 1) == Some(material) {
                start -= 1;
            }
        }
        let mut end = pos;
        while at(end + 1) == Some(material) {
            end += 1;
        }
        // Both ends were read through `at`, so they fit in `i32`.
        runs.push(Run {
            orientation,
            material,
            line,
            start: start as i32,
            length: (end - start + 1) as u32,
        });
        pos = end + 1;
    }
    runs
}

fn place(
    group: &RunGroup,
    viewport: &Viewport,
    settings: &LabelSettings,
    placed: &mut Vec<PlacedLabel>,
    dropped: &mut usize,
    commands: &mut Vec<DrawCommand>,
) {
    let extent = viewport.canvas().extent();
    let (world_min, world_max) = group.world_rect();
    let min = viewport.world_to_screen(world_min.x, world_min.y);
    let max = viewport.world_to_screen(world_max.x, world_max.y);
    if max.x <= 0.0 || min.x >= extent.x || max.y <= 0.0 || min.y >= extent.y {
        return;
    }

    // Axis 0 is the run axis, axis 1 is across it.
    let (along_min, along_max, along_extent, across) = match group.orientation {
        Orientation::Horizontal => (min.x, max.x, extent.x, (min.y + max.y) / 2.0),
        Orientation::Vertical => (min.y, max.y, extent.y, (min.x + max.x) / 2.0),
    };
    let across_extent = match group.orientation {
        Orientation::Horizontal => extent.y,
        Orientation::Vertical => extent.x,
    };
    if across < 0.0 || across > across_extent {
        return;
    }

    let mut along = (along_min + along_max) / 2.0;
    let lo = settings.edge_margin.max(along_min);
    let hi = (along_extent - settings.edge_margin).min(along_max);
    along = if lo <= hi {
        along.clamp(lo, hi)
    } else {
        along.clamp(along_min.max(0.0), along_max.min(along_extent))
    };

    let position = match group.orientation {
        Orientation::Horizontal => DVec2::new(along, across),
        Orientation::Vertical => DVec2::new(across, along),
    };
    let text = group.length.to_string();
    let size = DVec2::new(
        text.len() as f64 * settings.font_px * CHAR_WIDTH_FACTOR + BOX_PADDING,
        settings.font_px + BOX_PADDING,
    );
    let bounds = LabelBox::centered(position, size);
    if placed.iter().any(|label| label.bounds.overlaps(&bounds)) {
        *dropped += 1;
        return;
    }

    if group.length > settings.dimension_line_min {
        let (from, to) = match group.orientation {
            Orientation::Horizontal => (
                DVec2::new(along_min, across),
                DVec2::new(along_max, across),
            ),
            Orientation::Vertical => (
                DVec2::new(across, along_min),
                DVec2::new(across, along_max),
            ),
        };
        dimension_line(from, to, settings.line_color, commands);
    }
    commands.push(DrawCommand::Text {
        text: text.clone(),
        center: position,
        size: settings.font_px,
        color: settings.text_color,
    });
    placed.push(PlacedLabel {
        group: *group,
        text,
        position,
        bounds,
    });
}
