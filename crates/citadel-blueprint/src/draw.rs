//! Display-list primitives emitted by the slice renderer and the labeler.

use citadel_voxel::Rgb;
use glam::DVec2;

/// One drawing operation in screen space (pixels, origin top-left).
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole canvas.
    Clear {
        /// Fill colour.
        color: Rgb,
    },
    /// Straight line segment.
    Line {
        /// Start point.
        from: DVec2,
        /// End point.
        to: DVec2,
        /// Stroke colour.
        color: Rgb,
        /// Stroke width in pixels.
        width: f64,
    },
    /// Axis-aligned filled rectangle.
    FillRect {
        /// Left edge.
        x: i32,
        /// Top edge.
        y: i32,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Fill colour.
        color: Rgb,
    },
    /// Text centred on a point.
    Text {
        /// The string to draw.
        text: String,
        /// Centre of the text box.
        center: DVec2,
        /// Glyph height in pixels.
        size: f64,
        /// Text colour.
        color: Rgb,
    },
}

impl DrawCommand {
    /// Colour of a filled rectangle, `None` for any other command.
    pub fn fill_color(&self) -> Option<Rgb> {
        match self {
            Self::FillRect { color, .. } => Some(*color),
            _ => None,
        }
    }

    /// Text content, `None` for non-text commands.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }
}

/// A line with an arrowhead at each end, as used for dimension lines.
pub(crate) fn dimension_line(
    from: DVec2,
    to: DVec2,
    color: Rgb,
    commands: &mut Vec<DrawCommand>,
) {
    let span = to - from;
    let length = span.length();
    if length <= f64::EPSILON {
        return;
    }
    let dir = span / length;
    let normal = DVec2::new(-dir.y, dir.x);
    let head = (length / 4.0).min(6.0);

    commands.push(DrawCommand::Line {
        from,
        to,
        color,
        width: 1.0,
    });
    for (tip, inward) in [(from, dir), (to, -dir)] {
        let base = tip + inward * head;
        for side in [normal, -normal] {
            commands.push(DrawCommand::Line {
                from: tip,
                to: base + side * head * 0.5,
                color,
                width: 1.0,
            });
        }
    }
}
