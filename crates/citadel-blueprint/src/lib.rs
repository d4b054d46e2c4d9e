//! Slice-by-slice blueprint viewer for generated voxel structures.
//!
//! The viewer projects one elevation layer at a time onto a 2D canvas under a
//! pan/zoom [`Viewport`], tallies materials per layer, and annotates runs of
//! identical voxels with dimension labels once the zoom makes them legible.
//! Output is a display list of [`DrawCommand`]s; [`PixelCanvas`] rasterises it
//! and [`export`] writes it out as PNG.

mod canvas;
mod draw;
mod font;
mod labels;
mod slice;
mod viewer;
mod viewport;

pub mod export;

pub use export::{ExportError, save_png, write_png};

pub use canvas::PixelCanvas;
pub use draw::DrawCommand;
pub use labels::{
    LabelBox, LabelPass, LabelSettings, Orientation, PlacedLabel, Run, RunGroup, collect_groups,
    label_layer,
};
pub use slice::{LayerTally, SliceFrame, SliceStyle, TallyRow, render_layer};
pub use viewer::{BlueprintViewer, GenerationTicket, RenderedFrame, ViewCommand, ViewerStatus};
pub use viewport::{CanvasSize, LayerBounds, Viewport};
