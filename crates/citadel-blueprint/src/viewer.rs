//! Headless viewer session: one world, one viewport, commands in, frames out.

use citadel_config::Config;
use citadel_structures::{StructureConfig, StructureVariant, generate_with};
use citadel_voxel::{MaterialId, MaterialPalette, VoxelWorld};
use glam::DVec2;

use crate::draw::DrawCommand;
use crate::labels::{LabelSettings, label_layer};
use crate::slice::{SliceStyle, TallyRow, render_layer};
use crate::viewport::{CanvasSize, LayerBounds, Viewport};

/// Where the session is in its generate/view cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerStatus {
    /// Nothing generated yet.
    Idle,
    /// Generation requested, world not yet installed.
    Generating(StructureVariant),
    /// A world is installed.
    Ready(StructureVariant),
}

/// Proof that [`BlueprintViewer::begin_generation`] ran; redeem it with
/// [`BlueprintViewer::complete_generation`].
#[derive(Debug)]
#[must_use = "generation does not run until the ticket is completed"]
pub struct GenerationTicket {
    variant: StructureVariant,
}

impl GenerationTicket {
    /// The variant being generated.
    pub fn variant(&self) -> StructureVariant {
        self.variant
    }
}

/// A user request against the viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCommand {
    /// Drag by a screen-space delta.
    Pan {
        /// Horizontal delta in pixels.
        dx: f64,
        /// Vertical delta in pixels.
        dy: f64,
    },
    /// Wheel zoom by `factor`, anchored at `cursor`.
    ZoomAt {
        /// Zoom multiplier.
        factor: f64,
        /// Anchor in screen space.
        cursor: DVec2,
    },
    /// One zoom step in.
    ZoomIn,
    /// One zoom step out.
    ZoomOut,
    /// Select an elevation.
    SetLayer(i32),
    /// Move the selected elevation.
    StepLayer(i32),
    /// Hide or show a material.
    ToggleMaterial(MaterialId),
    /// Show every material.
    ShowAll,
    /// Default zoom, origin centred.
    ResetView,
    /// Canvas size changed.
    Resize {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
}

/// Everything a front end needs to paint one frame.
#[derive(Debug, Clone, Default)]
pub struct RenderedFrame {
    /// Slice commands followed by label commands.
    pub commands: Vec<DrawCommand>,
    /// Material list for the selected layer.
    pub tally_rows: Vec<TallyRow>,
    /// Voxels in the selected layer.
    pub total: usize,
    /// Selected elevation.
    pub layer: i32,
    /// Labels drawn.
    pub labels_placed: usize,
    /// Labels dropped on collision.
    pub labels_dropped: usize,
    /// `true` while a generation is pending.
    pub busy: bool,
}

/// Viewer session state.
pub struct BlueprintViewer {
    palette: MaterialPalette,
    style: SliceStyle,
    labels: LabelSettings,
    structures: StructureConfig,
    layer_margin: i32,
    viewport: Viewport,
    world: Option<VoxelWorld>,
    status: ViewerStatus,
}

impl BlueprintViewer {
    /// Creates an idle session sized by the viewer config.
    pub fn new(config: &Config) -> Self {
        let canvas = CanvasSize::new(config.viewer.canvas_width, config.viewer.canvas_height);
        Self {
            palette: MaterialPalette::standard(),
            style: SliceStyle::from_config(&config.viewer),
            labels: LabelSettings::from(&config.labels),
            structures: StructureConfig::from(config),
            layer_margin: config.viewer.layer_margin,
            viewport: Viewport::new(canvas, &config.viewer),
            world: None,
            status: ViewerStatus::Idle,
        }
    }

    /// Mark the session busy and drop the previous world.
    ///
    /// The caller may render a loading frame before completing the ticket.
    pub fn begin_generation(&mut self, variant: StructureVariant) -> GenerationTicket {
        self.world = None;
        self.status = ViewerStatus::Generating(variant);
        tracing::debug!(variant = variant.name(), "generation requested");
        GenerationTicket { variant }
    }

    /// Run the generator, install the world, and clamp the layer to it.
    pub fn complete_generation(&mut self, ticket: GenerationTicket) {
        let world = generate_with(ticket.variant, &self.structures);
        self.viewport
            .set_bounds(LayerBounds::from_world(&world, self.layer_margin));
        self.world = Some(world);
        self.status = ViewerStatus::Ready(ticket.variant);
    }

    /// Both generation phases back to back.
    pub fn generate(&mut self, variant: StructureVariant) {
        let ticket = self.begin_generation(variant);
        self.complete_generation(ticket);
    }

    /// Apply one command.
    pub fn apply(&mut self, command: ViewCommand) {
        let vp = &mut self.viewport;
        match command {
            ViewCommand::Pan { dx, dy } => vp.pan(dx, dy),
            ViewCommand::ZoomAt { factor, cursor } => vp.zoom_at(factor, cursor),
            ViewCommand::ZoomIn => vp.zoom_in(),
            ViewCommand::ZoomOut => vp.zoom_out(),
            ViewCommand::SetLayer(y) => {
                vp.set_layer(y);
            }
            ViewCommand::StepLayer(delta) => {
                vp.step_layer(delta);
            }
            ViewCommand::ToggleMaterial(material) => {
                vp.toggle_material(material);
            }
            ViewCommand::ShowAll => vp.show_all(),
            ViewCommand::ResetView => {
                let canvas = vp.canvas();
                vp.reset(canvas);
            }
            ViewCommand::Resize { width, height } => vp.resize(CanvasSize::new(width, height)),
        }
    }

    /// Render the selected layer with labels.
    pub fn render(&self) -> RenderedFrame {
        let layer = self.viewport.layer();
        let busy = matches!(self.status, ViewerStatus::Generating(_));
        let empty = VoxelWorld::new();
        let world = self.world.as_ref().unwrap_or(&empty);

        let slice = render_layer(world, layer, &self.viewport, &self.palette, &self.style);
        let labels = label_layer(world, layer, &self.viewport, &self.labels);

        let mut commands = slice.commands;
        commands.extend(labels.commands);
        RenderedFrame {
            commands,
            tally_rows: slice.tally.rows(&self.palette, &self.viewport),
            total: slice.tally.total(),
            layer,
            labels_placed: labels.labels.len(),
            labels_dropped: labels.dropped,
            busy,
        }
    }

    /// World cell under a screen position.
    pub fn hover(&self, px: f64, py: f64) -> (i32, i32) {
        self.viewport.screen_to_world(px, py)
    }

    /// Current view state.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable view state, for setup that has no matching command.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Installed world, if any.
    pub fn world(&self) -> Option<&VoxelWorld> {
        self.world.as_ref()
    }

    /// Palette used for colours and names.
    pub fn palette(&self) -> &MaterialPalette {
        &self.palette
    }

    /// Session status.
    pub fn status(&self) -> ViewerStatus {
        self.status
    }
}
