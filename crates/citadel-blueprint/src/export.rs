//! PNG export of a rasterised canvas.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::canvas::PixelCanvas;

/// Errors that can occur while exporting a frame.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create or write the output file.
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),

    /// The PNG encoder rejected the image.
    #[error("failed to encode PNG: {0}")]
    Encoding(#[from] png::EncodingError),
}

/// Encode `canvas` as an 8-bit RGBA PNG into `writer`.
pub fn write_png<W: Write>(canvas: &PixelCanvas, writer: W) -> Result<(), ExportError> {
    let mut encoder = png::Encoder::new(writer, canvas.width, canvas.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&canvas.pixels)?;
    writer.finish()?;
    Ok(())
}

/// Encode `canvas` to a PNG file at `path`, replacing any existing file.
pub fn save_png(canvas: &PixelCanvas, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_png(canvas, BufWriter::new(file))?;
    tracing::info!(
        path = %path.display(),
        width = canvas.width,
        height = canvas.height,
        "frame exported"
    );
    Ok(())
}
