//! Software rasteriser for display lists, stored as row-major RGBA pixels.

use citadel_voxel::Rgb;
use glam::DVec2;

use crate::draw::DrawCommand;
use crate::font::{self, GLYPH_HEIGHT, GLYPH_WIDTH};

/// An RGBA8 image that can execute [`DrawCommand`]s.
#[derive(Clone, Debug)]
pub struct PixelCanvas {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data in row-major RGBA format. Length = `width * height * 4`.
    pub pixels: Vec<u8>,
}

impl PixelCanvas {
    /// Create an opaque black canvas.
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0; width as usize * height as usize * 4];
        for alpha in pixels.iter_mut().skip(3).step_by(4) {
            *alpha = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Set one pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[idx] = color.r();
        self.pixels[idx + 1] = color.g();
        self.pixels[idx + 2] = color.b();
        self.pixels[idx + 3] = 255;
    }

    /// Colour of one pixel, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Some(Rgb::new(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
        ))
    }

    /// Count the number of unique colors (ignoring alpha) in the image.
    pub fn unique_color_count(&self) -> usize {
        let mut colors = std::collections::HashSet::new();
        for chunk in self.pixels.chunks_exact(4) {
            colors.insert((chunk[0], chunk[1], chunk[2]));
        }
        colors.len()
    }

    /// Number of pixels exactly matching `color`.
    pub fn count_color(&self, color: Rgb) -> usize {
        self.pixels
            .chunks_exact(4)
            .filter(|p| (p[0], p[1], p[2]) == (color.r(), color.g(), color.b()))
            .count()
    }

    /// Run a display list in order.
    pub fn execute(&mut self, commands: &[DrawCommand]) {
        for command in commands {
            match command {
                DrawCommand::Clear { color } => self.clear(*color),
                DrawCommand::Line {
                    from,
                    to,
                    color,
                    width,
                } => self.draw_line(*from, *to, *color, *width),
                DrawCommand::FillRect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => self.fill_rect(
                    i64::from(*x),
                    i64::from(*y),
                    i64::from(*width),
                    i64::from(*height),
                    *color,
                ),
                DrawCommand::Text {
                    text,
                    center,
                    size,
                    color,
                } => self.draw_text(text, *center, *size, *color),
            }
        }
    }

    /// Fill the whole canvas.
    pub fn clear(&mut self, color: Rgb) {
        for p in self.pixels.chunks_exact_mut(4) {
            p.copy_from_slice(&[color.r(), color.g(), color.b(), 255]);
        }
    }

    /// Fill a rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: i64, height: i64, color: Rgb) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width).min(i64::from(self.width));
        let y1 = (y + height).min(i64::from(self.height));
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Bresenham line, thickened to `width` pixels by stamping squares.
    pub fn draw_line(&mut self, from: DVec2, to: DVec2, color: Rgb, width: f64) {
        let stroke = (width.round() as i64).max(1);
        let grow = stroke as f64;
        let Some((from, to)) = clip_segment(
            from,
            to,
            DVec2::splat(-grow),
            DVec2::new(f64::from(self.width), f64::from(self.height)) + grow,
        ) else {
            return;
        };

        let (mut x, mut y) = (from.x.round() as i64, from.y.round() as i64);
        let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let half = (stroke - 1) / 2;

        loop {
            self.fill_rect(x - half, y - half, stroke, stroke, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw `text` centred on `center` with the built-in digit font.
    ///
    /// Glyph cells are scaled to the nearest whole pixel size not exceeding
    /// `size`. Characters without a glyph advance like a blank.
    pub fn draw_text(&mut self, text: &str, center: DVec2, size: f64, color: Rgb) {
        let scale = ((size / f64::from(GLYPH_HEIGHT)).floor() as i64).max(1);
        let count = text.chars().count() as i64;
        if count == 0 {
            return;
        }
        let advance = (i64::from(GLYPH_WIDTH) + 1) * scale;
        let width = count * advance - scale;
        let height = i64::from(GLYPH_HEIGHT) * scale;
        let left = (center.x - width as f64 / 2.0).round() as i64;
        let top = (center.y - height as f64 / 2.0).round() as i64;

        for (i, c) in text.chars().enumerate() {
            let Some(glyph) = font::glyph(c) else {
                continue;
            };
            let origin = left + i as i64 * advance;
            for row in 0..GLYPH_HEIGHT {
                for col in 0..GLYPH_WIDTH {
                    if font::lit(glyph, col, row) {
                        self.fill_rect(
                            origin + i64::from(col) * scale,
                            top + i64::from(row) * scale,
                            scale,
                            scale,
                            color,
                        );
                    }
                }
            }
        }
    }
}

/// Liang-Barsky clip of a segment against an axis-aligned box.
fn clip_segment(from: DVec2, to: DVec2, min: DVec2, max: DVec2) -> Option<(DVec2, DVec2)> {
    let delta = to - from;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-delta.x, from.x - min.x),
        (delta.x, max.x - from.x),
        (-delta.y, from.y - min.y),
        (delta.y, max.y - from.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((from + delta * t0, from + delta * t1))
}
