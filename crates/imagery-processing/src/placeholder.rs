//! Placeholder synthesis
//!
//! Generates a flat-colored PNG carrying its own dimensions as centered
//! text, e.g. "400x300". Served when a request addresses the placeholder
//! marker filename, or for missing files when that mode is enabled.

use crate::font;
use crate::transform::{encode, parse_hex_rgb, FormatFamily, RenderedImage};
use ab_glyph::PxScale;
use image::{DynamicImage, Rgba, RgbaImage};
use imagery_core::AppError;
use imageproc::drawing::{draw_text_mut, text_size};

pub struct Placeholder;

impl Placeholder {
    /// Render a `width`x`height` placeholder. `bgcolor` is a 6-hex-digit
    /// color; the default matches the lpad padding gray.
    pub fn create(
        width: u32,
        height: u32,
        bgcolor: Option<&str>,
    ) -> Result<RenderedImage, AppError> {
        let width = width.max(1);
        let height = height.max(1);
        let bg = parse_hex_rgb(bgcolor.unwrap_or(crate::transform::DEFAULT_BACKGROUND));

        let mut canvas = RgbaImage::from_pixel(width, height, bg);
        let label = format!("{}x{}", width, height);

        // Scale the label to roughly 90% of the width; the label is at
        // most 9 monospace glyphs wide.
        let px = ((0.9 * width as f32) / 7.0).ceil().max(4.0);
        let scale = PxScale::from(px);
        let font = font::monospace()?;
        let (text_width, text_height) = text_size(scale, &font, &label);
        let x = (width as i32 - text_width as i32) / 2;
        let y = (height as i32 - text_height as i32) / 2;
        draw_text_mut(&mut canvas, Rgba([0, 0, 0, 255]), x, y, scale, &font, &label);

        encode(&DynamicImage::ImageRgba8(canvas), FormatFamily::Png, 100)
    }
}
