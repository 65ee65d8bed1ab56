//! Fallback-store marking
//!
//! Stamps images served from the fallback store so they are visually
//! distinguishable from primary-store content. The mark is a translucent
//! band along the bottom edge carrying the word "fallback".

use crate::font;
use crate::transform::{decode, encode, RenderedImage};
use ab_glyph::PxScale;
use image::{GenericImageView, Rgba};
use imagery_core::AppError;
use imageproc::drawing::{draw_text_mut, text_size};

const LABEL: &str = "fallback";

/// Stamp the mark onto encoded image bytes, preserving the format family.
pub fn mark_fallback(bytes: &[u8]) -> Result<RenderedImage, AppError> {
    let (img, family) = decode(bytes)?;
    let (width, height) = img.dimensions();
    let mut canvas = img.to_rgba8();

    // band never exceeds the image itself
    let band_height = (height / 8).clamp(10, 48).min(height);
    let band_top = height - band_height;
    for y in band_top..height {
        for x in 0..width {
            let p = canvas.get_pixel_mut(x, y);
            // blend 60% black over the existing pixel
            for c in &mut p.0[..3] {
                *c = (*c as u16 * 2 / 5) as u8;
            }
        }
    }

    let px = (band_height as f32 * 0.7).max(6.0);
    let scale = PxScale::from(px);
    let font = font::monospace()?;
    let (text_width, text_height) = text_size(scale, &font, LABEL);
    let x = (width as i32 - text_width as i32) / 2;
    let y = band_top as i32 + (band_height as i32 - text_height as i32) / 2;
    draw_text_mut(
        &mut canvas,
        Rgba([255, 255, 255, 255]),
        x,
        y,
        scale,
        &font,
        LABEL,
    );

    encode(&image::DynamicImage::ImageRgba8(canvas), family, 90)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([200, 200, 200, 255]),
        ));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_mark_preserves_dimensions_and_family() {
        let marked = mark_fallback(&png(120, 80)).unwrap();
        assert_eq!(marked.mime_type, "image/png");
        let img = image::load_from_memory(&marked.bytes).unwrap();
        assert_eq!(img.dimensions(), (120, 80));
    }

    #[test]
    fn test_mark_darkens_bottom_band() {
        let marked = mark_fallback(&png(100, 100)).unwrap();
        let rgba = image::load_from_memory(&marked.bytes).unwrap().to_rgba8();
        // top edge untouched, bottom band darkened
        assert_eq!(rgba.get_pixel(50, 0).0[0], 200);
        assert!(rgba.get_pixel(2, 95).0[0] < 120);
    }

    #[test]
    fn test_mark_image_shorter_than_band() {
        let marked = mark_fallback(&png(20, 8)).unwrap();
        let img = image::load_from_memory(&marked.bytes).unwrap();
        assert_eq!(img.dimensions(), (20, 8));
        // whole image is band
        let rgba = img.to_rgba8();
        let darkened = rgba.pixels().filter(|p| p.0[0] < 120).count();
        assert!(darkened > 0);
    }

    #[test]
    fn test_mark_tiny_image() {
        let marked = mark_fallback(&png(1, 1)).unwrap();
        let img = image::load_from_memory(&marked.bytes).unwrap();
        assert_eq!(img.dimensions(), (1, 1));
    }

    #[test]
    fn test_mark_rejects_garbage() {
        assert!(mark_fallback(b"garbage").is_err());
    }
}
