//! Modifier transform pipeline
//!
//! Applies a [`ModifierSet`] to source image bytes in a fixed canonical
//! order, independent of the order tokens appeared in the URL:
//!
//! ```text
//! decode (+ JPEG color normalization)
//!   -> trim
//!   -> crop
//!   -> fit/resize
//!   -> grayscale
//!   -> encode (original format family, at quality)
//! ```
//!
//! Every step receives the output of the previous one. The output always
//! stays in the source's format family: a jpg stays a jpg, a png stays a
//! png, a gif stays a gif.

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use imagery_core::{AppError, Crop, FitMode, ModifierSet};
use std::io::Cursor;

const DEFAULT_QUALITY: u8 = 75;

/// Background used for `lpad` padding when no `bg` modifier is present.
pub const DEFAULT_BACKGROUND: &str = "cccccc";

/// Output format family. Decoded sources outside the families we can
/// re-encode (e.g. bmp, tiff) are normalized to PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatFamily {
    Jpeg,
    Png,
    Gif,
    WebP,
}

impl FormatFamily {
    pub fn from_format(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => FormatFamily::Jpeg,
            ImageFormat::Gif => FormatFamily::Gif,
            ImageFormat::WebP => FormatFamily::WebP,
            _ => FormatFamily::Png,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            FormatFamily::Jpeg => "image/jpeg",
            FormatFamily::Png => "image/png",
            FormatFamily::Gif => "image/gif",
            FormatFamily::WebP => "image/webp",
        }
    }
}

/// A transformed, encoded image.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Run the full transform pipeline over encoded source bytes.
pub fn render(bytes: &[u8], modifiers: &ModifierSet) -> Result<RenderedImage, AppError> {
    let (mut img, family) = decode(bytes)?;

    if let Some(tolerance) = modifiers.trim {
        img = trim_borders(&img, tolerance);
    }

    if let Some(crop) = modifiers.crop {
        img = apply_crop(&img, crop)?;
    }

    img = apply_fit(&img, modifiers);

    if modifiers.grayscale {
        img = img.grayscale();
    }

    encode(&img, family, modifiers.quality.unwrap_or(DEFAULT_QUALITY))
}

/// Decode source bytes, normalizing JPEG sources to 8-bit RGB. CMYK JPEGs
/// come out of the decoder as RGB already; embedded metadata and profiles
/// are dropped because only pixel data survives the re-encode.
pub fn decode(bytes: &[u8]) -> Result<(DynamicImage, FormatFamily), AppError> {
    let format = image::guess_format(bytes)
        .map_err(|e| AppError::UnsupportedImageFormat(e.to_string()))?;
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| AppError::UnsupportedImageFormat(e.to_string()))?;

    let family = FormatFamily::from_format(format);
    let img = match family {
        FormatFamily::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    };

    Ok((img, family))
}

/// Encode to the format family at the given quality (clamped; ignored for
/// lossless formats).
pub fn encode(
    img: &DynamicImage,
    family: FormatFamily,
    quality: u8,
) -> Result<RenderedImage, AppError> {
    let mut out = Cursor::new(Vec::new());
    match family {
        FormatFamily::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
            rgb.write_with_encoder(encoder)
                .map_err(|e| AppError::Internal(format!("JPEG encode failed: {}", e)))?;
        }
        FormatFamily::Png => {
            img.write_to(&mut out, ImageFormat::Png)
                .map_err(|e| AppError::Internal(format!("PNG encode failed: {}", e)))?;
        }
        FormatFamily::Gif => {
            // The GIF encoder wants RGBA input
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            rgba.write_to(&mut out, ImageFormat::Gif)
                .map_err(|e| AppError::Internal(format!("GIF encode failed: {}", e)))?;
        }
        FormatFamily::WebP => {
            // Lossless encoder; quality does not apply
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            rgba.write_to(&mut out, ImageFormat::WebP)
                .map_err(|e| AppError::Internal(format!("WebP encode failed: {}", e)))?;
        }
    }
    Ok(RenderedImage {
        bytes: out.into_inner(),
        mime_type: family.mime_type().to_string(),
    })
}

/// Trim borders whose color stays within `tolerance` percent of the
/// top-left pixel. If the whole image matches, it is returned unchanged.
fn trim_borders(img: &DynamicImage, tolerance: u8) -> DynamicImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return img.clone();
    }

    let base = *rgba.get_pixel(0, 0);
    let threshold = (tolerance.clamp(1, 99) as i32 * 255) / 100;
    let is_content = |p: &Rgba<u8>| {
        p.0[..3]
            .iter()
            .zip(&base.0[..3])
            .any(|(&c, &b)| (c as i32 - b as i32).abs() > threshold)
    };

    let (mut min_x, mut min_y) = (width, height);
    let (mut max_x, mut max_y) = (0u32, 0u32);
    let mut found = false;
    for (x, y, pixel) in rgba.enumerate_pixels() {
        if is_content(pixel) {
            found = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if !found {
        return img.clone();
    }

    img.crop_imm(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}

/// Inset-crop. A uniform inset shrinks every side; per-side insets are
/// `[top, right, bottom, left]`. A non-positive resulting dimension is a
/// geometry error.
fn apply_crop(img: &DynamicImage, crop: Crop) -> Result<DynamicImage, AppError> {
    let (width, height) = img.dimensions();
    let (top, right, bottom, left) = match crop {
        Crop::Uniform(n) => (n, n, n, n),
        Crop::PerSide {
            top,
            right,
            bottom,
            left,
        } => (top, right, bottom, left),
    };

    let new_width = width
        .checked_sub(left)
        .and_then(|w| w.checked_sub(right))
        .filter(|&w| w > 0)
        .ok_or_else(|| {
            AppError::InvalidCropGeometry(format!(
                "Horizontal insets {}+{} exhaust width {}",
                left, right, width
            ))
        })?;
    let new_height = height
        .checked_sub(top)
        .and_then(|h| h.checked_sub(bottom))
        .filter(|&h| h > 0)
        .ok_or_else(|| {
            AppError::InvalidCropGeometry(format!(
                "Vertical insets {}+{} exhaust height {}",
                top, bottom, height
            ))
        })?;

    Ok(img.crop_imm(left, top, new_width, new_height))
}

/// Fit/resize step. The mode comes from the `fit` modifier; a `size`
/// without `fit` means plain exact resize. A missing target axis defaults
/// to the source's existing value on that axis.
fn apply_fit(img: &DynamicImage, modifiers: &ModifierSet) -> DynamicImage {
    let (orig_width, orig_height) = img.dimensions();
    let (target_width, target_height) = match modifiers.size {
        Some((w, h)) => (w.max(1), h.max(1)),
        None => (orig_width, orig_height),
    };

    let fit = match (modifiers.fit, modifiers.size) {
        (Some(fit), _) => fit,
        (None, Some(_)) => FitMode::Resize,
        (None, None) => return img.clone(),
    };

    match fit {
        FitMode::Resize => resize_exact(img, target_width, target_height),
        FitMode::Scale => {
            let (w, h) = scaled_within(orig_width, orig_height, target_width, target_height, true);
            resize_exact(img, w, h)
        }
        FitMode::Limit => {
            let (w, h) = scaled_within(orig_width, orig_height, target_width, target_height, false);
            if (w, h) == (orig_width, orig_height) {
                img.clone()
            } else {
                resize_exact(img, w, h)
            }
        }
        FitMode::PadLimit => {
            let (w, h) = scaled_within(orig_width, orig_height, target_width, target_height, false);
            let inner = if (w, h) == (orig_width, orig_height) {
                img.clone()
            } else {
                resize_exact(img, w, h)
            };

            let bg = parse_hex_rgb(modifiers.bgcolor.as_deref().unwrap_or(DEFAULT_BACKGROUND));
            let canvas = RgbaImage::from_pixel(target_width, target_height, bg);
            let mut canvas = DynamicImage::ImageRgba8(canvas);
            let x_offset = (target_width.saturating_sub(w)) / 2;
            let y_offset = (target_height.saturating_sub(h)) / 2;
            imageops::overlay(&mut canvas, &inner, x_offset as i64, y_offset as i64);
            canvas
        }
    }
}

/// Aspect-preserving dimensions fitting within the target box. With
/// `upscale` false the scale factor is capped at 1.0 (down-only).
fn scaled_within(
    orig_width: u32,
    orig_height: u32,
    target_width: u32,
    target_height: u32,
    upscale: bool,
) -> (u32, u32) {
    let scale_w = target_width as f32 / orig_width as f32;
    let scale_h = target_height as f32 / orig_height as f32;
    let mut scale = scale_w.min(scale_h);
    if !upscale {
        scale = scale.min(1.0);
    }
    if (scale - 1.0).abs() < f32::EPSILON {
        return (orig_width, orig_height);
    }
    (
        ((orig_width as f32 * scale).round() as u32).max(1),
        ((orig_height as f32 * scale).round() as u32).max(1),
    )
}

fn resize_exact(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (orig_width, orig_height) = img.dimensions();
    let filter = select_filter(orig_width, orig_height, width, height);
    img.resize_exact(width, height, filter)
}

/// Select a resampling filter based on how aggressive the downscale is:
/// heavy reductions tolerate cheaper filters.
fn select_filter(
    orig_width: u32,
    orig_height: u32,
    new_width: u32,
    new_height: u32,
) -> imageops::FilterType {
    let width_ratio = orig_width as f32 / new_width.max(1) as f32;
    let height_ratio = orig_height as f32 / new_height.max(1) as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        imageops::FilterType::Triangle
    } else if max_ratio > 1.5 {
        imageops::FilterType::CatmullRom
    } else {
        imageops::FilterType::Lanczos3
    }
}

/// Parse a 6-hex-digit color. Invalid input falls back to the default
/// padding gray; token validation upstream makes that unreachable for
/// URL-sourced values.
pub fn parse_hex_rgb(hex: &str) -> Rgba<u8> {
    let parse = |range| u8::from_str_radix(hex.get(range).unwrap_or("cc"), 16).unwrap_or(0xcc);
    if hex.len() != 6 {
        return Rgba([0xcc, 0xcc, 0xcc, 255]);
    }
    Rgba([parse(0..2), parse(2..4), parse(4..6), 255])
}
