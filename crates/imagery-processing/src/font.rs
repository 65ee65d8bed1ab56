//! Bundled monospace font for text overlays.

use ab_glyph::FontRef;
use imagery_core::AppError;

static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Parse the bundled font. Parsing is cheap (table lookup only), so callers
/// just grab a fresh reference per overlay.
pub(crate) fn monospace() -> Result<FontRef<'static>, AppError> {
    FontRef::try_from_slice(FONT_BYTES)
        .map_err(|e| AppError::Internal(format!("Bundled font failed to parse: {}", e)))
}
