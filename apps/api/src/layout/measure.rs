//! Line-width measurement strategies for the layout engine.
//!
//! The engine's contract is the average-character-width estimate: every glyph is
//! assumed to be `font_size × 0.6` px wide, and a line fits when its character
//! count is at most `floor(max_width / avg_char_width)`. That rule needs no font
//! file and gives the same layout whichever backend rasterizes the card.
//!
//! `GlyphMeasure` sums real advance widths (plus kerning) from a TrueType font
//! for deployments that want wrapping to track the rasterized output exactly.
//! Both plug into the wrapper and the font-size search through `LineMeasure`.

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont};

/// Fraction of the font size used as the estimated width of one character.
pub const AVG_CHAR_WIDTH_FACTOR: f64 = 0.6;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Measures rendered line widths. Implement this to swap the width rule without
/// touching the wrapper or the font-size search.
///
/// Carried in `AppState` as `Arc<dyn LineMeasure>`.
pub trait LineMeasure: Send + Sync {
    /// Width of `line` in pixels at `font_size_px`.
    fn measure_line(&self, line: &str, font_size_px: u32) -> f64;

    /// Whether `line` fits inside `max_width_px` at `font_size_px`.
    fn fits(&self, line: &str, max_width_px: u32, font_size_px: u32) -> bool {
        self.measure_line(line, font_size_px) <= f64::from(max_width_px)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Average character width (default)
// ────────────────────────────────────────────────────────────────────────────

/// Backend-independent estimate: every character is `font_size × 0.6` px wide.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageCharWidth;

/// Estimated pixel width of a single character at `font_size_px`.
pub fn avg_char_width(font_size_px: u32) -> f64 {
    f64::from(font_size_px) * AVG_CHAR_WIDTH_FACTOR
}

/// Maximum number of characters per line: `floor(max_width / avg_char_width)`.
///
/// A zero font size has no width, so every line fits.
pub fn max_chars_per_line(max_width_px: u32, font_size_px: u32) -> usize {
    let avg = avg_char_width(font_size_px);
    if avg <= 0.0 {
        return usize::MAX;
    }
    (f64::from(max_width_px) / avg).floor() as usize
}

impl LineMeasure for AverageCharWidth {
    fn measure_line(&self, line: &str, font_size_px: u32) -> f64 {
        line.chars().count() as f64 * avg_char_width(font_size_px)
    }

    // Compares character counts so the result is exactly the floor rule,
    // independent of float rounding in `measure_line`.
    fn fits(&self, line: &str, max_width_px: u32, font_size_px: u32) -> bool {
        line.chars().count() <= max_chars_per_line(max_width_px, font_size_px)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Glyph metrics
// ────────────────────────────────────────────────────────────────────────────

/// Glyph-accurate measurement backed by a loaded TrueType/OpenType font.
#[derive(Clone)]
pub struct GlyphMeasure {
    font: FontArc,
}

impl GlyphMeasure {
    pub fn new(font: FontArc) -> Self {
        Self { font }
    }
}

impl LineMeasure for GlyphMeasure {
    fn measure_line(&self, line: &str, font_size_px: u32) -> f64 {
        f64::from(advance_width(&self.font, line, font_size_px as f32))
    }
}

/// Sum of horizontal advances and pair kerning for `line` at `size_px`.
pub fn advance_width(font: &FontArc, line: &str, size_px: f32) -> f32 {
    let scaled = font.as_scaled(PxScale::from(size_px));
    let mut width = 0.0_f32;
    let mut previous: Option<GlyphId> = None;

    for c in line.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
