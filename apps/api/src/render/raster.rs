//! In-process rasterizer: draws each placed line with `ab_glyph` outlines onto an
//! `RgbImage`, then encodes it.
//!
//! Lines are centered using the font's real advance widths, so the card stays
//! visually centered even when layout used the average-width estimate. Each line
//! box follows CSS half-leading: the glyph content (ascent − descent) sits in the
//! middle of a `font_size × line_height_factor` box.

use std::path::Path;

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use async_trait::async_trait;
use image::{Rgb, RgbImage};
use tracing::debug;

use crate::layout::measure::GlyphMeasure;
use crate::layout::placement::{place_lines, Placement};
use crate::layout::request::LayoutResult;
use crate::layout::LineMeasure;
use crate::render::encode::encode_image;
use crate::render::{CardRenderer, CardStyle, EncodedImage, RenderError};

/// Reads a font file from disk.
pub fn read_font_file(path: &Path) -> Result<Vec<u8>, RenderError> {
    std::fs::read(path)
        .map_err(|e| RenderError::Font(format!("cannot read {}: {e}", path.display())))
}

/// Parses TrueType/OpenType font data.
pub fn parse_font(data: Vec<u8>) -> Result<FontArc, RenderError> {
    FontArc::try_from_vec(data).map_err(|e| RenderError::Font(e.to_string()))
}

#[derive(Clone)]
pub struct RasterRenderer {
    font: FontArc,
}

impl RasterRenderer {
    pub fn new(font: FontArc) -> Self {
        Self { font }
    }
}

#[async_trait]
impl CardRenderer for RasterRenderer {
    fn name(&self) -> &'static str {
        "raster"
    }

    fn placement(
        &self,
        layout: &LayoutResult,
        style: &CardStyle,
        _measure: &dyn LineMeasure,
    ) -> Placement {
        glyph_placement(&self.font, layout, style)
    }

    async fn render(
        &self,
        layout: &LayoutResult,
        style: &CardStyle,
    ) -> Result<EncodedImage, RenderError> {
        let font = self.font.clone();
        let layout = layout.clone();
        let style = style.clone();

        // Rasterization is CPU-bound; keep it off the async executor.
        tokio::task::spawn_blocking(move || -> Result<EncodedImage, RenderError> {
            let canvas = rasterize(&font, &layout, &style);
            let bytes = encode_image(&canvas, style.format, style.quality)?;
            debug!(
                bytes = bytes.len(),
                format = style.format.extension(),
                "Raster card encoded"
            );
            Ok(EncodedImage {
                bytes,
                format: style.format,
                width: style.width,
                height: style.height,
            })
        })
        .await
        .map_err(|e| RenderError::Task(format!("spawn_blocking failed in rasterizer: {e}")))?
    }
}

/// Line boxes centered by the font's real advance widths.
pub fn glyph_placement(font: &FontArc, layout: &LayoutResult, style: &CardStyle) -> Placement {
    place_lines(
        layout,
        style.width,
        style.height,
        style.line_height_factor,
        &GlyphMeasure::new(font.clone()),
    )
}

/// Draws the layout onto a fresh canvas filled with the background colour.
pub fn rasterize(font: &FontArc, layout: &LayoutResult, style: &CardStyle) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(style.width, style.height, style.background);

    let size = layout.font_size_px as f32;
    let scaled = font.as_scaled(PxScale::from(size));
    let placement = glyph_placement(font, layout, style);

    let content_height = scaled.ascent() - scaled.descent();
    let baseline_offset = (placement.line_height - content_height) / 2.0 + scaled.ascent();

    for line in &placement.lines {
        draw_line(
            &mut canvas,
            font,
            size,
            &line.text,
            line.x,
            line.y + baseline_offset,
            style.foreground,
        );
    }
    canvas
}

fn draw_line(
    canvas: &mut RgbImage,
    font: &FontArc,
    size: f32,
    text: &str,
    x: f32,
    baseline: f32,
    colour: Rgb<u8>,
) {
    let scaled = font.as_scaled(PxScale::from(size));
    let (canvas_w, canvas_h) = canvas.dimensions();
    let mut caret = x;
    let mut previous: Option<GlyphId> = None;

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(size, point(caret, baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue; // whitespace or missing glyph
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x as i64 + i64::from(gx);
            let py = bounds.min.y as i64 + i64::from(gy);
            if px < 0 || py < 0 || px >= i64::from(canvas_w) || py >= i64::from(canvas_h) {
                return;
            }
            blend(canvas.get_pixel_mut(px as u32, py as u32), colour, coverage);
        });
    }
}

/// Mixes `colour` over `pixel` by glyph coverage (0.0 – 1.0).
fn blend(pixel: &mut Rgb<u8>, colour: Rgb<u8>, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0);
    for channel in 0..3 {
        let under = f32::from(pixel.0[channel]);
        let over = f32::from(colour.0[channel]);
        pixel.0[channel] = (under + (over - under) * alpha).round() as u8;
    }
}
