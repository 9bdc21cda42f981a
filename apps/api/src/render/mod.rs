//! Card rendering via pluggable, trait-based backends that turn a `LayoutResult`
//! into an encoded image.
//!
//! Default: `RasterRenderer` (in-process glyph rasterization with `ab_glyph`).
//! Alternative: `BrowserlessRenderer` (HTML page screenshotted by a remote
//! headless browser).
//!
//! `AppState` holds an `Arc<dyn CardRenderer>`, chosen at startup via config.

pub mod browserless;
pub mod encode;
pub mod html;
pub mod raster;

use async_trait::async_trait;
use bytes::Bytes;
use image::Rgb;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::placement::{place_lines, Placement};
use crate::layout::request::{LayoutResult, DEFAULT_LINE_HEIGHT_FACTOR};
use crate::layout::LineMeasure;

pub const DEFAULT_CANVAS_PX: u32 = 1080;
pub const MAX_CANVAS_PX: u32 = 4096;
pub const DEFAULT_QUALITY: u8 = 90;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Font error: {0}")]
    Font(String),

    #[error("Encode error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Render backend error (status {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Invalid render backend URL: {0}")]
    InvalidUrl(String),

    #[error("Render task failed: {0}")]
    Task(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Output format and style
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Webp,
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Webp => "image/webp",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Webp => "webp",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }
}

/// Canvas and colour settings shared by every backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CardStyle {
    pub width: u32,
    pub height: u32,
    pub background: Rgb<u8>,
    pub foreground: Rgb<u8>,
    pub line_height_factor: f32,
    pub format: ImageFormat,
    /// 1–100. Ignored by lossless formats.
    pub quality: u8,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_PX,
            height: DEFAULT_CANVAS_PX,
            background: Rgb([0, 0, 0]),
            foreground: Rgb([255, 255, 255]),
            line_height_factor: DEFAULT_LINE_HEIGHT_FACTOR,
            format: ImageFormat::default(),
            quality: DEFAULT_QUALITY,
        }
    }
}

/// An encoded card, ready for upload or direct download.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Bytes,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A rendering backend. Implement this to swap backends without touching the
/// layout engine, the handlers, or the upload path.
#[async_trait]
pub trait CardRenderer: Send + Sync {
    /// Short backend label, reported in responses and logs.
    fn name(&self) -> &'static str;

    /// Line boxes as this backend draws them. Backends without font metrics of
    /// their own place lines with the layout measure.
    fn placement(
        &self,
        layout: &LayoutResult,
        style: &CardStyle,
        measure: &dyn LineMeasure,
    ) -> Placement {
        place_lines(
            layout,
            style.width,
            style.height,
            style.line_height_factor,
            measure,
        )
    }

    async fn render(
        &self,
        layout: &LayoutResult,
        style: &CardStyle,
    ) -> Result<EncodedImage, RenderError>;
}
