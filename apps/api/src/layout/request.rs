//! Layout request and result types.
//!
//! `LayoutRequest` is validated once at construction and immutable afterwards;
//! every numeric constraint the engine relies on is checked in `build()`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_WIDTH_PX: u32 = 700;
pub const DEFAULT_LINE_HEIGHT_FACTOR: f32 = 1.2;
pub const DEFAULT_MAX_LINES: usize = 7;
pub const DEFAULT_MIN_FONT_SIZE_PX: u32 = 40;
pub const DEFAULT_MAX_FONT_SIZE_PX: u32 = 120;
/// Font size used when automatic sizing is off and no explicit size was given.
pub const DEFAULT_FONT_SIZE_PX: u32 = 100;
/// Upper bound for every font size in a request. Bounds both the number of
/// search steps and the glyph bitmaps the rasterizer allocates.
pub const MAX_FONT_SIZE_PX: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("{field} must be a positive integer")]
    NonPositive { field: &'static str },

    #[error("minimum font size ({min}px) exceeds maximum font size ({max}px)")]
    InvalidFontSizeRange { min: u32, max: u32 },

    #[error("{field} must be at most {max}px, got {value}px")]
    FontSizeTooLarge {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("line height must be a positive number, got {0}")]
    InvalidLineHeight(f32),
}

// ────────────────────────────────────────────────────────────────────────────
// Request
// ────────────────────────────────────────────────────────────────────────────

/// Text plus layout constraints for one card.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRequest {
    text: String,
    max_width_px: u32,
    line_height_factor: f32,
    auto_size: bool,
    font_size_px: Option<u32>,
    max_lines: usize,
    min_font_size_px: u32,
    max_font_size_px: u32,
}

impl LayoutRequest {
    /// Starts a request for `text` with every constraint at its default.
    pub fn builder(text: impl Into<String>) -> LayoutRequestBuilder {
        LayoutRequestBuilder {
            text: text.into(),
            max_width_px: DEFAULT_MAX_WIDTH_PX,
            line_height_factor: DEFAULT_LINE_HEIGHT_FACTOR,
            auto_size: true,
            font_size_px: None,
            max_lines: DEFAULT_MAX_LINES,
            min_font_size_px: DEFAULT_MIN_FONT_SIZE_PX,
            max_font_size_px: DEFAULT_MAX_FONT_SIZE_PX,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn max_width_px(&self) -> u32 {
        self.max_width_px
    }

    pub fn line_height_factor(&self) -> f32 {
        self.line_height_factor
    }

    pub fn auto_size(&self) -> bool {
        self.auto_size
    }

    /// The size used when `auto_size` is off.
    pub fn explicit_font_size_px(&self) -> u32 {
        self.font_size_px.unwrap_or(DEFAULT_FONT_SIZE_PX)
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn min_font_size_px(&self) -> u32 {
        self.min_font_size_px
    }

    pub fn max_font_size_px(&self) -> u32 {
        self.max_font_size_px
    }
}

#[derive(Debug, Clone)]
pub struct LayoutRequestBuilder {
    text: String,
    max_width_px: u32,
    line_height_factor: f32,
    auto_size: bool,
    font_size_px: Option<u32>,
    max_lines: usize,
    min_font_size_px: u32,
    max_font_size_px: u32,
}

impl LayoutRequestBuilder {
    pub fn max_width_px(mut self, value: u32) -> Self {
        self.max_width_px = value;
        self
    }

    pub fn line_height_factor(mut self, value: f32) -> Self {
        self.line_height_factor = value;
        self
    }

    pub fn auto_size(mut self, value: bool) -> Self {
        self.auto_size = value;
        self
    }

    pub fn font_size_px(mut self, value: Option<u32>) -> Self {
        self.font_size_px = value;
        self
    }

    pub fn max_lines(mut self, value: usize) -> Self {
        self.max_lines = value;
        self
    }

    pub fn min_font_size_px(mut self, value: u32) -> Self {
        self.min_font_size_px = value;
        self
    }

    pub fn max_font_size_px(mut self, value: u32) -> Self {
        self.max_font_size_px = value;
        self
    }

    pub fn build(self) -> Result<LayoutRequest, LayoutError> {
        if self.max_width_px == 0 {
            return Err(LayoutError::NonPositive {
                field: "max_width_px",
            });
        }
        if self.max_lines == 0 {
            return Err(LayoutError::NonPositive { field: "max_lines" });
        }
        if self.min_font_size_px == 0 {
            return Err(LayoutError::NonPositive {
                field: "min_font_size_px",
            });
        }
        if self.max_font_size_px == 0 {
            return Err(LayoutError::NonPositive {
                field: "max_font_size_px",
            });
        }
        for (field, value) in [
            ("min_font_size_px", Some(self.min_font_size_px)),
            ("max_font_size_px", Some(self.max_font_size_px)),
            ("font_size_px", self.font_size_px),
        ] {
            if let Some(value) = value.filter(|v| *v > MAX_FONT_SIZE_PX) {
                return Err(LayoutError::FontSizeTooLarge {
                    field,
                    value,
                    max: MAX_FONT_SIZE_PX,
                });
            }
        }
        if self.min_font_size_px > self.max_font_size_px {
            return Err(LayoutError::InvalidFontSizeRange {
                min: self.min_font_size_px,
                max: self.max_font_size_px,
            });
        }
        if self.font_size_px == Some(0) {
            return Err(LayoutError::NonPositive {
                field: "font_size_px",
            });
        }
        if !self.line_height_factor.is_finite() || self.line_height_factor <= 0.0 {
            return Err(LayoutError::InvalidLineHeight(self.line_height_factor));
        }

        Ok(LayoutRequest {
            text: self.text,
            max_width_px: self.max_width_px,
            line_height_factor: self.line_height_factor,
            auto_size: self.auto_size,
            font_size_px: self.font_size_px,
            max_lines: self.max_lines,
            min_font_size_px: self.min_font_size_px,
            max_font_size_px: self.max_font_size_px,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Result
// ────────────────────────────────────────────────────────────────────────────

/// Final font size and wrapped lines, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub font_size_px: u32,
    pub lines: Vec<String>,
}

impl LayoutResult {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
