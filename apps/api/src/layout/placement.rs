//! Places wrapped lines on the canvas: each line horizontally centered, the
//! whole block vertically centered, one line box of
//! `font_size × line_height_factor` per line.

use serde::Serialize;

use crate::layout::measure::LineMeasure;
use crate::layout::request::LayoutResult;

/// One line positioned on the canvas. `y` is the top of the line box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

/// Line boxes for a layout, plus the metrics they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub line_height: f32,
    pub block_height: f32,
    pub lines: Vec<PlacedLine>,
}

pub fn place_lines(
    layout: &LayoutResult,
    canvas_width: u32,
    canvas_height: u32,
    line_height_factor: f32,
    measure: &dyn LineMeasure,
) -> Placement {
    let line_height = layout.font_size_px as f32 * line_height_factor;
    let block_height = line_height * layout.lines.len() as f32;
    let top = (canvas_height as f32 - block_height) / 2.0;

    let lines = layout
        .lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let width = measure.measure_line(text, layout.font_size_px) as f32;
            PlacedLine {
                text: text.clone(),
                // May go negative for an oversized single word; the line is clipped
                // symmetrically by the canvas.
                x: (canvas_width as f32 - width) / 2.0,
                y: top + i as f32 * line_height,
                width,
            }
        })
        .collect();

    Placement {
        line_height,
        block_height,
        lines,
    }
}
