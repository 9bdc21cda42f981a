// Text-fitting and layout engine.
// Implements: greedy text wrapper, descending font-size search, line placement.
// Pure and synchronous; the card pipeline runs it inside tokio::task::spawn_blocking.

pub mod measure;
pub mod placement;
pub mod request;
pub mod search;
pub mod wrap;

use tracing::info;

pub use measure::{AverageCharWidth, GlyphMeasure, LineMeasure};
pub use placement::Placement;
pub use request::{LayoutError, LayoutRequest, LayoutResult};

use search::find_optimal_font_size_with;
use wrap::wrap_text_with;

/// Derives the font size and wrapped lines for a request.
///
/// With `auto_size` the size comes from the font-size search; otherwise the
/// explicit size is used unmodified and the text is wrapped once.
pub fn compute_layout(measure: &dyn LineMeasure, request: &LayoutRequest) -> LayoutResult {
    let font_size_px = if request.auto_size() {
        find_optimal_font_size_with(
            measure,
            request.text(),
            request.max_width_px(),
            request.max_lines(),
            request.min_font_size_px(),
            request.max_font_size_px(),
        )
    } else {
        request.explicit_font_size_px()
    };

    let lines = wrap_text_with(measure, request.text(), request.max_width_px(), font_size_px);

    info!(
        font_size = font_size_px,
        lines = lines.len(),
        auto_size = request.auto_size(),
        "Layout computed"
    );

    LayoutResult {
        font_size_px,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_size_short_text_uses_max_size() {
        let request = LayoutRequest::builder("hello world").build().unwrap();
        let result = compute_layout(&AverageCharWidth, &request);
        assert_eq!(result.font_size_px, 120);
        assert_eq!(result.lines, vec!["hello", "world"]);
    }

    #[test]
    fn test_explicit_size_is_used_unmodified() {
        let request = LayoutRequest::builder("the quick brown fox jumps over the lazy dog")
            .auto_size(false)
            .font_size_px(Some(100))
            .build()
            .unwrap();
        let result = compute_layout(&AverageCharWidth, &request);
        assert_eq!(result.font_size_px, 100);
        assert_eq!(result.lines.len(), 5);
    }

    #[test]
    fn test_explicit_size_defaults_to_100() {
        let request = LayoutRequest::builder("hi").auto_size(false).build().unwrap();
        assert_eq!(compute_layout(&AverageCharWidth, &request).font_size_px, 100);
    }

    #[test]
    fn test_explicit_size_may_exceed_line_budget() {
        let request = LayoutRequest::builder("a b c d e f g h i j")
            .auto_size(false)
            .font_size_px(Some(700))
            .max_lines(2)
            .build()
            .unwrap();
        let result = compute_layout(&AverageCharWidth, &request);
        assert_eq!(result.lines.len(), 10);
    }

    #[test]
    fn test_line_budget_honoured_above_minimum() {
        let text = "อยากกลับไป \"เป็นเด็ก\" แล้วรีเซ็ททางเดินชีวิต ของตัวเองใหม่";
        let request = LayoutRequest::builder(text).max_lines(2).build().unwrap();
        let result = compute_layout(&AverageCharWidth, &request);
        assert!(result.font_size_px == 40 || result.lines.len() <= 2);
    }

    #[test]
    fn test_degrades_to_min_for_long_text() {
        let text = "word ".repeat(500);
        let request = LayoutRequest::builder(text).build().unwrap();
        let result = compute_layout(&AverageCharWidth, &request);
        assert_eq!(result.font_size_px, 40);
        assert!(result.lines.len() > 7);
    }

    #[test]
    fn test_empty_text_yields_empty_layout() {
        let request = LayoutRequest::builder("").build().unwrap();
        let result = compute_layout(&AverageCharWidth, &request);
        assert!(result.is_empty());
        assert_eq!(result.font_size_px, 120);
    }
}
