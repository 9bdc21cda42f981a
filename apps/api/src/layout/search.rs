//! Font-size search. Picks the largest font size whose wrapped text stays
//! within the line budget.
//!
//! # Algorithm
//! Start at `max_font_size_px`, wrap, and return the first size whose line count
//! is `<= max_lines`. Otherwise step down by `FONT_SIZE_STEP` and retry. When the
//! next size would fall below `min_font_size_px` the search gives up and returns
//! `min_font_size_px`: the text may overflow the budget, but the size is clamped.
//!
//! At most `(max − min) / 2 + 1` wrapper evaluations, each linear in word count.

use tracing::{debug, warn};

use crate::layout::measure::{AverageCharWidth, LineMeasure};
use crate::layout::wrap::wrap_text_with;

/// Decrement between candidate font sizes, in px.
pub const FONT_SIZE_STEP: u32 = 2;

/// Finds the font size using the average-character-width estimate.
pub fn find_optimal_font_size(
    text: &str,
    max_width_px: u32,
    max_lines: usize,
    min_font_size_px: u32,
    max_font_size_px: u32,
) -> u32 {
    find_optimal_font_size_with(
        &AverageCharWidth,
        text,
        max_width_px,
        max_lines,
        min_font_size_px,
        max_font_size_px,
    )
}

/// Finds the font size with an arbitrary width rule.
pub fn find_optimal_font_size_with<M: LineMeasure + ?Sized>(
    measure: &M,
    text: &str,
    max_width_px: u32,
    max_lines: usize,
    min_font_size_px: u32,
    max_font_size_px: u32,
) -> u32 {
    search_font_size(min_font_size_px, max_font_size_px, max_lines, |font_size| {
        wrap_text_with(measure, text, max_width_px, font_size).len()
    })
}

/// Core descending search. `line_count` wraps the text at a candidate size.
pub(crate) fn search_font_size<F>(
    min_font_size_px: u32,
    max_font_size_px: u32,
    max_lines: usize,
    mut line_count: F,
) -> u32
where
    F: FnMut(u32) -> usize,
{
    let mut font_size = max_font_size_px;

    while font_size >= min_font_size_px {
        let lines = line_count(font_size);
        if lines <= max_lines {
            debug!(font_size, lines, "Font-size search: fit found");
            return font_size;
        }
        match font_size.checked_sub(FONT_SIZE_STEP) {
            Some(next) => font_size = next,
            None => break,
        }
    }

    warn!(
        min_font_size = min_font_size_px,
        max_lines, "Font-size search: text too long, clamping to minimum font size"
    );
    min_font_size_px
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::wrap::wrap_text;

    #[test]
    fn test_short_text_returns_max_font_size() {
        assert_eq!(find_optimal_font_size("hello", 700, 7, 40, 120), 120);
    }

    #[test]
    fn test_pathological_text_returns_min_font_size() {
        let text = "word ".repeat(500);
        assert_eq!(find_optimal_font_size(&text, 700, 7, 40, 120), 40);
    }

    #[test]
    fn test_result_always_within_range() {
        let long = "lengthy ".repeat(80);
        let texts = [
            "",
            "short",
            "a medium length sentence that needs a couple of lines to fit",
            long.as_str(),
        ];
        for text in texts {
            let size = find_optimal_font_size(text, 700, 7, 40, 120);
            assert!((40..=120).contains(&size), "{size} out of range for {text:?}");
        }
    }

    #[test]
    fn test_returns_largest_fitting_size_on_search_grid() {
        let text = "อยากกลับไป \"เป็นเด็ก\" แล้วรีเซ็ททางเดินชีวิต ของตัวเองใหม่ \
                    และเริ่มต้นทุกอย่างอีกครั้ง ด้วยหัวใจที่เบาสบาย และความฝันที่ยังไม่เคยจางหาย";
        for max_lines in 1..=7 {
            let size = find_optimal_font_size(text, 700, max_lines, 40, 120);
            let fitting: Vec<u32> = (40..=120)
                .rev()
                .step_by(FONT_SIZE_STEP as usize)
                .filter(|&s| wrap_text(text, 700, s).len() <= max_lines)
                .collect();
            match fitting.first() {
                Some(&largest) => assert_eq!(size, largest, "max_lines {max_lines}"),
                None => assert_eq!(size, 40, "max_lines {max_lines}"),
            }
        }
    }

    #[test]
    fn test_fit_found_respects_line_budget() {
        let text = "the quick brown fox jumps over the lazy dog again and again";
        let size = find_optimal_font_size(text, 700, 3, 40, 120);
        assert!(size > 40);
        assert!(wrap_text(text, 700, size).len() <= 3);
        // The next size up on the grid must not fit.
        if size < 120 {
            assert!(wrap_text(text, 700, size + FONT_SIZE_STEP).len() > 3);
        }
    }

    #[test]
    fn test_evaluation_count_is_bounded() {
        let mut calls = 0u32;
        let size = search_font_size(40, 120, 7, |_| {
            calls += 1;
            usize::MAX
        });
        assert_eq!(size, 40);
        assert_eq!(calls, (120 - 40) / FONT_SIZE_STEP + 1);
    }

    #[test]
    fn test_widest_accepted_range_stays_cheap() {
        use crate::layout::request::{LayoutRequest, MAX_FONT_SIZE_PX};

        let request = LayoutRequest::builder("a b c d e f g h")
            .max_font_size_px(MAX_FONT_SIZE_PX)
            .max_lines(7)
            .build()
            .unwrap();
        let mut calls = 0u32;
        let size = search_font_size(
            request.min_font_size_px(),
            request.max_font_size_px(),
            request.max_lines(),
            |_| {
                calls += 1;
                8
            },
        );
        assert_eq!(size, 40);
        assert_eq!(calls, (MAX_FONT_SIZE_PX - 40) / FONT_SIZE_STEP + 1);
    }

    #[test]
    fn test_odd_range_never_evaluates_below_min() {
        let mut seen = Vec::new();
        let size = search_font_size(41, 50, 1, |s| {
            seen.push(s);
            2
        });
        assert_eq!(size, 41);
        assert_eq!(seen, vec![50, 48, 46, 44, 42]);
    }

    #[test]
    fn test_min_font_size_of_one_does_not_underflow() {
        let mut calls = 0u32;
        let size = search_font_size(1, 5, 0, |_| {
            calls += 1;
            1
        });
        assert_eq!(size, 1);
        assert_eq!(calls, 3); // 5, 3, 1
    }

    #[test]
    fn test_stops_at_first_fit() {
        let mut seen = Vec::new();
        let size = search_font_size(40, 120, 4, |s| {
            seen.push(s);
            if s <= 100 { 4 } else { 5 }
        });
        assert_eq!(size, 100);
        assert_eq!(seen.last(), Some(&100));
        assert_eq!(seen.len(), 11);
    }
}
