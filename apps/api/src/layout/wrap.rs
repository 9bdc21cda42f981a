//! Greedy text wrapper.
//!
//! Words are whitespace-delimited tokens. Each word is appended to the current
//! line (space-separated) while the result still fits; otherwise the current
//! line is flushed and the word starts a new one. A single word wider than the
//! line is emitted on its own line rather than dropped or split.

use crate::layout::measure::{AverageCharWidth, LineMeasure};

/// Wraps `text` using the average-character-width estimate.
///
/// An empty (or whitespace-only) text yields no lines.
pub fn wrap_text(text: &str, max_width_px: u32, font_size_px: u32) -> Vec<String> {
    wrap_text_with(&AverageCharWidth, text, max_width_px, font_size_px)
}

/// Wraps `text` with an arbitrary width rule.
pub fn wrap_text_with<M: LineMeasure + ?Sized>(
    measure: &M,
    text: &str,
    max_width_px: u32,
    font_size_px: u32,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            if measure.fits(word, max_width_px, font_size_px) {
                current.push_str(word);
            } else {
                // Oversized word on an empty line: emit it whole.
                lines.push(word.to_string());
            }
            continue;
        }

        let candidate = format!("{current} {word}");
        if measure.fits(&candidate, max_width_px, font_size_px) {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::measure::max_chars_per_line;

    fn words_of(lines: &[String]) -> Vec<String> {
        lines
            .iter()
            .flat_map(|l| l.split(' ').map(str::to_string))
            .collect()
    }

    #[test]
    fn test_each_word_alone_when_pairs_do_not_fit() {
        // avg width 30 → 3 chars per line; "one two" is 7 chars.
        assert_eq!(
            wrap_text("one two three", 100, 50),
            vec!["one", "two", "three"]
        );
    }

    #[test]
    fn test_oversized_single_word_is_its_own_line() {
        // 5 chars per line at 50px: 150 / 30 = 5.
        assert_eq!(max_chars_per_line(150, 50), 5);
        let word = "abcdefghijklmnopqrst";
        assert_eq!(word.len(), 20);
        assert_eq!(wrap_text(word, 150, 50), vec![word]);
    }

    #[test]
    fn test_oversized_word_between_short_words() {
        // 5 chars per line.
        let lines = wrap_text("hi extraordinary ok go", 150, 50);
        assert_eq!(lines, vec!["hi", "extraordinary", "ok go"]);
    }

    #[test]
    fn test_empty_text_yields_no_lines() {
        assert!(wrap_text("", 700, 100).is_empty());
        assert!(wrap_text("   \n\t ", 700, 100).is_empty());
    }

    #[test]
    fn test_packs_greedily_up_to_limit() {
        // 700 / 60 = 11.67 → 11 chars per line at 100px.
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 700, 100);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
        for line in &lines {
            assert!(line.chars().count() <= 11);
        }
    }

    #[test]
    fn test_line_exactly_at_limit_is_kept() {
        // 11 chars per line: "hello world" is exactly 11.
        assert_eq!(wrap_text("hello world", 700, 100), vec!["hello world"]);
    }

    #[test]
    fn test_newlines_and_repeated_spaces_are_word_boundaries() {
        let lines = wrap_text("alpha\nbeta   gamma\tdelta", 10_000, 10);
        assert_eq!(lines, vec!["alpha beta gamma delta"]);
    }

    #[test]
    fn test_wrap_is_deterministic() {
        let text = "อยากกลับไป \"เป็นเด็ก\" แล้วรีเซ็ททางเดินชีวิต ของตัวเองใหม่";
        assert_eq!(wrap_text(text, 700, 80), wrap_text(text, 700, 80));
    }

    #[test]
    fn test_words_preserved_in_order() {
        let text = "lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
                    eiusmod tempor incididunt ut labore et dolore magna aliqua";
        for font_size in [40, 58, 76, 100, 120] {
            let lines = wrap_text(text, 700, font_size);
            let expected: Vec<String> = text.split_whitespace().map(str::to_string).collect();
            assert_eq!(words_of(&lines), expected, "font size {font_size}");
        }
    }

    #[test]
    fn test_width_bound_holds_except_single_word_lines() {
        let text = "a bb ccc dddd eeeee ffffff ggggggg hhhhhhhhhhhhhhhhhhh i jj";
        let measure = AverageCharWidth;
        for font_size in (40..=120).step_by(2) {
            for line in wrap_text(text, 500, font_size) {
                let single_word = !line.contains(' ');
                assert!(
                    single_word || measure.fits(&line, 500, font_size),
                    "line {line:?} overflows at {font_size}px"
                );
            }
        }
    }

    #[test]
    fn test_no_line_is_empty() {
        let lines = wrap_text("  x  y  z  ", 30, 50);
        assert!(lines.iter().all(|l| !l.is_empty()));
        assert_eq!(lines, vec!["x", "y", "z"]);
    }
}
