//! HTML card page for browser-based rendering.
//!
//! The page is a fixed-size flex container that centers a block of lines, one
//! `<div class="line">` per wrapped line. The card font is embedded as a base64
//! `@font-face` when available; otherwise the page falls back to emoji-capable
//! system fonts.

use image::Rgb;

use crate::layout::request::LayoutResult;
use crate::render::CardStyle;

const FONT_FAMILY: &str = "CardFont";
const FALLBACK_FAMILIES: &str =
    "'Apple Color Emoji', 'Segoe UI Emoji', 'Noto Color Emoji', Arial, sans-serif";

pub fn build_card_html(
    layout: &LayoutResult,
    style: &CardStyle,
    font_base64: Option<&str>,
) -> String {
    let font_face = font_base64
        .map(|data| {
            format!(
                "@font-face {{ font-family: '{FONT_FAMILY}'; \
                 src: url('data:font/truetype;base64,{data}') format('truetype'); \
                 font-weight: bold; }}"
            )
        })
        .unwrap_or_default();

    let font_stack = if font_base64.is_some() {
        format!("'{FONT_FAMILY}', {FALLBACK_FAMILIES}")
    } else {
        FALLBACK_FAMILIES.to_string()
    };

    let lines: String = layout
        .lines
        .iter()
        .map(|line| format!("<div class=\"line\">{}</div>", escape_html(line)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<style>
{font_face}
body {{
    margin: 0;
    padding: 0;
    width: {width}px;
    height: {height}px;
    background-color: {background};
    display: flex;
    align-items: center;
    justify-content: center;
    font-family: {font_stack};
}}
.text-container {{
    text-align: center;
    color: {foreground};
    font-size: {font_size}px;
    font-weight: bold;
    line-height: {line_height};
}}
.line {{
    display: block;
    margin: 0;
    white-space: nowrap;
}}
</style>
</head>
<body>
<div class="text-container">{lines}</div>
</body>
</html>"#,
        width = style.width,
        height = style.height,
        background = hex_colour(style.background),
        foreground = hex_colour(style.foreground),
        font_size = layout.font_size_px,
        line_height = style.line_height_factor,
    )
}

fn hex_colour(colour: Rgb<u8>) -> String {
    let [r, g, b] = colour.0;
    format!("#{r:02X}{g:02X}{b:02X}")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(lines: &[&str]) -> LayoutResult {
        LayoutResult {
            font_size_px: 96,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn test_one_div_per_line_in_order() {
        let html = build_card_html(&layout(&["first", "second"]), &CardStyle::default(), None);
        let first = html.find("<div class=\"line\">first</div>").unwrap();
        let second = html.find("<div class=\"line\">second</div>").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_canvas_and_font_size_are_applied() {
        let style = CardStyle {
            width: 800,
            height: 600,
            ..CardStyle::default()
        };
        let html = build_card_html(&layout(&["x"]), &style, None);
        assert!(html.contains("width: 800px;"));
        assert!(html.contains("height: 600px;"));
        assert!(html.contains("font-size: 96px;"));
        assert!(html.contains("line-height: 1.2;"));
        assert!(html.contains("background-color: #000000;"));
        assert!(html.contains("color: #FFFFFF;"));
    }

    #[test]
    fn test_lines_are_escaped() {
        let html = build_card_html(
            &layout(&["<script>\"&\"</script>"]),
            &CardStyle::default(),
            None,
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;&quot;&amp;&quot;&lt;/script&gt;"));
    }

    #[test]
    fn test_embedded_font_face_when_available() {
        let html = build_card_html(&layout(&["x"]), &CardStyle::default(), Some("AAEC"));
        assert!(html.contains("data:font/truetype;base64,AAEC"));
        assert!(html.contains("font-family: 'CardFont', 'Apple Color Emoji'"));
    }

    #[test]
    fn test_no_font_face_without_font() {
        let html = build_card_html(&layout(&["x"]), &CardStyle::default(), None);
        assert!(!html.contains("@font-face"));
        assert!(html.contains("font-family: 'Apple Color Emoji'"));
    }

    #[test]
    fn test_hex_colour_is_uppercase_padded() {
        assert_eq!(hex_colour(Rgb([1, 171, 255])), "#01ABFF");
    }
}
