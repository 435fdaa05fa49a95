//! Greedy word wrap over a static metric table.
//!
//! `\n` forces a break. A word wider than the wrap width is never split; it
//! gets a line to itself and that line reports its full width.

use crate::fitting::WrappedText;
use crate::layout::font_metrics::FontMetricTable;

/// Wraps `text` at `wrap_width` pixels and returns per-line pixel widths.
///
/// Empty text (or an empty paragraph) still occupies one zero-width line.
pub fn wrap_lines(
    text: &str,
    metrics: &FontMetricTable,
    font_size: f32,
    wrap_width: f32,
) -> WrappedText {
    let space_w = metrics.space_width * font_size;
    let mut line_widths: Vec<f32> = Vec::new();

    for paragraph in text.split('\n') {
        let mut current_width = 0.0_f32;
        let mut first_on_line = true;

        for word in paragraph.split_whitespace() {
            let word_w = metrics.measure_str(word) * font_size;

            if first_on_line {
                current_width = word_w;
                first_on_line = false;
            } else if current_width + space_w + word_w > wrap_width {
                // Current line is full: push its width and start a new line.
                line_widths.push(current_width);
                current_width = word_w;
            } else {
                current_width += space_w + word_w;
            }
        }
        line_widths.push(current_width);
    }

    WrappedText {
        line_count: line_widths.len() as u32,
        line_widths,
    }
}
