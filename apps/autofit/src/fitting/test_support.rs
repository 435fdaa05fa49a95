//! Deterministic fixtures shared by the fitting tests.

use crate::fitting::oracle::{FontMetrics, TextLayoutOracle, WrappedText};

/// Monospace oracle: every character (spaces included) is `advance_em` wide.
///
/// Vertical metrics are binary fractions of the size so block heights stay exact in `f32`.
#[derive(Debug, Clone, Copy)]
pub struct MonoOracle {
    pub advance_em: f32,
}

impl Default for MonoOracle {
    fn default() -> Self {
        Self { advance_em: 0.5 }
    }
}

impl MonoOracle {
    fn width_of(&self, chars: usize, font_size: f32) -> f32 {
        chars as f32 * self.advance_em * font_size
    }
}

impl TextLayoutOracle for MonoOracle {
    fn measure_flat(&self, text: &str, font_size: f32) -> f32 {
        self.width_of(text.chars().count(), font_size)
    }

    fn wrap(&self, text: &str, font_size: f32, wrap_width: f32) -> WrappedText {
        let mut line_widths = Vec::new();
        for paragraph in text.split('\n') {
            let mut current: Option<usize> = None;
            for word in paragraph.split_whitespace() {
                let len = word.chars().count();
                current = match current {
                    Some(chars) if self.width_of(chars + 1 + len, font_size) <= wrap_width => {
                        Some(chars + 1 + len)
                    }
                    Some(chars) => {
                        line_widths.push(self.width_of(chars, font_size));
                        Some(len)
                    }
                    None => Some(len),
                };
            }
            line_widths.push(self.width_of(current.unwrap_or(0), font_size));
        }
        WrappedText {
            line_count: line_widths.len() as u32,
            line_widths,
        }
    }

    fn metrics(&self, font_size: f32) -> FontMetrics {
        FontMetrics {
            top: -1.0 * font_size,
            ascent: -0.75 * font_size,
            descent: 0.25 * font_size,
            bottom: 0.375 * font_size,
            leading: 0.125 * font_size,
        }
    }
}
