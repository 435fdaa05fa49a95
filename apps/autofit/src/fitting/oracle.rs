//! The measurement seam between the fit search and whatever lays out text.
//!
//! The search never shapes or wraps text itself. It asks a `TextLayoutOracle`
//! for flat widths, wrapped line counts, and vertical metrics at a candidate size.

use serde::{Deserialize, Serialize};

/// Vertical font metrics at one font size, in pixels.
///
/// Baseline convention is y-down: extents above the baseline (`top`, `ascent`)
/// are negative, extents below (`descent`, `bottom`) are positive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FontMetrics {
    pub top: f32,
    pub ascent: f32,
    pub descent: f32,
    pub bottom: f32,
    pub leading: f32,
}

impl FontMetrics {
    /// Height of a single line box: `descent - ascent`.
    pub fn line_extent(&self) -> f32 {
        self.descent - self.ascent
    }

    /// Vertical advance contributed by every line after the first.
    pub fn additional_line_extent(&self) -> f32 {
        self.leading + self.descent - self.top
    }
}

/// Result of wrapping text at a given width.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WrappedText {
    pub line_count: u32,
    /// One entry per wrapped line, in pixels.
    pub line_widths: Vec<f32>,
}

impl WrappedText {
    pub fn widest_line(&self) -> f32 {
        self.line_widths.iter().copied().fold(0.0_f32, f32::max)
    }
}

/// Deterministic text measurement.
///
/// Implementations must return identical results for identical inputs; the
/// binary search relies on it to terminate reproducibly.
pub trait TextLayoutOracle {
    /// Width of `text` laid out on one line, without wrapping.
    fn measure_flat(&self, text: &str, font_size: f32) -> f32;

    /// Wrap `text` at `wrap_width` and report the resulting lines.
    fn wrap(&self, text: &str, font_size: f32, wrap_width: f32) -> WrappedText;

    fn metrics(&self, font_size: f32) -> FontMetrics;
}

impl<O: TextLayoutOracle + ?Sized> TextLayoutOracle for &O {
    fn measure_flat(&self, text: &str, font_size: f32) -> f32 {
        (**self).measure_flat(text, font_size)
    }

    fn wrap(&self, text: &str, font_size: f32, wrap_width: f32) -> WrappedText {
        (**self).wrap(text, font_size, wrap_width)
    }

    fn metrics(&self, font_size: f32) -> FontMetrics {
        (**self).metrics(font_size)
    }
}
