//! The host widget boundary, plus an in-memory widget for services and tests.

use serde::{Deserialize, Serialize};

use crate::fitting::configuration::LineLimit;
use crate::fitting::units::DisplayDensity;

/// Interior size of a widget after padding, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentBox {
    pub width: f32,
    pub height: f32,
}

/// Widget padding, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    pub const fn uniform(value: f32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}

/// The text surface an `AutofitController` drives.
pub trait HostWidget {
    /// Interior dimensions after padding. Zero or negative while not laid out.
    fn content_box(&self) -> ContentBox;

    /// Text as displayed, after any transformation such as single-line flattening.
    fn current_text(&self) -> String;

    /// Font size currently rendered, in device pixels.
    fn font_size(&self) -> f32;

    /// Sets the rendered font size, in device pixels.
    fn apply_font_size(&mut self, size: f32);

    fn is_single_line_mode(&self) -> bool;

    /// Line limit configured on the widget itself; used as the initial `max_lines`.
    fn max_lines(&self) -> LineLimit {
        if self.is_single_line_mode() {
            LineLimit::SINGLE
        } else {
            LineLimit::Unbounded
        }
    }

    fn density(&self) -> DisplayDensity {
        DisplayDensity::default()
    }

    /// Start or stop delivering text and bounds change notifications.
    fn set_watching(&mut self, _watching: bool) {}
}

// ────────────────────────────────────────────────────────────────────────────
// HeadlessWidget
// ────────────────────────────────────────────────────────────────────────────

/// A widget with no rendering: it stores what a real toolkit view would.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessWidget {
    text: String,
    width: f32,
    height: f32,
    padding: Padding,
    max_lines: LineLimit,
    single_line: bool,
    density: DisplayDensity,
    font_size: f32,
    apply_count: u32,
    watching: bool,
}

impl HeadlessWidget {
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            width: 0.0,
            height: 0.0,
            padding: Padding::default(),
            max_lines: LineLimit::Unbounded,
            single_line: false,
            density: DisplayDensity::default(),
            font_size,
            apply_count: 0,
            watching: false,
        }
    }

    pub fn with_bounds(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_max_lines(mut self, max_lines: LineLimit) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub fn with_single_line(mut self, single_line: bool) -> Self {
        self.single_line = single_line;
        self
    }

    pub fn with_density(mut self, density: DisplayDensity) -> Self {
        self.density = density;
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// How many times a size has been applied since creation.
    pub fn apply_count(&self) -> u32 {
        self.apply_count
    }

    pub fn is_watching(&self) -> bool {
        self.watching
    }
}

impl HostWidget for HeadlessWidget {
    fn content_box(&self) -> ContentBox {
        ContentBox {
            width: self.width - self.padding.left - self.padding.right,
            height: self.height - self.padding.top - self.padding.bottom,
        }
    }

    fn current_text(&self) -> String {
        if self.single_line {
            self.text.replace(['\n', '\r'], " ")
        } else {
            self.text.clone()
        }
    }

    fn font_size(&self) -> f32 {
        self.font_size
    }

    fn apply_font_size(&mut self, size: f32) {
        self.font_size = size;
        self.apply_count += 1;
    }

    fn is_single_line_mode(&self) -> bool {
        self.single_line
    }

    fn max_lines(&self) -> LineLimit {
        if self.single_line {
            LineLimit::SINGLE
        } else {
            self.max_lines
        }
    }

    fn density(&self) -> DisplayDensity {
        self.density
    }

    fn set_watching(&mut self, watching: bool) {
        self.watching = watching;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_box_subtracts_padding() {
        let w = HeadlessWidget::new("x", 12.0)
            .with_bounds(200.0, 100.0)
            .with_padding(Padding {
                left: 10.0,
                top: 5.0,
                right: 20.0,
                bottom: 15.0,
            });
        assert_eq!(
            w.content_box(),
            ContentBox {
                width: 170.0,
                height: 80.0
            }
        );
    }

    #[test]
    fn test_padding_larger_than_bounds_yields_negative_box() {
        let w = HeadlessWidget::new("x", 12.0)
            .with_bounds(10.0, 10.0)
            .with_padding(Padding::uniform(8.0));
        assert!(w.content_box().width < 0.0);
    }

    #[test]
    fn test_single_line_flattens_breaks_and_pins_max_lines() {
        let w = HeadlessWidget::new("a\nb", 12.0)
            .with_max_lines(LineLimit::from_raw(4))
            .with_single_line(true);
        assert_eq!(w.current_text(), "a b");
        assert_eq!(w.max_lines(), LineLimit::SINGLE);
    }

    #[test]
    fn test_apply_records_size_and_count() {
        let mut w = HeadlessWidget::new("x", 12.0);
        w.apply_font_size(9.5);
        w.apply_font_size(9.5);
        assert_eq!(w.font_size(), 9.5);
        assert_eq!(w.apply_count(), 2);
    }
}
