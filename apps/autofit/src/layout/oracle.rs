use crate::fitting::{FontMetrics, TextLayoutOracle, WrappedText};
use crate::layout::font_metrics::{get_metrics, FontFamily, FontMetricTable};
use crate::layout::wrap::wrap_lines;

/// `TextLayoutOracle` backed by the static metric tables.
#[derive(Clone, Copy)]
pub struct MetricTableOracle {
    table: &'static FontMetricTable,
}

impl MetricTableOracle {
    pub fn new(font: FontFamily) -> Self {
        Self {
            table: get_metrics(font),
        }
    }

    pub fn font(&self) -> FontFamily {
        self.table.font
    }
}

impl std::fmt::Debug for MetricTableOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricTableOracle")
            .field("font", &self.table.font)
            .finish()
    }
}

impl TextLayoutOracle for MetricTableOracle {
    fn measure_flat(&self, text: &str, font_size: f32) -> f32 {
        self.table.measure_str(text) * font_size
    }

    fn wrap(&self, text: &str, font_size: f32, wrap_width: f32) -> WrappedText {
        wrap_lines(text, self.table, font_size, wrap_width)
    }

    fn metrics(&self, font_size: f32) -> FontMetrics {
        let v = &self.table.vertical;
        FontMetrics {
            top: v.top * font_size,
            ascent: v.ascent * font_size,
            descent: v.descent * font_size,
            bottom: v.bottom * font_size,
            leading: v.leading * font_size,
        }
    }
}
