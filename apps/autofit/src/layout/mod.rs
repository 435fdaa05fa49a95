// Built-in text layout: static per-family metric tables and a greedy wrapper,
// exposed to the fit search through `MetricTableOracle`.

pub mod font_metrics;
pub mod oracle;
pub mod wrap;

pub use font_metrics::FontFamily;
pub use oracle::MetricTableOracle;
