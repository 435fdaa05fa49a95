//! Fit-size search: binary search over font size against width and height constraints.
//!
//! # Search policy
//! - Each step measures at `mid = (low + high) / 2` through the `TextLayoutOracle`.
//! - Too many lines → shrink to `[low, mid]`; too few → grow to `[mid, high]`.
//! - Exactly `max_lines` → compare the widest line (width search) or the block
//!   height (height search) with the target; an exact match returns `mid`.
//! - Once the interval is narrower than `precision` the search returns `low`,
//!   never `mid`, so floating error cannot push the result over the constraint.
//!
//! # Known limitation
//! Both searches assume line count and block height never increase as the size
//! shrinks. Text with hard line breaks can break that locally; it is not special-cased.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::fitting::configuration::{FitConfiguration, FitDirection};
use crate::fitting::oracle::{FontMetrics, TextLayoutOracle};

// ────────────────────────────────────────────────────────────────────────────
// Inputs and outputs
// ────────────────────────────────────────────────────────────────────────────

/// Everything the search needs to know about the widget for one recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct FitTarget {
    /// Content width after padding.
    pub width: f32,
    /// Content height after padding.
    pub height: f32,
    /// Text after any display transformation.
    pub text: String,
}

impl FitTarget {
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// The result of a full fit computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOutcome {
    /// Chosen size, already clamped to `min_size`.
    pub size: f32,
    /// Line count the text occupies at `size`.
    pub line_count: u32,
    pub searched_width: bool,
    pub searched_height: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Measurement helpers
// ────────────────────────────────────────────────────────────────────────────

/// Line count and widest line at one candidate size.
#[derive(Debug, Clone, Copy)]
struct LineSample {
    line_count: u32,
    widest_line: f32,
}

/// Measures `text` at `font_size`. With `max_lines == 1` the text is never
/// wrapped: the count is pinned at 1 and the flat width is the widest line.
fn sample_lines<O: TextLayoutOracle + ?Sized>(
    oracle: &O,
    text: &str,
    font_size: f32,
    target_width: f32,
    max_lines: u32,
) -> LineSample {
    if max_lines == 1 {
        return LineSample {
            line_count: 1,
            widest_line: oracle.measure_flat(text, font_size),
        };
    }
    let wrapped = oracle.wrap(text, font_size, target_width);
    LineSample {
        line_count: wrapped.line_count,
        widest_line: wrapped.widest_line(),
    }
}

/// Number of lines `text` occupies at `font_size` when wrapped at `target_width`.
pub fn measure_line_count<O: TextLayoutOracle + ?Sized>(
    oracle: &O,
    text: &str,
    font_size: f32,
    target_width: f32,
    max_lines: u32,
) -> u32 {
    sample_lines(oracle, text, font_size, target_width, max_lines).line_count
}

/// Total height of `line_count` lines: one full line box plus one
/// additional-line advance for every line after the first.
pub fn block_height(metrics: &FontMetrics, line_count: u32) -> f32 {
    let extra_lines = line_count.saturating_sub(1) as f32;
    metrics.line_extent() + metrics.additional_line_extent() * extra_lines
}

/// True when halving can no longer make progress in `f32`.
fn interval_exhausted(low: f32, mid: f32, high: f32) -> bool {
    mid <= low || mid >= high
}

// ────────────────────────────────────────────────────────────────────────────
// Width search
// ────────────────────────────────────────────────────────────────────────────

/// Largest size in `[low, high]` at which `text` wraps to at most `max_lines`
/// lines with no line wider than `target_width`.
pub fn search_width<O: TextLayoutOracle + ?Sized>(
    oracle: &O,
    text: &str,
    target_width: f32,
    max_lines: u32,
    low: f32,
    high: f32,
    precision: f32,
) -> f32 {
    let (mut low, mut high) = (low, high);

    loop {
        let mid = (low + high) / 2.0;
        if interval_exhausted(low, mid, high) {
            return low;
        }
        let sample = sample_lines(oracle, text, mid, target_width, max_lines);
        trace!(
            low,
            mid,
            high,
            target_width,
            max_lines,
            line_count = sample.line_count,
            "width search step"
        );

        if sample.line_count > max_lines {
            // More lines than allowed, including forced breaks beyond `max_lines`.
            if high - low < precision {
                return low;
            }
            high = mid;
        } else if sample.line_count < max_lines {
            low = mid;
        } else if high - low < precision {
            return low;
        } else if sample.widest_line > target_width {
            high = mid;
        } else if sample.widest_line < target_width {
            low = mid;
        } else {
            return mid;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Height search
// ────────────────────────────────────────────────────────────────────────────

/// Largest size in `[low, high]` at which `text`, wrapped at `target_width`,
/// occupies at most `max_lines` lines whose block height fits `target_height`.
#[allow(clippy::too_many_arguments)]
pub fn search_height<O: TextLayoutOracle + ?Sized>(
    oracle: &O,
    text: &str,
    target_width: f32,
    target_height: f32,
    max_lines: u32,
    low: f32,
    high: f32,
    precision: f32,
) -> f32 {
    let (mut low, mut high) = (low, high);

    loop {
        let mid = (low + high) / 2.0;
        if interval_exhausted(low, mid, high) {
            return low;
        }
        let line_count = measure_line_count(oracle, text, mid, target_width, max_lines);

        if line_count > max_lines {
            if high - low < precision {
                return low;
            }
            high = mid;
        } else if line_count < max_lines {
            low = mid;
        } else {
            let height = block_height(&oracle.metrics(mid), line_count);
            trace!(
                low,
                mid,
                high,
                target_height,
                line_count,
                block_height = height,
                "height search step"
            );
            if high - low < precision {
                return low;
            } else if height > target_height {
                high = mid;
            } else if height < target_height {
                low = mid;
            } else {
                return mid;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Full fit
// ────────────────────────────────────────────────────────────────────────────

/// Runs the complete fit for one target: short-circuit checks at `max_size`,
/// the direction's search(es) over `[0, max_size]`, then the `min_size` clamp.
///
/// Returns `None` when fitting does not apply: unbounded line limit or a
/// content box with no area.
pub fn fit_size<O: TextLayoutOracle + ?Sized>(
    oracle: &O,
    target: &FitTarget,
    config: &FitConfiguration,
) -> Option<FitOutcome> {
    let max_lines = config.max_lines.get()?;
    if !target.has_area() {
        return None;
    }

    let text = target.text.as_str();
    let max_size = config.max_size;
    let line_count = measure_line_count(oracle, text, max_size, target.width, max_lines);

    let too_many_lines = line_count > max_lines;
    let needs_width_search = too_many_lines
        || (max_lines == 1 && oracle.measure_flat(text, max_size) > target.width);
    let needs_height_search = too_many_lines || {
        let metrics = oracle.metrics(max_size);
        (max_lines == 1 && metrics.line_extent() > target.height)
            || block_height(&metrics, line_count) > target.height
    };

    let run_width = || {
        search_width(
            oracle,
            text,
            target.width,
            max_lines,
            0.0,
            max_size,
            config.precision,
        )
    };
    let run_height = || {
        search_height(
            oracle,
            text,
            target.width,
            target.height,
            max_lines,
            0.0,
            max_size,
            config.precision,
        )
    };

    let (size, searched_width, searched_height) = match config.direction {
        FitDirection::Width if needs_width_search => (run_width(), true, false),
        FitDirection::Height if needs_height_search => (run_height(), false, true),
        FitDirection::Both => {
            let width_size = if needs_width_search { run_width() } else { max_size };
            let height_size = if needs_height_search { run_height() } else { max_size };
            (
                width_size.min(height_size),
                needs_width_search,
                needs_height_search,
            )
        }
        _ => (max_size, false, false),
    };

    let size = size.max(config.min_size);
    let final_lines = if searched_width || searched_height {
        measure_line_count(oracle, text, size, target.width, max_lines)
    } else {
        line_count
    };

    debug!(
        direction = %config.direction,
        max_lines,
        initial_lines = line_count,
        size,
        final_lines,
        searched_width,
        searched_height,
        "fit size computed"
    );

    Some(FitOutcome {
        size,
        line_count: final_lines,
        searched_width,
        searched_height,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
