// Fit-size engine: binary search over font size plus the per-widget controller.
// The search is pure and driven through `TextLayoutOracle`; the controller owns
// configuration, the re-entrancy guard, and listener fan-out.

pub mod configuration;
pub mod controller;
pub mod handlers;
pub mod oracle;
pub mod search;
pub mod units;
pub mod widget;

#[cfg(test)]
pub(crate) mod test_support;

use thiserror::Error;

pub use configuration::{FitConfiguration, FitDirection, LineLimit};
pub use controller::{AutofitController, ListenerId, Phase};
pub use oracle::{FontMetrics, TextLayoutOracle, WrappedText};
pub use search::{block_height, fit_size, FitOutcome, FitTarget};
pub use units::{DisplayDensity, SizeUnit};
pub use widget::{HeadlessWidget, HostWidget, Padding};

/// A configuration value the search cannot work with. The configuration it was
/// meant to replace stays in effect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("invalid fit direction: {0} (expected width, height, or both)")]
    InvalidDirection(String),

    #[error("precision must be a positive finite number, got {0}")]
    InvalidPrecision(f32),

    #[error("min size {min} exceeds max size {max}")]
    InvalidSizeRange { min: f32, max: f32 },

    #[error("size must be a non-negative finite number, got {0}")]
    InvalidSize(f32),
}
