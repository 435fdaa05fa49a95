//! Fit configuration: size bounds, search precision, line limit, and fit direction.
//!
//! A `FitConfiguration` is owned by one `AutofitController` for the lifetime of the
//! bound widget. Every mutation goes through `validate()` first; a rejected value
//! leaves the previous configuration intact.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fitting::FitError;

/// Default minimum text size, in scaled pixels.
pub const DEFAULT_MIN_SIZE_SP: f32 = 10.0;
/// Default binary-search tolerance, in device pixels.
pub const DEFAULT_PRECISION: f32 = 0.5;

// ────────────────────────────────────────────────────────────────────────────
// Fit direction
// ────────────────────────────────────────────────────────────────────────────

/// Which dimension(s) the chosen size must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitDirection {
    /// Widest wrapped line must fit the content width.
    #[default]
    Width,
    /// Total block height must fit the content height.
    Height,
    /// Both constraints; the more restrictive one wins.
    Both,
}

impl FitDirection {
    pub fn code(self) -> i64 {
        match self {
            FitDirection::Width => 0,
            FitDirection::Height => 1,
            FitDirection::Both => 2,
        }
    }
}

impl TryFrom<i64> for FitDirection {
    type Error = FitError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(FitDirection::Width),
            1 => Ok(FitDirection::Height),
            2 => Ok(FitDirection::Both),
            other => Err(FitError::InvalidDirection(other.to_string())),
        }
    }
}

impl FromStr for FitDirection {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "width" => Ok(FitDirection::Width),
            "height" => Ok(FitDirection::Height),
            "both" => Ok(FitDirection::Both),
            _ => Err(FitError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for FitDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FitDirection::Width => "width",
            FitDirection::Height => "height",
            FitDirection::Both => "both",
        };
        f.write_str(name)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Line limit
// ────────────────────────────────────────────────────────────────────────────

/// Maximum number of lines the text may occupy.
///
/// `Unbounded` disables autofitting entirely. On the wire it is `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum LineLimit {
    #[default]
    Unbounded,
    Lines(NonZeroU32),
}

impl LineLimit {
    pub const SINGLE: LineLimit = LineLimit::Lines(NonZeroU32::MIN);

    /// Maps a raw toolkit value: anything ≤ 0, or the `i32::MAX` "no limit" sentinel, is unbounded.
    pub fn from_raw(raw: i64) -> Self {
        if raw <= 0 || raw >= i64::from(i32::MAX) {
            return LineLimit::Unbounded;
        }
        u32::try_from(raw)
            .ok()
            .and_then(NonZeroU32::new)
            .map_or(LineLimit::Unbounded, LineLimit::Lines)
    }

    pub fn get(self) -> Option<u32> {
        match self {
            LineLimit::Unbounded => None,
            LineLimit::Lines(n) => Some(n.get()),
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, LineLimit::Unbounded)
    }
}

impl From<i64> for LineLimit {
    fn from(raw: i64) -> Self {
        LineLimit::from_raw(raw)
    }
}

impl From<LineLimit> for i64 {
    fn from(limit: LineLimit) -> Self {
        limit.get().map_or(0, i64::from)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Configuration value object
// ────────────────────────────────────────────────────────────────────────────

/// Size bounds and fit policy for one widget.
///
/// `max_size` doubles as the original, unconstrained size: it is what the widget
/// returns to when autofitting is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitConfiguration {
    pub min_size: f32,
    pub max_size: f32,
    pub precision: f32,
    pub max_lines: LineLimit,
    pub direction: FitDirection,
}

impl FitConfiguration {
    /// Configuration with the stock defaults, for a widget whose natural size is `max_size`.
    ///
    /// `min_size` is given in device pixels and capped at `max_size`.
    pub fn new(max_size: f32, min_size: f32, max_lines: LineLimit) -> Self {
        Self {
            min_size: min_size.min(max_size).max(0.0),
            max_size,
            precision: DEFAULT_PRECISION,
            max_lines,
            direction: FitDirection::Width,
        }
    }

    pub fn with_precision(mut self, precision: f32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_direction(mut self, direction: FitDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_min_size(mut self, min_size: f32) -> Self {
        self.min_size = min_size;
        self
    }

    /// Rejects values that would break the search: non-positive precision
    /// (non-termination), inverted or negative bounds, non-finite sizes.
    pub fn validate(&self) -> Result<(), FitError> {
        if !self.min_size.is_finite() || self.min_size < 0.0 {
            return Err(FitError::InvalidSize(self.min_size));
        }
        if !self.max_size.is_finite() || self.max_size < 0.0 {
            return Err(FitError::InvalidSize(self.max_size));
        }
        if self.min_size > self.max_size {
            return Err(FitError::InvalidSizeRange {
                min: self.min_size,
                max: self.max_size,
            });
        }
        if !(self.precision.is_finite() && self.precision > 0.0) {
            return Err(FitError::InvalidPrecision(self.precision));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> FitConfiguration {
        FitConfiguration::new(40.0, 10.0, LineLimit::from_raw(2))
    }

    #[test]
    fn test_line_limit_from_raw_sentinels_are_unbounded() {
        assert_eq!(LineLimit::from_raw(0), LineLimit::Unbounded);
        assert_eq!(LineLimit::from_raw(-1), LineLimit::Unbounded);
        assert_eq!(LineLimit::from_raw(i64::from(i32::MAX)), LineLimit::Unbounded);
        assert_eq!(LineLimit::from_raw(3).get(), Some(3));
        assert_eq!(LineLimit::from_raw(1), LineLimit::SINGLE);
    }

    #[test]
    fn test_line_limit_serializes_as_integer() {
        let json = serde_json::to_string(&LineLimit::from_raw(4)).unwrap();
        assert_eq!(json, "4");
        let parsed: LineLimit = serde_json::from_str("0").unwrap();
        assert!(parsed.is_unbounded());
    }

    #[test]
    fn test_direction_parses_codes_and_names() {
        assert_eq!(FitDirection::try_from(1).unwrap(), FitDirection::Height);
        assert_eq!("BOTH".parse::<FitDirection>().unwrap(), FitDirection::Both);
        assert!(matches!(
            FitDirection::try_from(7),
            Err(FitError::InvalidDirection(_))
        ));
        assert!("diagonal".parse::<FitDirection>().is_err());
    }

    #[test]
    fn test_direction_code_round_trips() {
        for d in [FitDirection::Width, FitDirection::Height, FitDirection::Both] {
            assert_eq!(FitDirection::try_from(d.code()).unwrap(), d);
        }
    }

    #[test]
    fn test_new_caps_min_size_at_max() {
        let cfg = FitConfiguration::new(8.0, 10.0, LineLimit::SINGLE);
        assert_eq!(cfg.min_size, 8.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_precision() {
        let cfg = base().with_precision(0.0);
        assert!(matches!(cfg.validate(), Err(FitError::InvalidPrecision(_))));
        let cfg = base().with_precision(f32::NAN);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let cfg = base().with_min_size(50.0);
        assert!(matches!(
            cfg.validate(),
            Err(FitError::InvalidSizeRange { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_min() {
        let cfg = base().with_min_size(-1.0);
        assert!(matches!(cfg.validate(), Err(FitError::InvalidSize(_))));
    }
}
