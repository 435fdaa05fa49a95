//! Size units and density conversion.
//!
//! Sizes inside the search are always device pixels. Caller-facing setters may
//! take another unit; conversion happens once, at the configuration boundary.

use serde::{Deserialize, Serialize};

const POINTS_PER_INCH: f32 = 72.0;
const MM_PER_INCH: f32 = 25.4;

/// Unit of a caller-supplied size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    /// Device pixels.
    Px,
    /// Density-independent pixels.
    Dp,
    /// Scaled pixels: density-independent, also scaled by the user's font preference.
    Sp,
    /// Points, 1/72 inch.
    Pt,
    In,
    Mm,
}

/// Pixel density of the surface a widget renders to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayDensity {
    /// Pixels per dp.
    pub density: f32,
    /// Pixels per sp (`density` times the font scale).
    pub scaled_density: f32,
    /// Physical pixels per inch along x.
    pub xdpi: f32,
}

impl Default for DisplayDensity {
    /// A 160 dpi baseline surface, where 1dp = 1sp = 1px.
    fn default() -> Self {
        Self {
            density: 1.0,
            scaled_density: 1.0,
            xdpi: 160.0,
        }
    }
}

/// Converts `value` in `unit` to device pixels.
pub fn to_device_units(value: f32, unit: SizeUnit, density: &DisplayDensity) -> f32 {
    match unit {
        SizeUnit::Px => value,
        SizeUnit::Dp => value * density.density,
        SizeUnit::Sp => value * density.scaled_density,
        SizeUnit::Pt => value * density.xdpi / POINTS_PER_INCH,
        SizeUnit::In => value * density.xdpi,
        SizeUnit::Mm => value * density.xdpi / MM_PER_INCH,
    }
}
