//! Static font-metric tables for the built-in font families.
//!
//! Horizontal widths are in em units (relative to font size) and cover ASCII
//! 0x20..=0x7E (95 printable characters), index = `(char as usize) - 32`.
//! Anything outside that range falls back to `average_char_width`. Vertical
//! metrics are also in em, y-down: extents above the baseline are negative.
//!
//! These are approximations of the real faces, close enough for the fit search
//! to converge on believable sizes without shipping a shaper.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    /// Humanist sans-serif.
    #[default]
    Inter,
    /// Old-style serif. Approx. 85% of Inter.
    EbGaramond,
    /// Condensed display sans-serif. Approx. 68% of Inter.
    Oswald,
}

impl FontFamily {
    pub const ALL: [FontFamily; 3] = [FontFamily::Inter, FontFamily::EbGaramond, FontFamily::Oswald];

    pub fn name(self) -> &'static str {
        match self {
            FontFamily::Inter => "inter",
            FontFamily::EbGaramond => "eb_garamond",
            FontFamily::Oswald => "oswald",
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown font family '{0}'")]
pub struct UnknownFontFamily(pub String);

impl FromStr for FontFamily {
    type Err = UnknownFontFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        FontFamily::ALL
            .into_iter()
            .find(|family| family.name() == normalized)
            .ok_or_else(|| UnknownFontFamily(s.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Vertical extents at 1em.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalMetrics {
    pub top: f32,
    pub ascent: f32,
    pub descent: f32,
    pub bottom: f32,
    pub leading: f32,
}

/// Static character-width table for a font family.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    pub font: FontFamily,
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
    pub space_width: f32,
    pub vertical: VerticalMetrics,
}

impl FontMetricTable {
    /// Width of one character in em units.
    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else if c == '\t' {
            self.space_width * 4.0
        } else if c.is_control() {
            0.0
        } else {
            self.average_char_width
        }
    }

    /// Rendered width of a string in em units, on a single line.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static INTER_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Inter,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
        // 0     1     2     3     4     5     6     7     8     9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
        // [     \     ]     ^     _     `
        0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.59,
    ],
    average_char_width: 0.52,
    space_width: 0.25,
    vertical: VerticalMetrics {
        top: -1.06,
        ascent: -0.97,
        descent: 0.24,
        bottom: 0.30,
        leading: 0.0,
    },
};

static EB_GARAMOND_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::EbGaramond,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.21, 0.26, 0.32, 0.48, 0.48, 0.76, 0.57, 0.19, 0.28, 0.28, 0.33, 0.50, 0.24, 0.28, 0.24, 0.26,
        // 0     1     2     3     4     5     6     7     8     9
        0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48, 0.48,
        // :     ;     <     =     >     ?     @
        0.24, 0.24, 0.50, 0.50, 0.50, 0.43, 0.87,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.57, 0.52, 0.52, 0.57, 0.48, 0.43, 0.57, 0.57, 0.21, 0.33, 0.52, 0.45, 0.66,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.57, 0.61, 0.48, 0.61, 0.52, 0.43, 0.48, 0.57, 0.57, 0.76, 0.52, 0.52, 0.48,
        // [     \     ]     ^     _     `
        0.24, 0.26, 0.24, 0.40, 0.48, 0.29,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.48, 0.48, 0.43, 0.48, 0.48, 0.26, 0.48, 0.48, 0.19, 0.19, 0.45, 0.19, 0.71,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.48, 0.48, 0.48, 0.48, 0.28, 0.37, 0.33, 0.48, 0.43, 0.61, 0.43, 0.43, 0.37,
        // {     |     }     ~
        0.28, 0.22, 0.28, 0.50,
    ],
    average_char_width: 0.44,
    space_width: 0.21,
    vertical: VerticalMetrics {
        top: -1.01,
        ascent: -0.80,
        descent: 0.30,
        bottom: 0.37,
        leading: 0.02,
    },
};

static OSWALD_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Oswald,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.17, 0.20, 0.26, 0.38, 0.38, 0.61, 0.46, 0.15, 0.23, 0.23, 0.27, 0.40, 0.19, 0.23, 0.19, 0.21,
        // 0     1     2     3     4     5     6     7     8     9
        0.38, 0.38, 0.38, 0.38, 0.38, 0.38, 0.38, 0.38, 0.38, 0.38,
        // :     ;     <     =     >     ?     @
        0.19, 0.19, 0.40, 0.40, 0.40, 0.34, 0.69,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.46, 0.41, 0.41, 0.46, 0.38, 0.34, 0.46, 0.46, 0.17, 0.27, 0.41, 0.36, 0.53,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.46, 0.49, 0.38, 0.49, 0.41, 0.34, 0.38, 0.46, 0.46, 0.61, 0.41, 0.41, 0.38,
        // [     \     ]     ^     _     `
        0.19, 0.21, 0.19, 0.32, 0.38, 0.23,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.38, 0.38, 0.34, 0.38, 0.38, 0.21, 0.38, 0.38, 0.15, 0.15, 0.36, 0.15, 0.56,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.38, 0.38, 0.38, 0.38, 0.23, 0.30, 0.27, 0.38, 0.34, 0.49, 0.34, 0.34, 0.30,
        // {     |     }     ~
        0.23, 0.18, 0.23, 0.40,
    ],
    average_char_width: 0.35,
    space_width: 0.17,
    vertical: VerticalMetrics {
        top: -1.25,
        ascent: -1.19,
        descent: 0.29,
        bottom: 0.34,
        leading: 0.0,
    },
};

/// Returns the static metric table for a given font family.
pub fn get_metrics(font: FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Inter => &INTER_TABLE,
        FontFamily::EbGaramond => &EB_GARAMOND_TABLE,
        FontFamily::Oswald => &OSWALD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
