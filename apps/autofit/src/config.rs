use anyhow::{Context, Result};

use crate::fitting::configuration::{DEFAULT_MIN_SIZE_SP, DEFAULT_PRECISION};
use crate::layout::FontFamily;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Font used by fit requests that do not name one.
    pub default_font: FontFamily,
    /// Search precision used when a request omits it, in pixels.
    pub default_precision: f32,
    /// Minimum size used when a request omits it, in scaled pixels.
    pub default_min_size_sp: f32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            default_font: env_or("AUTOFIT_DEFAULT_FONT", FontFamily::Inter.name())
                .parse::<FontFamily>()
                .context("AUTOFIT_DEFAULT_FONT must name a built-in font family")?,
            default_precision: parse_positive("AUTOFIT_DEFAULT_PRECISION", DEFAULT_PRECISION)?,
            default_min_size_sp: parse_positive("AUTOFIT_DEFAULT_MIN_SIZE", DEFAULT_MIN_SIZE_SP)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            default_font: FontFamily::Inter,
            default_precision: DEFAULT_PRECISION,
            default_min_size_sp: DEFAULT_MIN_SIZE_SP,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_positive(key: &str, default: f32) -> Result<f32> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(default);
    };
    let value = raw
        .parse::<f32>()
        .with_context(|| format!("{key} must be a number, got '{raw}'"))?;
    anyhow::ensure!(
        value.is_finite() && value > 0.0,
        "{key} must be positive, got {value}"
    );
    Ok(value)
}
