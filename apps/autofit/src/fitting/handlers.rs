use std::cell::Cell;
use std::rc::Rc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::fitting::{
    block_height, AutofitController, DisplayDensity, FitConfiguration, FitDirection, FitError,
    FontMetrics, HeadlessWidget, HostWidget, LineLimit, Padding, SizeUnit, TextLayoutOracle,
};
use crate::fitting::search::measure_line_count;
use crate::fitting::units::to_device_units;
use crate::layout::{FontFamily, MetricTableOracle};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / response types
// ────────────────────────────────────────────────────────────────────────────

/// Direction as either a toolkit code (0/1/2) or a name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DirectionInput {
    Code(i64),
    Name(String),
}

impl TryFrom<DirectionInput> for FitDirection {
    type Error = FitError;

    fn try_from(input: DirectionInput) -> Result<Self, Self::Error> {
        match input {
            DirectionInput::Code(code) => FitDirection::try_from(code),
            DirectionInput::Name(name) => name.parse(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FitRequest {
    pub text: String,
    #[serde(default)]
    pub font: Option<String>,
    /// Outer widget width, padding included.
    pub width: f32,
    /// Outer widget height, padding included.
    pub height: f32,
    #[serde(default)]
    pub padding: Padding,
    /// Natural (unconstrained) size, in pixels.
    pub max_size: f32,
    #[serde(default)]
    pub min_size: Option<f32>,
    #[serde(default)]
    pub precision: Option<f32>,
    /// `0` or negative means no line limit.
    #[serde(default)]
    pub max_lines: LineLimit,
    #[serde(default)]
    pub direction: Option<DirectionInput>,
    #[serde(default)]
    pub single_line: bool,
    #[serde(default)]
    pub density: Option<DisplayDensity>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FitResponse {
    pub font: FontFamily,
    pub direction: FitDirection,
    pub size: f32,
    pub previous_size: f32,
    pub changed: bool,
    /// False when fitting did not apply (no line limit, or no content area).
    pub fitted: bool,
    pub line_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct MeasureRequest {
    pub text: String,
    #[serde(default)]
    pub font: Option<String>,
    pub size: f32,
    /// Wrap width; omitted means a single unwrapped line.
    #[serde(default)]
    pub width: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeasureResponse {
    pub font: FontFamily,
    pub flat_width: f32,
    pub line_count: u32,
    pub line_widths: Vec<f32>,
    pub block_height: f32,
    pub metrics: FontMetrics,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FontListResponse {
    pub fonts: Vec<FontFamily>,
    pub default: FontFamily,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/fit
pub async fn handle_fit(
    State(state): State<AppState>,
    Json(req): Json<FitRequest>,
) -> Result<Json<FitResponse>, AppError> {
    let font = resolve_font(req.font.as_deref(), &state.config)?;
    let direction = req
        .direction
        .clone()
        .map(FitDirection::try_from)
        .transpose()?
        .unwrap_or_default();
    let config = state.config.clone();

    // CPU-bound; runs on the blocking pool.
    let response = tokio::task::spawn_blocking(move || run_fit(req, font, direction, &config))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in fit: {e}")))??;

    info!(
        font = %response.font,
        direction = %response.direction,
        size = response.size,
        lines = response.line_count,
        "fit request served"
    );
    Ok(Json(response))
}

/// POST /api/v1/measure
pub async fn handle_measure(
    State(state): State<AppState>,
    Json(req): Json<MeasureRequest>,
) -> Result<Json<MeasureResponse>, AppError> {
    let font = resolve_font(req.font.as_deref(), &state.config)?;
    if !(req.size.is_finite() && req.size > 0.0) {
        return Err(FitError::InvalidSize(req.size).into());
    }

    let oracle = MetricTableOracle::new(font);
    let flat_width = oracle.measure_flat(&req.text, req.size);
    let (line_count, line_widths) = match req.width {
        Some(width) => {
            let wrapped = oracle.wrap(&req.text, req.size, width);
            (wrapped.line_count, wrapped.line_widths)
        }
        None => (1, vec![flat_width]),
    };
    let metrics = oracle.metrics(req.size);

    Ok(Json(MeasureResponse {
        font,
        flat_width,
        line_count,
        line_widths,
        block_height: block_height(&metrics, line_count),
        metrics,
    }))
}

/// GET /api/v1/fonts
pub async fn handle_list_fonts(State(state): State<AppState>) -> Json<FontListResponse> {
    Json(FontListResponse {
        fonts: FontFamily::ALL.to_vec(),
        default: state.config.default_font,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn resolve_font(requested: Option<&str>, config: &Config) -> Result<FontFamily, AppError> {
    match requested {
        Some(name) => name
            .parse::<FontFamily>()
            .map_err(|e| AppError::Validation(e.to_string())),
        None => Ok(config.default_font),
    }
}

/// Binds a headless widget to a fresh controller, enables it, and reports the result.
fn run_fit(
    req: FitRequest,
    font: FontFamily,
    direction: FitDirection,
    defaults: &Config,
) -> Result<FitResponse, AppError> {
    let density = req.density.unwrap_or_default();
    let widget = HeadlessWidget::new(req.text, req.max_size)
        .with_bounds(req.width, req.height)
        .with_padding(req.padding)
        .with_max_lines(req.max_lines)
        .with_single_line(req.single_line)
        .with_density(density);

    let min_size = req.min_size.unwrap_or_else(|| {
        to_device_units(defaults.default_min_size_sp, SizeUnit::Sp, &density).min(req.max_size)
    });
    let fit_config = FitConfiguration {
        min_size,
        max_size: req.max_size,
        precision: req.precision.unwrap_or(defaults.default_precision),
        max_lines: widget.max_lines(),
        direction,
    };

    let controller =
        AutofitController::bind_with(widget, MetricTableOracle::new(font), fit_config)?;
    let changes = Rc::new(Cell::new(0_u32));
    let counter = Rc::clone(&changes);
    controller.add_listener(move |_, _| counter.set(counter.get() + 1));
    controller.set_enabled(true);

    let size = controller.current_size();
    // An unbounded limit reports the wrapped count.
    let max_lines = controller.max_lines().get().unwrap_or(0);
    let (fitted, line_count) = controller.with_widget(|w| {
        let lines = measure_line_count(
            controller.oracle(),
            &w.current_text(),
            size,
            w.content_box().width.max(0.0),
            max_lines,
        );
        (w.apply_count() > 0, lines)
    });

    Ok(FitResponse {
        font,
        direction,
        size,
        previous_size: req.max_size,
        changed: changes.get() > 0,
        fitted,
        line_count,
    })
}
