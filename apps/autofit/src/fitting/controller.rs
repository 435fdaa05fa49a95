//! Autofit controller: owns one widget's fit configuration and keeps its font size fitted.
//!
//! # State machine
//! - `Idle`: configuration changes always start a recomputation; text and bounds
//!   events only while enabled.
//! - `Recomputing`: entered before measuring, left only after the new size is
//!   applied and every listener has been notified. Any event that arrives in this
//!   phase is dropped, which covers widget callbacks fired by our own apply step.
//!   A disable arriving in this phase still restores `max_size`, once the current
//!   dispatch has finished.
//!
//! The controller works through `&self` so a host can keep it in an `Rc` and route
//! widget callbacks back into it; all mutable state sits in `Cell`/`RefCell`.

use std::cell::{Cell, RefCell};

use tracing::{debug, trace};

use crate::fitting::configuration::{FitConfiguration, FitDirection, LineLimit, DEFAULT_MIN_SIZE_SP};
use crate::fitting::oracle::TextLayoutOracle;
use crate::fitting::search::{fit_size, FitTarget};
use crate::fitting::units::{to_device_units, SizeUnit};
use crate::fitting::widget::HostWidget;
use crate::fitting::FitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Recomputing,
}

/// Handle returned by `add_listener`, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Called with `(new_size, old_size)` after a size change is applied.
pub type SizeListener = Box<dyn FnMut(f32, f32)>;

/// Holds `Phase::Recomputing` for its lifetime.
struct RecomputeGuard<'a> {
    phase: &'a Cell<Phase>,
}

impl<'a> RecomputeGuard<'a> {
    fn enter(phase: &'a Cell<Phase>) -> Option<Self> {
        if phase.get() == Phase::Recomputing {
            return None;
        }
        phase.set(Phase::Recomputing);
        Some(Self { phase })
    }
}

impl Drop for RecomputeGuard<'_> {
    fn drop(&mut self) {
        self.phase.set(Phase::Idle);
    }
}

pub struct AutofitController<W, O> {
    widget: RefCell<W>,
    oracle: O,
    config: Cell<FitConfiguration>,
    enabled: Cell<bool>,
    current_size: Cell<f32>,
    phase: Cell<Phase>,
    listeners: RefCell<Vec<(ListenerId, SizeListener)>>,
    /// Removals requested while the listener list is out for dispatch.
    pending_removals: RefCell<Vec<ListenerId>>,
    dispatching: Cell<bool>,
    /// Set by a disable that arrived while `Recomputing`.
    pending_reset: Cell<bool>,
    next_listener_id: Cell<u64>,
}

impl<W: HostWidget, O: TextLayoutOracle> AutofitController<W, O> {
    /// Binds to `widget` with the default configuration: its current font size as
    /// `max_size`, 10sp (capped at `max_size`) as `min_size`, its own line limit.
    ///
    /// The controller starts disabled; call `set_enabled(true)` to start fitting.
    pub fn bind(widget: W, oracle: O) -> Self {
        let max_size = widget.font_size();
        let min_size = to_device_units(DEFAULT_MIN_SIZE_SP, SizeUnit::Sp, &widget.density());
        let config = FitConfiguration::new(max_size, min_size, widget.max_lines());
        Self::bind_unchecked(widget, oracle, config)
    }

    /// Binds with an explicit configuration.
    pub fn bind_with(widget: W, oracle: O, config: FitConfiguration) -> Result<Self, FitError> {
        config.validate()?;
        Ok(Self::bind_unchecked(widget, oracle, config))
    }

    fn bind_unchecked(widget: W, oracle: O, config: FitConfiguration) -> Self {
        Self {
            widget: RefCell::new(widget),
            oracle,
            config: Cell::new(config),
            enabled: Cell::new(false),
            current_size: Cell::new(config.max_size),
            phase: Cell::new(Phase::Idle),
            listeners: RefCell::new(Vec::new()),
            pending_removals: RefCell::new(Vec::new()),
            dispatching: Cell::new(false),
            pending_reset: Cell::new(false),
            next_listener_id: Cell::new(0),
        }
    }

    /// Stops watching and hands the widget back.
    pub fn unbind(self) -> W {
        let mut widget = self.widget.into_inner();
        if self.enabled.get() {
            widget.set_watching(false);
        }
        widget
    }

    // ────────────────────────────────────────────────────────────────────────
    // Accessors
    // ────────────────────────────────────────────────────────────────────────

    pub fn current_size(&self) -> f32 {
        self.current_size.get()
    }

    pub fn configuration(&self) -> FitConfiguration {
        self.config.get()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn min_size(&self) -> f32 {
        self.config.get().min_size
    }

    pub fn max_size(&self) -> f32 {
        self.config.get().max_size
    }

    pub fn precision(&self) -> f32 {
        self.config.get().precision
    }

    pub fn max_lines(&self) -> LineLimit {
        self.config.get().max_lines
    }

    pub fn direction(&self) -> FitDirection {
        self.config.get().direction
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Read access to the bound widget. Must not be called from inside `apply_font_size`.
    pub fn with_widget<R>(&self, f: impl FnOnce(&W) -> R) -> R {
        f(&self.widget.borrow())
    }

    /// Write access to the bound widget. Follow with `notify_text_changed` or
    /// `notify_bounds_changed` when the change affects fitting.
    pub fn with_widget_mut<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.widget.borrow_mut())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Configuration
    // ────────────────────────────────────────────────────────────────────────

    /// Replaces the whole configuration. Rejected values leave it untouched.
    pub fn configure(&self, config: FitConfiguration) -> Result<(), FitError> {
        config.validate()?;
        if config == self.config.get() {
            return Ok(());
        }
        self.config.set(config);
        debug!(?config, "fit configuration changed");
        self.autofit();
        Ok(())
    }

    pub fn set_min_size(&self, size: f32) -> Result<(), FitError> {
        self.configure(FitConfiguration {
            min_size: size,
            ..self.config.get()
        })
    }

    pub fn set_min_size_in(&self, unit: SizeUnit, value: f32) -> Result<(), FitError> {
        let density = self.widget.borrow().density();
        self.set_min_size(to_device_units(value, unit, &density))
    }

    pub fn set_max_size(&self, size: f32) -> Result<(), FitError> {
        self.configure(FitConfiguration {
            max_size: size,
            ..self.config.get()
        })
    }

    pub fn set_max_size_in(&self, unit: SizeUnit, value: f32) -> Result<(), FitError> {
        let density = self.widget.borrow().density();
        self.set_max_size(to_device_units(value, unit, &density))
    }

    /// Lower precision values are more exact and take more measurements.
    pub fn set_precision(&self, precision: f32) -> Result<(), FitError> {
        self.configure(FitConfiguration {
            precision,
            ..self.config.get()
        })
    }

    pub fn set_max_lines(&self, max_lines: LineLimit) -> Result<(), FitError> {
        self.configure(FitConfiguration {
            max_lines,
            ..self.config.get()
        })
    }

    pub fn set_direction(&self, direction: FitDirection) -> Result<(), FitError> {
        self.configure(FitConfiguration {
            direction,
            ..self.config.get()
        })
    }

    /// Sets the direction from a raw toolkit code (0 width, 1 height, 2 both).
    pub fn set_direction_code(&self, code: i64) -> Result<(), FitError> {
        self.set_direction(FitDirection::try_from(code)?)
    }

    /// Enabling starts watching the widget and fits immediately. Disabling stops
    /// watching and restores `max_size` without any fit check.
    pub fn set_enabled(&self, enabled: bool) {
        if self.enabled.get() == enabled {
            return;
        }
        self.enabled.set(enabled);
        self.widget.borrow_mut().set_watching(enabled);
        debug!(enabled, "autofit toggled");

        if enabled {
            self.autofit();
            return;
        }
        match RecomputeGuard::enter(&self.phase) {
            Some(_guard) => {
                self.apply_size(self.config.get().max_size);
                self.apply_pending_reset();
            }
            None => {
                trace!("disabled while recomputing; reset deferred");
                self.pending_reset.set(true);
            }
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Invalidation
    // ────────────────────────────────────────────────────────────────────────

    pub fn notify_text_changed(&self) {
        if self.enabled.get() {
            self.autofit();
        }
    }

    pub fn notify_bounds_changed(&self) {
        if self.enabled.get() {
            self.autofit();
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Listeners
    // ────────────────────────────────────────────────────────────────────────

    pub fn add_listener(&self, listener: impl FnMut(f32, f32) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id.get());
        self.next_listener_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&self, id: ListenerId) {
        if self.dispatching.get() {
            self.pending_removals.borrow_mut().push(id);
        }
        self.listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    // ────────────────────────────────────────────────────────────────────────
    // Recomputation
    // ────────────────────────────────────────────────────────────────────────

    fn autofit(&self) {
        let Some(_guard) = RecomputeGuard::enter(&self.phase) else {
            trace!("autofit requested while recomputing; ignored");
            return;
        };

        let config = self.config.get();
        let target = {
            let widget = self.widget.borrow();
            let content = widget.content_box();
            FitTarget {
                width: content.width,
                height: content.height,
                text: widget.current_text(),
            }
        };

        match fit_size(&self.oracle, &target, &config) {
            Some(outcome) => self.apply_size(outcome.size),
            None => trace!(
                width = target.width,
                height = target.height,
                max_lines = ?config.max_lines,
                "autofit not applicable"
            ),
        }
        self.apply_pending_reset();
    }

    /// Restores `max_size` for a disable that arrived mid-recompute, unless the
    /// controller was enabled again in the meantime. Callers hold the guard.
    fn apply_pending_reset(&self) {
        while self.pending_reset.replace(false) {
            if !self.enabled.get() {
                self.apply_size(self.config.get().max_size);
            }
        }
    }

    /// Applies `size` to the widget and notifies listeners if it changed.
    /// Callers hold the recompute guard.
    fn apply_size(&self, size: f32) {
        let old_size = self.current_size.get();
        self.widget.borrow_mut().apply_font_size(size);
        self.current_size.set(size);

        if size != old_size {
            debug!(size, old_size, "font size changed");
            self.dispatch(size, old_size);
        }
    }

    fn dispatch(&self, size: f32, old_size: f32) {
        let mut active = self.listeners.take();
        self.dispatching.set(true);
        for (_, listener) in active.iter_mut() {
            listener(size, old_size);
        }
        self.dispatching.set(false);

        let mut listeners = self.listeners.borrow_mut();
        let added = std::mem::replace(&mut *listeners, active);
        listeners.extend(added);

        let removed = self.pending_removals.take();
        if !removed.is_empty() {
            listeners.retain(|(id, _)| !removed.contains(id));
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
