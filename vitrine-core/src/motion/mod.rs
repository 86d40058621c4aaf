//! Per-column scroll physics.
//!
//! A column drifts forward at a constant baseline speed. Wheel and drag
//! input move it immediately and also leave behind a manual velocity that
//! decays exponentially until it snaps to zero. Position is kept wrapped
//! into one deck loop so the visual loop is seamless in both directions.

mod progress;
mod wheel;

pub use progress::CycleProgress;
pub use wheel::{WheelDelta, WheelMode};

use std::time::Duration;

use tracing::trace;
use vitrine_config::{LifecycleSettings, MotionSettings, SpeedMode};

/// Finite-deck milestones produced by [`ColumnMotion::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    EnteredEndZone,
    Completed,
}

/// Settled position and velocity of a column between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionState {
    pub position: f64,
    pub manual_velocity: f64,
}

/// Wrap `position` into `[0, loop_height)` with floor-modulo.
///
/// Returns `position` unchanged when the loop is unmeasured, and 0 for a
/// non-finite position.
pub fn normalize(position: f64, loop_height: f64) -> f64 {
    if !position.is_finite() {
        return 0.0;
    }
    if !loop_height.is_finite() || loop_height <= 0.0 {
        return position;
    }
    let wrapped = position.rem_euclid(loop_height);
    // rem_euclid can round up to exactly loop_height for tiny negatives
    if wrapped >= loop_height { 0.0 } else { wrapped }
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    origin_y: f64,
    last_y: f64,
    engaged: bool,
}

#[derive(Debug, Clone)]
pub struct ColumnMotion {
    settings: MotionSettings,
    /// Progress tracking is off for infinite feeds
    finite: bool,
    end_zone_ratio: f64,
    state: MotionState,
    /// Height of one deck pass in px; 0 until measured
    loop_height: f64,
    /// Visible column height used for page-mode wheel deltas
    page_height: f64,
    drag: Option<DragState>,
    progress: CycleProgress,
}

impl ColumnMotion {
    pub fn new(
        settings: MotionSettings,
        lifecycle: &LifecycleSettings,
    ) -> Self {
        Self {
            settings,
            finite: lifecycle.finite,
            end_zone_ratio: lifecycle.end_zone_ratio,
            state: MotionState::default(),
            loop_height: 0.0,
            page_height: 0.0,
            drag: None,
            progress: CycleProgress::default(),
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn position(&self) -> f64 {
        self.state.position
    }

    pub fn manual_velocity(&self) -> f64 {
        self.state.manual_velocity
    }

    pub fn loop_height(&self) -> f64 {
        self.loop_height
    }

    pub fn progress(&self) -> CycleProgress {
        self.progress
    }

    pub fn is_measured(&self) -> bool {
        self.loop_height > 0.0
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some_and(|d| d.engaged)
    }

    pub fn set_speed_mode(&mut self, mode: SpeedMode) {
        self.settings.speed_mode = mode;
    }

    /// Record the measured loop height. Non-positive or non-finite heights
    /// mark the column as unmeasured.
    pub fn set_loop_height(&mut self, loop_height: f64) {
        self.loop_height = if loop_height.is_finite() && loop_height > 0.0 {
            loop_height
        } else {
            0.0
        };
        self.state.position = normalize(self.state.position, self.loop_height);
    }

    pub fn set_page_height(&mut self, page_height: f64) {
        self.page_height = if page_height.is_finite() {
            page_height.max(0.0)
        } else {
            0.0
        };
    }

    /// Advance by `dt`, clamped to the configured maximum tick.
    ///
    /// The step is computed from the state settled by the previous tick and
    /// written back once. While `paused` neither position nor manual
    /// velocity changes, but milestones already reached by direct input are
    /// still reported.
    pub fn tick(&mut self, dt: Duration, paused: bool) -> Vec<MotionEvent> {
        let dt = dt.min(self.settings.max_tick()).as_secs_f64();
        if !paused && dt > 0.0 && self.is_measured() {
            let prev = self.state;
            let step =
                (self.settings.effective_base_velocity() + prev.manual_velocity)
                    * dt;

            let decay = (-self.settings.manual_decay_rate * dt).exp();
            let cap = self.settings.manual_velocity_cap();
            let mut velocity = prev.manual_velocity * decay;
            if !velocity.is_finite()
                || velocity.abs() < self.settings.manual_stop_threshold
            {
                velocity = 0.0;
            }
            let velocity = velocity.clamp(-cap, cap);

            self.state = MotionState {
                position: normalize(prev.position + step, self.loop_height),
                manual_velocity: velocity,
            };
            self.record_travel(step);
        }
        self.milestones()
    }

    /// Apply a wheel event. Returns whether it was accepted.
    pub fn apply_wheel(&mut self, delta: WheelDelta, modal_open: bool) -> bool {
        if modal_open || !self.is_measured() {
            return false;
        }
        let px =
            delta.to_pixels(self.settings.wheel_line_height, self.page_height);
        if px == 0.0 {
            return false;
        }
        self.impulse(px, self.settings.wheel_impulse_scale);
        true
    }

    /// Start tracking a pointer at `y`. Nothing moves until the pointer
    /// travels past the drag threshold.
    pub fn begin_drag(&mut self, y: f64) {
        if !y.is_finite() {
            return;
        }
        self.drag = Some(DragState {
            origin_y: y,
            last_y: y,
            engaged: false,
        });
    }

    /// Follow the pointer. Returns whether the column moved.
    pub fn drag_to(&mut self, y: f64, modal_open: bool) -> bool {
        if modal_open || !self.is_measured() || !y.is_finite() {
            return false;
        }
        let Some(mut drag) = self.drag else {
            return false;
        };
        if !drag.engaged {
            if (y - drag.origin_y).abs() <= self.settings.drag_threshold {
                return false;
            }
            drag.engaged = true;
        }

        // Dragging up pulls later products into view.
        let delta = drag.last_y - y;
        drag.last_y = y;
        self.drag = Some(drag);
        if delta == 0.0 {
            return false;
        }
        self.impulse(delta, self.settings.drag_impulse_scale);
        true
    }

    /// Release the pointer. Returns whether the gesture was a drag rather
    /// than a tap.
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some_and(|d| d.engaged)
    }

    /// Restart cycle progress from the top of the deck.
    pub fn reset_cycle(&mut self) {
        self.state = MotionState::default();
        self.drag = None;
        self.progress.reset();
    }

    fn impulse(&mut self, delta: f64, scale: f64) {
        let cap = self.settings.manual_velocity_cap();
        self.state.position =
            normalize(self.state.position + delta, self.loop_height);
        self.state.manual_velocity =
            (self.state.manual_velocity + delta * scale).clamp(-cap, cap);
        self.record_travel(delta);
        trace!(
            delta,
            velocity = self.state.manual_velocity,
            "manual scroll impulse"
        );
    }

    fn record_travel(&mut self, delta: f64) {
        if self.finite {
            self.progress.record(delta);
        }
    }

    fn milestones(&mut self) -> Vec<MotionEvent> {
        if !self.finite {
            return Vec::new();
        }
        self.progress.milestones(self.loop_height, self.end_zone_ratio)
    }
}
