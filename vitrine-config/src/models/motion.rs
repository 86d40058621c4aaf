//! Scroll motion tuning
//!
//! Units are pixels and seconds throughout, except for the cooldown and the
//! tick clamp which are expressed in milliseconds like the rest of the
//! timing knobs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Viewer-selected auto-scroll pace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedMode {
    #[default]
    Cozy,
    Quick,
}

impl fmt::Display for SpeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cozy => write!(f, "Cozy"),
            Self::Quick => write!(f, "Quick"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MotionSettings {
    /// Idle auto-scroll speed before the speed-mode multiplier (px/s).
    pub base_velocity: f64,
    pub speed_mode: SpeedMode,
    pub cozy_multiplier: f64,
    pub quick_multiplier: f64,
    /// Share of a wheel delta that also becomes manual velocity.
    pub wheel_impulse_scale: f64,
    /// Share of a drag delta that also becomes manual velocity.
    pub drag_impulse_scale: f64,
    /// Manual velocity cap as a multiple of the effective base speed.
    pub max_manual_multiplier: f64,
    /// Lower bound on the manual velocity cap (px/s).
    pub min_manual_cap: f64,
    /// Exponential decay rate of manual velocity (1/s).
    pub manual_decay_rate: f64,
    /// Manual velocity below this magnitude snaps to zero (px/s).
    pub manual_stop_threshold: f64,
    /// Pixels per line for line-mode wheel deltas.
    pub wheel_line_height: f64,
    /// Movement a touch/pointer must exceed before it counts as a drag (px).
    pub drag_threshold: f64,
    /// How long a column stays paused after the last manual input (ms).
    pub interaction_cooldown_ms: u64,
    /// Longest frame delta integrated in one tick (ms).
    pub max_tick_ms: u64,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            base_velocity: 24.0,
            speed_mode: SpeedMode::Cozy,
            cozy_multiplier: 1.0,
            quick_multiplier: 1.8,
            wheel_impulse_scale: 1.6,
            drag_impulse_scale: 0.85,
            max_manual_multiplier: 7.0,
            min_manual_cap: 120.0,
            manual_decay_rate: 1.15,
            manual_stop_threshold: 6.0,
            wheel_line_height: 18.0,
            drag_threshold: 6.0,
            interaction_cooldown_ms: 450,
            max_tick_ms: 250,
        }
    }
}

impl MotionSettings {
    pub fn speed_multiplier(&self) -> f64 {
        match self.speed_mode {
            SpeedMode::Cozy => self.cozy_multiplier,
            SpeedMode::Quick => self.quick_multiplier,
        }
    }

    /// Auto-scroll speed after the speed-mode multiplier (px/s).
    pub fn effective_base_velocity(&self) -> f64 {
        self.base_velocity * self.speed_multiplier()
    }

    /// Symmetric bound on manual velocity (px/s).
    pub fn manual_velocity_cap(&self) -> f64 {
        (self.effective_base_velocity().abs() * self.max_manual_multiplier)
            .max(self.min_manual_cap)
    }

    pub fn interaction_cooldown(&self) -> Duration {
        Duration::from_millis(self.interaction_cooldown_ms)
    }

    pub fn max_tick(&self) -> Duration {
        Duration::from_millis(self.max_tick_ms.max(1))
    }
}
