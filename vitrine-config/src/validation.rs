//! Guard rails applied to every loaded feed config.
//!
//! A config that passes `validate` cannot drive the engine into a state it
//! would have to silently repair (negative decay, zero-width breakpoints,
//! a sponsored interval of zero).

use crate::models::{
    FeedConfig, LayoutSettings, LifecycleSettings, MotionSettings,
    SponsoredSettings,
};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeedConfigError {
    #[error("motion.{field} must be a positive finite number (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("motion.{field} must be finite and not negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("lifecycle.end_zone_ratio must be in (0, 1] (got {0})")]
    EndZoneRatio(f64),

    #[error("sponsored.interval must be at least 1")]
    SponsoredInterval,

    #[error("layout.breakpoints[{index}] must have at least one column")]
    EmptyBreakpoint { index: usize },

    #[error(
        "layout.breakpoints[{index}] width {width} must be positive and \
         larger than the previous breakpoint"
    )]
    BreakpointOrder { index: usize, width: f32 },

    #[error("layout.wide_columns must be at least 1")]
    WideColumns,
}

impl FeedConfig {
    /// Check every guard rail, returning the first violation.
    pub fn validate(&self) -> Result<(), FeedConfigError> {
        validate_motion(&self.motion)?;
        validate_lifecycle(&self.lifecycle)?;
        validate_sponsored(&self.sponsored)?;
        validate_layout(&self.layout)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), FeedConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FeedConfigError::NonPositive { field, value })
    }
}

fn non_negative(
    field: &'static str,
    value: f64,
) -> Result<(), FeedConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FeedConfigError::Negative { field, value })
    }
}

fn validate_motion(motion: &MotionSettings) -> Result<(), FeedConfigError> {
    positive("base_velocity", motion.base_velocity)?;
    positive("cozy_multiplier", motion.cozy_multiplier)?;
    positive("quick_multiplier", motion.quick_multiplier)?;
    non_negative("wheel_impulse_scale", motion.wheel_impulse_scale)?;
    non_negative("drag_impulse_scale", motion.drag_impulse_scale)?;
    positive("max_manual_multiplier", motion.max_manual_multiplier)?;
    non_negative("min_manual_cap", motion.min_manual_cap)?;
    positive("manual_decay_rate", motion.manual_decay_rate)?;
    non_negative("manual_stop_threshold", motion.manual_stop_threshold)?;
    positive("wheel_line_height", motion.wheel_line_height)?;
    non_negative("drag_threshold", motion.drag_threshold)?;
    if motion.max_tick_ms == 0 {
        return Err(FeedConfigError::NonPositive {
            field: "max_tick_ms",
            value: 0.0,
        });
    }
    Ok(())
}

fn validate_lifecycle(
    lifecycle: &LifecycleSettings,
) -> Result<(), FeedConfigError> {
    let ratio = lifecycle.end_zone_ratio;
    if ratio.is_finite() && ratio > 0.0 && ratio <= 1.0 {
        Ok(())
    } else {
        Err(FeedConfigError::EndZoneRatio(ratio))
    }
}

fn validate_sponsored(
    sponsored: &SponsoredSettings,
) -> Result<(), FeedConfigError> {
    if sponsored.interval == 0 {
        return Err(FeedConfigError::SponsoredInterval);
    }
    Ok(())
}

fn validate_layout(layout: &LayoutSettings) -> Result<(), FeedConfigError> {
    let mut previous = 0.0_f32;
    for (index, bp) in layout.breakpoints.iter().enumerate() {
        if bp.columns == 0 {
            return Err(FeedConfigError::EmptyBreakpoint { index });
        }
        if !bp.below_width.is_finite() || bp.below_width <= previous {
            return Err(FeedConfigError::BreakpointOrder {
                index,
                width: bp.below_width,
            });
        }
        previous = bp.below_width;
    }
    if layout.wide_columns == 0 {
        return Err(FeedConfigError::WideColumns);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnBreakpoint;

    #[test]
    fn defaults_pass() {
        assert_eq!(FeedConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_decay() {
        let mut config = FeedConfig::default();
        config.motion.manual_decay_rate = 0.0;
        assert_eq!(
            config.validate(),
            Err(FeedConfigError::NonPositive {
                field: "manual_decay_rate",
                value: 0.0
            })
        );
    }

    #[test]
    fn rejects_unordered_breakpoints() {
        let mut config = FeedConfig::default();
        config.layout.breakpoints = vec![
            ColumnBreakpoint::new(800.0, 2),
            ColumnBreakpoint::new(600.0, 3),
        ];
        assert_eq!(
            config.validate(),
            Err(FeedConfigError::BreakpointOrder {
                index: 1,
                width: 600.0
            })
        );
    }

    #[test]
    fn rejects_out_of_range_end_zone() {
        let mut config = FeedConfig::default();
        config.lifecycle.end_zone_ratio = 1.5;
        assert!(matches!(
            config.validate(),
            Err(FeedConfigError::EndZoneRatio(_))
        ));
    }

    #[test]
    fn rejects_zero_sponsored_interval() {
        let mut config = FeedConfig::default();
        config.sponsored.interval = 0;
        assert_eq!(
            config.validate(),
            Err(FeedConfigError::SponsoredInterval)
        );
    }
}
