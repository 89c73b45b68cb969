//! Per-cycle call boundary.
//!
//! The caller's command for one cycle is a [`CycleInput`]. It is checked
//! here before anything reaches the control law: limits must be finite and
//! non-negative, the target finite, the bounds ordered and the period
//! finite and positive.

use stp_common::axis::error::check_period;
use stp_common::axis::{AxisLimits, InputError, PositionBounds};

use crate::control::PlannerState;

/// Caller-owned command merged into a [`PlannerState`] each cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleInput {
    pub enable: bool,
    pub target_position: f64,
    pub bounds: PositionBounds,
    pub max_velocity: f64,
    pub max_acceleration: f64,
    pub disallow_backoff: bool,
    /// Cycle period [s].
    pub period: f64,
}

impl CycleInput {
    /// Input that keeps `state` doing what it is doing.
    pub fn from_state(state: &PlannerState, period: f64) -> Self {
        Self {
            enable: state.enable,
            target_position: state.target_position,
            bounds: state.bounds,
            max_velocity: state.max_velocity,
            max_acceleration: state.max_acceleration,
            disallow_backoff: state.disallow_backoff,
            period,
        }
    }

    #[inline]
    pub fn limits(&self) -> AxisLimits {
        AxisLimits {
            max_velocity: self.max_velocity,
            max_acceleration: self.max_acceleration,
            bounds: self.bounds,
        }
    }

    /// Check every precondition of the control law.
    pub fn validate(&self) -> Result<(), InputError> {
        check_period(self.period)?;
        if !self.target_position.is_finite() {
            return Err(InputError::NonFinite {
                field: "target_position",
            });
        }
        self.limits().validate()
    }

    /// Merge into `state` if valid.
    ///
    /// On rejection the previous parameters stay in place and `enable` is
    /// forced low, so the axis abort-stops at its last valid acceleration.
    pub fn apply_to(&self, state: &mut PlannerState) -> Result<(), InputError> {
        if let Err(e) = self.validate() {
            state.enable = false;
            return Err(e);
        }
        state.enable = self.enable;
        state.target_position = self.target_position;
        state.disallow_backoff = self.disallow_backoff;
        state.set_limits(&self.limits());
        Ok(())
    }
}
