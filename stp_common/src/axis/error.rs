//! Call-boundary rejection reasons.
//!
//! The control law has no error return: every precondition is checked
//! before a cycle input reaches it, and a violation is reported here.

use thiserror::Error;

/// A per-cycle input violated the planner's preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InputError {
    #[error("max_velocity must be >= 0 (got {0})")]
    NegativeVelocityLimit(f64),

    #[error("max_acceleration must be >= 0 (got {0})")]
    NegativeAccelerationLimit(f64),

    #[error("{field} is not finite")]
    NonFinite { field: &'static str },

    #[error("period must be finite and > 0 (got {0})")]
    InvalidPeriod(f64),

    #[error("min_position {min} exceeds max_position {max}")]
    InvertedBounds { min: f64, max: f64 },
}

/// Check a control period in seconds.
#[inline]
pub fn check_period(period: f64) -> Result<(), InputError> {
    if period.is_finite() && period > 0.0 {
        Ok(())
    } else {
        Err(InputError::InvalidPeriod(period))
    }
}
