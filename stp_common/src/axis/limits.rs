//! Motion limits for a single planner axis.
//!
//! [`PositionBounds`] replaces the legacy "`min > max` means unbounded"
//! convention with an explicit variant. Numeric limit parameters carry
//! `MIN`/`MAX` configuration bounds checked at load time.

use serde::{Deserialize, Serialize};

use super::error::InputError;

/// Largest velocity limit accepted from configuration [units/s].
pub const MAX_VELOCITY_LIMIT: f64 = 1.0e6;

/// Largest acceleration limit accepted from configuration [units/s²].
pub const MAX_ACCELERATION_LIMIT: f64 = 1.0e9;

/// Absolute position bounds for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PositionBounds {
    /// Limits are enforced elsewhere (or not at all).
    #[default]
    Unbounded,
    /// Closed interval `[min, max]`. `min == max` pins the axis.
    Range { min: f64, max: f64 },
}

impl PositionBounds {
    /// Build a checked range.
    pub fn range(min: f64, max: f64) -> Result<Self, InputError> {
        let bounds = Self::Range { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Interpret a legacy `(min, max)` pair, where `min > max` disables
    /// the bound.
    pub fn from_legacy_pair(min: f64, max: f64) -> Self {
        if min > max {
            Self::Unbounded
        } else {
            Self::Range { min, max }
        }
    }

    /// `true` for a `Range` bound.
    #[inline]
    pub const fn is_bounded(&self) -> bool {
        matches!(self, Self::Range { .. })
    }

    /// Saturate a position into the bounds.
    #[inline]
    pub fn clamp(&self, position: f64) -> f64 {
        match *self {
            Self::Unbounded => position,
            Self::Range { min, max } => position.max(min).min(max),
        }
    }

    /// Whether `position` lies inside the closed interval.
    #[inline]
    pub fn contains(&self, position: f64) -> bool {
        match *self {
            Self::Unbounded => true,
            Self::Range { min, max } => position >= min && position <= max,
        }
    }

    /// Distance from `position` to the upper and lower bound, in that order.
    /// Infinite for an unbounded axis; negative outside the range.
    #[inline]
    pub fn headroom(&self, position: f64) -> (f64, f64) {
        match *self {
            Self::Unbounded => (f64::INFINITY, f64::INFINITY),
            Self::Range { min, max } => (max - position, position - min),
        }
    }

    /// Check the range is finite and ordered.
    pub fn validate(&self) -> Result<(), InputError> {
        match *self {
            Self::Unbounded => Ok(()),
            Self::Range { min, max } => {
                if !min.is_finite() {
                    return Err(InputError::NonFinite { field: "min_position" });
                }
                if !max.is_finite() {
                    return Err(InputError::NonFinite { field: "max_position" });
                }
                if min > max {
                    return Err(InputError::InvertedBounds { min, max });
                }
                Ok(())
            }
        }
    }
}

/// Velocity/acceleration limits plus bounds for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisLimits {
    /// Maximum speed [units/s], ≥ 0.
    pub max_velocity: f64,
    /// Maximum acceleration [units/s²], ≥ 0.
    pub max_acceleration: f64,
    /// Absolute position bounds.
    #[serde(default)]
    pub bounds: PositionBounds,
}

impl AxisLimits {
    /// Limits with no position bounds.
    pub const fn unbounded(max_velocity: f64, max_acceleration: f64) -> Self {
        Self {
            max_velocity,
            max_acceleration,
            bounds: PositionBounds::Unbounded,
        }
    }

    /// Whether either rate limit is zero, which holds the axis in place.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.max_velocity <= 0.0 || self.max_acceleration <= 0.0
    }

    /// Call-boundary check: finite, non-negative limits and a valid range.
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.max_velocity.is_finite() {
            return Err(InputError::NonFinite { field: "max_velocity" });
        }
        if !self.max_acceleration.is_finite() {
            return Err(InputError::NonFinite { field: "max_acceleration" });
        }
        if self.max_velocity < 0.0 {
            return Err(InputError::NegativeVelocityLimit(self.max_velocity));
        }
        if self.max_acceleration < 0.0 {
            return Err(InputError::NegativeAccelerationLimit(self.max_acceleration));
        }
        self.bounds.validate()
    }
}
