//! Axis configuration as read from TOML.
//!
//! Optional fields use `#[serde(default)]`; unknown fields are rejected so
//! a misspelled limit never silently falls back to a default.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::{CYCLE_TIME_US, CYCLE_TIME_US_MAX, CYCLE_TIME_US_MIN, cycle_period_s};

use super::limits::{AxisLimits, MAX_ACCELERATION_LIMIT, MAX_VELOCITY_LIMIT, PositionBounds};

/// `[planner]` section: timing shared by every axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerSection {
    /// Control cycle time [µs].
    #[serde(default = "default_cycle_time_us")]
    pub cycle_time_us: u32,
}

fn default_cycle_time_us() -> u32 {
    CYCLE_TIME_US
}

impl Default for PlannerSection {
    fn default() -> Self {
        Self {
            cycle_time_us: CYCLE_TIME_US,
        }
    }
}

impl PlannerSection {
    /// Cycle period in seconds.
    #[inline]
    pub fn period_s(&self) -> f64 {
        cycle_period_s(self.cycle_time_us)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(CYCLE_TIME_US_MIN..=CYCLE_TIME_US_MAX).contains(&self.cycle_time_us) {
            return Err(ConfigError::ValidationError(format!(
                "cycle_time_us {} outside [{CYCLE_TIME_US_MIN}, {CYCLE_TIME_US_MAX}]",
                self.cycle_time_us
            )));
        }
        Ok(())
    }
}

/// One `[[axes]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisConfig {
    /// Axis name, unique within a planner bank.
    pub name: String,
    /// Maximum speed [units/s].
    pub max_velocity: f64,
    /// Maximum acceleration [units/s²].
    pub max_acceleration: f64,
    /// Lower position bound; requires `max_position`.
    #[serde(default)]
    pub min_position: Option<f64>,
    /// Upper position bound; requires `min_position`.
    #[serde(default)]
    pub max_position: Option<f64>,
    /// Forbid overshoot-mitigating reversals.
    #[serde(default)]
    pub disallow_backoff: bool,
    /// Position the axis starts at.
    #[serde(default)]
    pub initial_position: f64,
}

impl AxisConfig {
    /// Position bounds described by the optional min/max pair.
    pub fn bounds(&self) -> Result<PositionBounds, ConfigError> {
        match (self.min_position, self.max_position) {
            (None, None) => Ok(PositionBounds::Unbounded),
            (Some(min), Some(max)) => PositionBounds::range(min, max)
                .map_err(|e| ConfigError::ValidationError(format!("axis '{}': {e}", self.name))),
            _ => Err(ConfigError::ValidationError(format!(
                "axis '{}': min_position and max_position must be given together",
                self.name
            ))),
        }
    }

    /// Limits record for the planner.
    pub fn limits(&self) -> Result<AxisLimits, ConfigError> {
        Ok(AxisLimits {
            max_velocity: self.max_velocity,
            max_acceleration: self.max_acceleration,
            bounds: self.bounds()?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "axis name cannot be empty".to_string(),
            ));
        }
        let limits = self.limits()?;
        limits
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("axis '{}': {e}", self.name)))?;
        if limits.max_velocity > MAX_VELOCITY_LIMIT {
            return Err(ConfigError::ValidationError(format!(
                "axis '{}': max_velocity {} exceeds {MAX_VELOCITY_LIMIT}",
                self.name, limits.max_velocity
            )));
        }
        if limits.max_acceleration > MAX_ACCELERATION_LIMIT {
            return Err(ConfigError::ValidationError(format!(
                "axis '{}': max_acceleration {} exceeds {MAX_ACCELERATION_LIMIT}",
                self.name, limits.max_acceleration
            )));
        }
        if !self.initial_position.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "axis '{}': initial_position is not finite",
                self.name
            )));
        }
        if !limits.bounds.contains(self.initial_position) {
            return Err(ConfigError::ValidationError(format!(
                "axis '{}': initial_position {} outside bounds",
                self.name, self.initial_position
            )));
        }
        Ok(())
    }
}
