//! Planner configuration: one TOML file describing the axis bank and an
//! optional event script for offline runs.
//!
//! ```toml
//! [shared]
//! service_name = "stp-sim"
//!
//! [planner]
//! cycle_time_us = 1000
//!
//! [[axes]]
//! name = "X"
//! max_velocity = 10.0
//! max_acceleration = 100.0
//!
//! [[script]]
//! cycle = 0
//! axis = "X"
//! target = 1.0
//! enable = true
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stp_common::axis::config::{AxisConfig, PlannerSection};
use stp_common::config::{ConfigError, ConfigLoader, SharedConfig, Validate};
use stp_common::consts::MAX_AXES;

use crate::cycle::AXIS_NAME_CAPACITY;

/// One `[[script]]` entry: parameter changes applied to an axis at the
/// start of `cycle`. Omitted fields keep their current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptEvent {
    pub cycle: u64,
    pub axis: String,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub enable: Option<bool>,
    #[serde(default)]
    pub max_velocity: Option<f64>,
    #[serde(default)]
    pub max_acceleration: Option<f64>,
    #[serde(default)]
    pub disallow_backoff: Option<bool>,
}

/// Complete planner configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    pub shared: SharedConfig,
    #[serde(default)]
    pub planner: PlannerSection,
    pub axes: Vec<AxisConfig>,
    #[serde(default)]
    pub script: Vec<ScriptEvent>,
}

impl Validate for PlannerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.planner.validate()?;

        if self.axes.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one [[axes]] entry is required".to_string(),
            ));
        }
        if self.axes.len() > MAX_AXES {
            return Err(ConfigError::ValidationError(format!(
                "{} axes configured, maximum is {MAX_AXES}",
                self.axes.len()
            )));
        }

        let mut names = HashSet::with_capacity(self.axes.len());
        for axis in &self.axes {
            axis.validate()?;
            if axis.name.len() > AXIS_NAME_CAPACITY {
                return Err(ConfigError::ValidationError(format!(
                    "axis name '{}' longer than {AXIS_NAME_CAPACITY} bytes",
                    axis.name
                )));
            }
            if !names.insert(axis.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate axis name '{}'",
                    axis.name
                )));
            }
        }

        // Event values go through the per-cycle boundary at run time.
        for event in &self.script {
            if !names.contains(event.axis.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "script event at cycle {} names unknown axis '{}'",
                    event.cycle, event.axis
                )));
            }
        }
        Ok(())
    }
}

/// Load and validate a planner configuration file.
///
/// Does not log: the binary reads the config before its subscriber exists.
pub fn load_config(path: &Path) -> Result<PlannerConfig, ConfigError> {
    PlannerConfig::load_validated(path)
}
