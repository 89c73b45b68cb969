//! Common re-exports: `use stp_common::prelude::*;`

use std::time::Duration;

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::axis::config::{AxisConfig, PlannerSection};
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig, Validate};

// ─── Axis Types ─────────────────────────────────────────────────────
pub use crate::axis::{AxisLimits, InputError, MotionPhase, PlannerFlags, PositionBounds};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{CYCLE_TIME_US, MAX_AXES, cycle_period_s};

/// Default cycle time as a `Duration`.
pub const DEFAULT_CYCLE_TIME: Duration = Duration::from_micros(CYCLE_TIME_US as u64);
