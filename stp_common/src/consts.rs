//! System-wide constants for the planner workspace.
//!
//! Single source of truth for axis counts, cycle timing bounds and default
//! paths. Limit bounds for individual parameters live next to their types
//! in [`crate::axis::limits`].

use static_assertions::const_assert;

/// Maximum number of axes a single planner bank can own.
pub const MAX_AXES: usize = 16;

/// Default control cycle time in microseconds (1 kHz = 1000 µs).
pub const CYCLE_TIME_US: u32 = 1000;

/// Shortest accepted cycle time [µs].
pub const CYCLE_TIME_US_MIN: u32 = 50;

/// Longest accepted cycle time [µs].
pub const CYCLE_TIME_US_MAX: u32 = 100_000;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/planner.toml";

const_assert!(MAX_AXES > 0 && MAX_AXES <= 64);
const_assert!(CYCLE_TIME_US_MIN <= CYCLE_TIME_US && CYCLE_TIME_US <= CYCLE_TIME_US_MAX);

/// Convert a cycle time in microseconds to the planner period in seconds.
#[inline]
pub fn cycle_period_s(cycle_time_us: u32) -> f64 {
    f64::from(cycle_time_us) / 1_000_000.0
}
