//! Control law root.
//!
//! [`planner`] owns the per-axis state and picks a path each cycle:
//! [`limiter`] while enabled, [`abort`] otherwise. Neither path allocates,
//! logs, or fails.

pub mod abort;
pub mod limiter;
pub mod planner;

pub use abort::{AbortOutcome, abort_stop};
pub use limiter::{LimitOutcome, LimitParams, LimiterState, limit3, stopping_speed};
pub use planner::PlannerState;
