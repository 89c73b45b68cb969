//! # Single-Axis Trajectory Planner
//!
//! Per-cycle control law turning a desired target position into a
//! commanded position that respects velocity, acceleration and position
//! bounds, with a decelerate-to-stop path when enable drops.
//!
//! ## Layers
//!
//! 1. **control**: `PlannerState::update`, the limiter and abort-stop
//! 2. **command**: per-cycle input record and call-boundary checks
//! 3. **cycle**: fixed-capacity axis bank, statistics, logging
//! 4. **sim**: scripted offline runs with a JSON-lines trace
//!
//! ```rust
//! use stp_common::axis::AxisLimits;
//! use stp_planner::control::PlannerState;
//!
//! let mut axis = PlannerState::at_rest(0.0).with_limits(&AxisLimits::unbounded(10.0, 100.0));
//! axis.enable = true;
//! axis.target_position = 1.0;
//! for _ in 0..1000 {
//!     axis.update(0.01);
//!     if !axis.active {
//!         break;
//!     }
//! }
//! assert_eq!(axis.commanded_position, 1.0);
//! ```

pub mod command;
pub mod config;
pub mod control;
pub mod cycle;
pub mod error;
pub mod sim;
pub mod state;
