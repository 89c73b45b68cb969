//! Axis-level shared types.
//!
//! Organized by concern: limits and bounds, boundary errors, status
//! reporting, and TOML configuration.

pub mod config;
pub mod error;
pub mod limits;
pub mod status;

pub use error::InputError;
pub use limits::{AxisLimits, PositionBounds};
pub use status::{MotionPhase, PlannerFlags};
