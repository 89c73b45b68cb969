//! Shared library for the single-axis trajectory planner workspace.
//!
//! # Module Structure
//!
//! - [`axis`] - Limits, position bounds, status flags, axis configuration
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Axis counts and cycle timing bounds
//! - [`prelude`] - Common re-exports for convenience
//!
//! ```rust
//! use stp_common::prelude::*;
//!
//! let bounds = PositionBounds::range(-10.0, 10.0).unwrap();
//! assert_eq!(bounds.clamp(12.0), 10.0);
//! ```

pub mod axis;
pub mod config;
pub mod consts;
pub mod prelude;
