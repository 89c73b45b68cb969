//! Planner controller: per-axis state and the per-cycle update.
//!
//! Each cycle either runs the abort-stop path (enable low) or hands the
//! full parameter set to the limiter and adopts its outputs. The update is
//! O(1), allocation-free and never blocks.

use stp_common::axis::{AxisLimits, MotionPhase, PlannerFlags, PositionBounds};

use super::abort::abort_stop;
use super::limiter::{LimitParams, LimiterState, limit3};
use crate::state::{CycleMotion, classify};

/// Planner state for one axis.
///
/// Created once per axis, mutated only through [`PlannerState::update`]
/// (and the caller-owned inputs between cycles).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerState {
    /// Position commanded this cycle.
    pub commanded_position: f64,
    /// Tracked position.
    pub current_position: f64,
    /// Tracked velocity.
    pub current_velocity: f64,
    /// Desired final position.
    pub target_position: f64,
    /// Absolute position bounds.
    pub bounds: PositionBounds,
    /// Maximum speed [units/s].
    pub max_velocity: f64,
    /// Maximum acceleration [units/s²].
    pub max_acceleration: f64,
    /// Low → abort-stop.
    pub enable: bool,
    /// Output: motion in progress.
    pub active: bool,
    /// Output: a limit saturated this cycle.
    pub in_limit: bool,
    /// Forbid overshoot-mitigating reversals.
    pub disallow_backoff: bool,
    /// Output: phase of the last cycle.
    pub phase: MotionPhase,
    holding: bool,
    prior_target: f64,
    prior_output_velocity: f64,
}

impl Default for PlannerState {
    fn default() -> Self {
        Self::at_rest(0.0)
    }
}

impl PlannerState {
    /// Disabled, at rest at `position`, targeting it, with zero limits.
    pub const fn at_rest(position: f64) -> Self {
        Self {
            commanded_position: position,
            current_position: position,
            current_velocity: 0.0,
            target_position: position,
            bounds: PositionBounds::Unbounded,
            max_velocity: 0.0,
            max_acceleration: 0.0,
            enable: false,
            active: false,
            in_limit: false,
            disallow_backoff: false,
            phase: MotionPhase::Standstill,
            holding: false,
            prior_target: position,
            prior_output_velocity: 0.0,
        }
    }

    /// Builder-style limit assignment.
    pub fn with_limits(mut self, limits: &AxisLimits) -> Self {
        self.set_limits(limits);
        self
    }

    /// Replace velocity/acceleration limits and bounds.
    #[inline]
    pub fn set_limits(&mut self, limits: &AxisLimits) {
        self.max_velocity = limits.max_velocity;
        self.max_acceleration = limits.max_acceleration;
        self.bounds = limits.bounds;
    }

    /// Current limits.
    #[inline]
    pub fn limits(&self) -> AxisLimits {
        AxisLimits {
            max_velocity: self.max_velocity,
            max_acceleration: self.max_acceleration,
            bounds: self.bounds,
        }
    }

    /// Goal seen by the previous limiter cycle.
    #[inline]
    pub const fn prior_target(&self) -> f64 {
        self.prior_target
    }

    /// Velocity produced by the previous limiter cycle.
    #[inline]
    pub const fn prior_output_velocity(&self) -> f64 {
        self.prior_output_velocity
    }

    /// Status word for the last cycle.
    pub fn flags(&self) -> PlannerFlags {
        let mut f = PlannerFlags::empty();
        f.set(PlannerFlags::ACTIVE, self.active);
        f.set(PlannerFlags::IN_LIMIT, self.in_limit);
        f.set(PlannerFlags::ABORTING, !self.enable);
        f.set(PlannerFlags::BOUNDED, self.bounds.is_bounded());
        f.set(PlannerFlags::HOLDING, self.holding && self.active);
        f
    }

    /// Advance one control cycle of `period` seconds.
    ///
    /// `period` is trusted: callers validate it at the boundary
    /// (see [`crate::command`]).
    pub fn update(&mut self, period: f64) -> PlannerFlags {
        let speed_before = self.current_velocity.abs();
        let mut motion = LimiterState {
            position: self.current_position,
            velocity: self.current_velocity,
            prior_target: self.prior_target,
            prior_output_velocity: self.prior_output_velocity,
        };

        if !self.enable {
            let out = abort_stop(&mut motion, self.max_acceleration, period);
            self.commanded_position = out.commanded;
            self.active = out.active;
            self.in_limit = out.in_limit;
            self.holding = false;
        } else {
            let params = LimitParams {
                target: self.target_position,
                bounds: self.bounds,
                max_velocity: self.max_velocity,
                max_acceleration: self.max_acceleration,
                disallow_backoff: self.disallow_backoff,
            };
            let out = limit3(&mut motion, &params, period);
            self.commanded_position = out.commanded;
            self.active = out.active;
            self.in_limit = out.in_limit;
            self.holding = out.holding;
        }

        self.current_position = motion.position;
        self.current_velocity = motion.velocity;
        self.prior_target = motion.prior_target;
        self.prior_output_velocity = motion.prior_output_velocity;

        self.phase = classify(&CycleMotion {
            enable: self.enable,
            holding: self.holding,
            active: self.active,
            speed_before,
            speed_after: self.current_velocity.abs(),
        });

        self.flags()
    }
}
