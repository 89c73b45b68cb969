//! Velocity/acceleration limiter ("limit3").
//!
//! Advances a tracked position by at most one cycle of motion toward a
//! target, bounded by `max_velocity` and `max_acceleration * period`.
//!
//! ## Profile
//!
//! The requested velocity is the fastest one from which the axis can still
//! come to rest exactly on the goal when it decelerates by `Δv = a·dt` every
//! following cycle ([`stopping_speed`]). Clamping that request to `±vmax`
//! and to `[v − Δv, v + Δv]` yields the trapezoid: ramp at the acceleration
//! limit, cruise at `vmax` where the distance allows it, and follow the
//! discrete stopping curve down. Short moves never reach `vmax` (triangle).
//!
//! ## Moving targets
//!
//! The goal velocity is estimated from the previous goal. It is fed forward
//! only while the axis is already moving within one cycle of acceleration of
//! it (`prior_output_velocity`). A step or a reversal of the target fails
//! that test and the goal is treated as static for the cycle.
//!
//! ## Backoff
//!
//! With backoff allowed the axis may overshoot a goal that stopped or
//! reversed and come back. With `disallow_backoff` the request is never
//! directed away from the goal and never exceeds the stopping speed for the
//! current distance to it, feed-forward included. A goal that stops, or
//! moves away, is therefore never passed. Only a goal that jumps toward the
//! axis faster than it can brake is passed; the output velocity then comes
//! to rest before it reverses, never changing sign within a cycle.
//!
//! ## Bounds
//!
//! The target is saturated into [`PositionBounds`], and the request is capped
//! by the stopping speed toward each bound, so an axis that starts inside the
//! range stays inside it without a discontinuous clamp.

use stp_common::axis::PositionBounds;

/// Relative tolerance for landing exactly on the goal.
const LANDING_EPSILON: f64 = 1e-12;

/// Parameters for one limiter cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitParams {
    /// Desired final position (saturated into `bounds`).
    pub target: f64,
    /// Absolute position bounds.
    pub bounds: PositionBounds,
    /// Maximum speed [units/s].
    pub max_velocity: f64,
    /// Maximum acceleration [units/s²].
    pub max_acceleration: f64,
    /// Never move faster toward the goal than a stop on it allows.
    pub disallow_backoff: bool,
}

/// Motion state carried by the limiter between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LimiterState {
    /// Tracked position.
    pub position: f64,
    /// Tracked velocity.
    pub velocity: f64,
    /// Goal seen on the previous limiter cycle.
    pub prior_target: f64,
    /// Velocity produced by the previous limiter cycle.
    pub prior_output_velocity: f64,
}

impl LimiterState {
    /// At rest at `position`, with history pointing at it.
    pub const fn at_rest(position: f64) -> Self {
        Self {
            position,
            velocity: 0.0,
            prior_target: position,
            prior_output_velocity: 0.0,
        }
    }

    /// Reinitialize history to the current position with zero velocity.
    #[inline]
    pub fn reset_history(&mut self) {
        self.prior_target = self.position;
        self.prior_output_velocity = 0.0;
    }
}

/// Result of one limiter cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitOutcome {
    /// Position to command this cycle.
    pub commanded: f64,
    /// Target after saturation into the bounds.
    pub goal: f64,
    /// Motion in progress: position gap or nonzero velocity.
    pub active: bool,
    /// Velocity, acceleration or bound saturated.
    pub in_limit: bool,
    /// Goal velocity was fed forward.
    pub tracking: bool,
    /// A zero limit held the axis in place.
    pub holding: bool,
}

/// Largest speed from which an axis decelerating by `max_dv` per cycle
/// still comes to rest after covering exactly `distance`.
///
/// With `n` cycles left the covered distance is `n·v − Δv·n(n−1)/2` (times
/// `dt`), with the last step in `(0, Δv]`. Returns 0 for non-positive
/// distances and `INFINITY` when the step count overflows.
pub fn stopping_speed(distance: f64, max_dv: f64, period: f64) -> f64 {
    if !(distance > 0.0) {
        return 0.0;
    }
    let steps = distance / (max_dv * period);
    if !steps.is_finite() {
        return f64::INFINITY;
    }
    let n = ((-1.0 + (1.0 + 8.0 * steps).sqrt()) * 0.5).ceil().max(1.0);
    (distance / period + max_dv * n * (n - 1.0) * 0.5) / n
}

/// Run one limiter cycle, updating `state` in place.
pub fn limit3(state: &mut LimiterState, params: &LimitParams, period: f64) -> LimitOutcome {
    let goal = params.bounds.clamp(params.target);
    let max_velocity = params.max_velocity;
    let max_dv = params.max_acceleration * period;

    if !(period > 0.0 && max_velocity > 0.0 && max_dv > 0.0) {
        return hold(state, goal);
    }

    let position = state.position;
    let velocity = state.velocity;

    let goal_velocity = ((goal - state.prior_target) / period)
        .max(-max_velocity)
        .min(max_velocity);
    let tracking = state.prior_output_velocity != 0.0
        && (goal_velocity - state.prior_output_velocity).abs() <= max_dv;
    let feedforward = if tracking { goal_velocity } else { 0.0 };

    // Gap left after the goal's own motion this cycle.
    let gap = goal - position - feedforward * period;
    let mut request = feedforward + gap.signum() * stopping_speed(gap.abs(), max_dv, period);

    if params.bounds.is_bounded() && params.bounds.contains(position) {
        let (up, down) = params.bounds.headroom(position);
        request = request
            .max(-stopping_speed(down, max_dv, period))
            .min(stopping_speed(up, max_dv, period));
    }

    if params.disallow_backoff {
        let to_goal = goal - position;
        let cap = stopping_speed(to_goal.abs(), max_dv, period);
        request = if to_goal > 0.0 {
            request.max(0.0).min(cap)
        } else if to_goal < 0.0 {
            request.min(0.0).max(-cap)
        } else {
            0.0
        };
    }

    let limited = request.max(-max_velocity).min(max_velocity);
    let velocity_saturated = limited != request;

    let mut next_velocity = limited.max(velocity - max_dv).min(velocity + max_dv);
    let accel_saturated = next_velocity != limited;

    if params.disallow_backoff && velocity * next_velocity < 0.0 {
        next_velocity = 0.0;
    }

    let mut next_position = position + next_velocity * period;
    if (next_position - goal).abs() <= LANDING_EPSILON * (1.0 + goal.abs()) {
        next_position = goal;
    }

    // Only reachable from a state that entered the cycle unable to stop in range.
    let mut bound_clamped = false;
    if params.bounds.contains(position) && !params.bounds.contains(next_position) {
        next_position = params.bounds.clamp(next_position);
        next_velocity = (next_position - position) / period;
        bound_clamped = true;
    }

    state.position = next_position;
    state.velocity = next_velocity;
    state.prior_target = goal;
    state.prior_output_velocity = next_velocity;

    LimitOutcome {
        commanded: next_position,
        goal,
        active: next_position != goal || next_velocity != 0.0,
        in_limit: velocity_saturated || accel_saturated || bound_clamped,
        tracking,
        holding: false,
    }
}

/// Zero rate limit: stay where we are.
fn hold(state: &mut LimiterState, goal: f64) -> LimitOutcome {
    state.velocity = 0.0;
    state.prior_target = goal;
    state.prior_output_velocity = 0.0;
    let active = state.position != goal;
    LimitOutcome {
        commanded: state.position,
        goal,
        active,
        in_limit: active,
        tracking: false,
        holding: true,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
