//! Abort-stop: bring a disabled axis to rest at the acceleration limit.
//!
//! Runs in closed form, without the limiter. Once the residual speed fits
//! inside one cycle of acceleration the axis snaps to a clean rest state,
//! so `active` clears instead of creeping toward zero.

use super::limiter::LimiterState;

/// Result of one abort-stop cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbortOutcome {
    /// Position commanded this cycle (tracked position before integration).
    pub commanded: f64,
    /// Still decelerating.
    pub active: bool,
    /// Decelerating at the acceleration limit.
    pub in_limit: bool,
    /// Came to rest this cycle; history was reinitialized.
    pub settled: bool,
}

/// Run one abort-stop cycle.
///
/// A zero acceleration limit settles immediately: the axis cannot ramp, so
/// it holds position rather than coasting.
pub fn abort_stop(state: &mut LimiterState, max_acceleration: f64, period: f64) -> AbortOutcome {
    let max_dv = max_acceleration * period;

    if !(max_dv > 0.0) || state.velocity.abs() <= max_dv {
        state.velocity = 0.0;
        state.reset_history();
        return AbortOutcome {
            commanded: state.position,
            active: false,
            in_limit: false,
            settled: true,
        };
    }

    let commanded = state.position;

    // |v| > max_dv here, so one step never crosses zero.
    state.velocity -= state.velocity.signum() * max_dv;
    state.position += state.velocity * period;

    AbortOutcome {
        commanded,
        active: state.velocity != 0.0,
        in_limit: true,
        settled: false,
    }
}
