//! Property tests: limits hold for arbitrary limits, periods and target
//! sequences.

use proptest::prelude::*;
use stp_common::axis::{AxisLimits, PositionBounds};
use stp_planner::control::PlannerState;

/// Absolute slack for accumulated rounding.
const EPS: f64 = 1e-6;

fn limits() -> impl Strategy<Value = (f64, f64, f64)> {
    // (max_velocity, max_acceleration, period)
    (0.1f64..100.0, 1.0f64..5000.0, 0.0005f64..0.02)
}

fn enabled(limits: AxisLimits, start: f64) -> PlannerState {
    let mut s = PlannerState::at_rest(start).with_limits(&limits);
    s.enable = true;
    s
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn velocity_and_acceleration_stay_limited(
        (vmax, amax, dt) in limits(),
        targets in prop::collection::vec(-50.0f64..50.0, 1..8),
        hold in 1usize..200,
    ) {
        let mut s = enabled(AxisLimits::unbounded(vmax, amax), 0.0);
        let dv = amax * dt;
        let mut prev_v = 0.0;
        for target in targets {
            s.target_position = target;
            for _ in 0..hold {
                s.update(dt);
                let v = s.current_velocity;
                prop_assert!(v.abs() <= vmax + EPS, "|v| {} > {}", v, vmax);
                prop_assert!((v - prev_v).abs() <= dv + EPS, "dv {} > {}", v - prev_v, dv);
                prev_v = v;
            }
        }
    }

    #[test]
    fn commanded_position_stays_in_bounds(
        (vmax, amax, dt) in limits(),
        (min, width) in (-20.0f64..20.0, 0.0f64..10.0),
        start_frac in 0.0f64..=1.0,
        targets in prop::collection::vec(-100.0f64..100.0, 1..50),
        hold in 1usize..40,
    ) {
        let max = min + width;
        let bounds = PositionBounds::Range { min, max };
        let start = bounds.clamp(min + start_frac * width);
        let limits = AxisLimits { max_velocity: vmax, max_acceleration: amax, bounds };
        let mut s = enabled(limits, start);
        for target in targets {
            s.target_position = target;
            for _ in 0..hold {
                s.update(dt);
                prop_assert!(
                    s.commanded_position >= min && s.commanded_position <= max,
                    "{} outside [{}, {}]", s.commanded_position, min, max
                );
            }
        }
    }

    #[test]
    fn fixed_target_from_rest_without_backoff_is_monotone(
        (vmax, amax, dt) in limits(),
        start in -2.0f64..2.0,
        target in -2.0f64..2.0,
    ) {
        let mut s = enabled(AxisLimits::unbounded(vmax, amax), start);
        s.disallow_backoff = true;
        s.target_position = target;
        let dir = (target - start).signum();

        let mut prev = start;
        let mut settled = false;
        for _ in 0..200_000 {
            s.update(dt);
            let p = s.commanded_position;
            prop_assert!(s.current_velocity * dir >= 0.0, "reversal: v = {}", s.current_velocity);
            prop_assert!((p - prev) * dir >= -EPS, "moved backwards {} -> {}", prev, p);
            prop_assert!((p - target) * dir <= EPS, "overshoot to {} (target {})", p, target);
            prev = p;
            if !s.active {
                settled = true;
                break;
            }
        }
        prop_assert!(settled);
        prop_assert_eq!(s.commanded_position, target);
    }

    #[test]
    fn ramped_goal_that_stops_is_not_passed_without_backoff(
        (vmax, amax, dt) in (0.5f64..50.0, 50.0f64..5000.0, 0.001f64..0.02),
        speed_frac in 0.1f64..0.9,
        ramp in 1usize..300,
    ) {
        let mut s = enabled(AxisLimits::unbounded(vmax, amax), 0.0);
        s.disallow_backoff = true;
        let rate = speed_frac * vmax;
        let goal = rate * dt * ramp as f64;

        let mut settled = false;
        for cycle in 1..=20_000usize {
            s.target_position = rate * dt * cycle.min(ramp) as f64;
            s.update(dt);
            prop_assert!(s.current_velocity >= -EPS, "reversal: v = {}", s.current_velocity);
            prop_assert!(s.commanded_position <= goal + EPS, "passed {} -> {}", goal, s.commanded_position);
            if cycle > ramp && !s.active {
                settled = true;
                break;
            }
        }
        prop_assert!(settled);
        prop_assert!((s.commanded_position - goal).abs() <= EPS);
    }

    #[test]
    fn abort_stops_within_velocity_over_max_dv(
        (vmax, amax, dt) in limits(),
        cruise in 1usize..500,
    ) {
        let mut s = enabled(AxisLimits::unbounded(vmax, amax), 0.0);
        s.target_position = 1.0e9;
        for _ in 0..cruise {
            s.update(dt);
        }
        let v0 = s.current_velocity.abs();
        let dv = amax * dt;

        s.enable = false;
        // One extra cycle for rounding when v0 / dv is integral.
        let bound = (v0 / dv).ceil() as usize + 1;
        let mut cycles = 0;
        while s.active || cycles == 0 {
            s.update(dt);
            cycles += 1;
            prop_assert!(cycles <= bound.max(1), "{} cycles > {}", cycles, bound);
        }
        prop_assert_eq!(s.current_velocity, 0.0);

        let held = s.commanded_position;
        for _ in 0..5 {
            s.update(dt);
            prop_assert!(!s.active);
            prop_assert_eq!(s.commanded_position, held);
        }
    }

    #[test]
    fn at_rest_on_target_is_idempotent(
        (vmax, amax, dt) in limits(),
        position in -1.0e3f64..1.0e3,
        bounded in any::<bool>(),
    ) {
        let bounds = if bounded {
            PositionBounds::Range { min: position - 1.0, max: position + 1.0 }
        } else {
            PositionBounds::Unbounded
        };
        let limits = AxisLimits { max_velocity: vmax, max_acceleration: amax, bounds };
        let mut s = enabled(limits, position);
        for _ in 0..10 {
            s.update(dt);
            prop_assert!(!s.active);
            prop_assert!(!s.in_limit);
            prop_assert_eq!(s.commanded_position, position);
            prop_assert_eq!(s.current_velocity, 0.0);
        }
    }

    #[test]
    fn enable_toggling_never_jumps(
        (vmax, amax, dt) in limits(),
        schedule in prop::collection::vec((any::<bool>(), -20.0f64..20.0, 1usize..30), 1..20),
    ) {
        let mut s = enabled(AxisLimits::unbounded(vmax, amax), 0.0);
        let mut prev = s.commanded_position;
        for (enable, target, hold) in schedule {
            s.enable = enable;
            s.target_position = target;
            for _ in 0..hold {
                s.update(dt);
                let jump = (s.commanded_position - prev).abs();
                prop_assert!(jump <= 2.0 * vmax * dt + EPS, "jump {}", jump);
                prev = s.commanded_position;
            }
        }
    }
}
