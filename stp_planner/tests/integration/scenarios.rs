//! Integration test: end-to-end moves through `PlannerState::update`.

use stp_common::axis::{AxisLimits, MotionPhase, PlannerFlags, PositionBounds};
use stp_planner::command::CycleInput;
use stp_planner::control::PlannerState;
use stp_planner::cycle::{AxisPlanner, CycleRunner};

const DT: f64 = 0.01;
const EPS: f64 = 1e-9;

// ── Helpers ─────────────────────────────────────────────────────────

fn axis(vmax: f64, amax: f64) -> PlannerState {
    PlannerState::at_rest(0.0).with_limits(&AxisLimits::unbounded(vmax, amax))
}

/// Per-cycle samples of (commanded, velocity, active) until settled.
fn run_to_rest(state: &mut PlannerState, max_cycles: usize) -> Vec<(f64, f64, bool)> {
    let mut samples = Vec::new();
    for _ in 0..max_cycles {
        state.update(DT);
        samples.push((state.commanded_position, state.current_velocity, state.active));
        if !state.active {
            break;
        }
    }
    samples
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn zero_to_one_converges_within_limits() {
    let mut s = axis(10.0, 100.0);
    s.enable = true;
    s.target_position = 1.0;

    let samples = run_to_rest(&mut s, 1000);
    let (last_cmd, last_v, last_active) = *samples.last().unwrap();
    assert_eq!(last_cmd, 1.0);
    assert_eq!(last_v, 0.0);
    assert!(!last_active);

    let mut prev_v = 0.0;
    for &(cmd, v, _) in &samples {
        assert!(v.abs() <= 10.0 + EPS, "|v| = {v}");
        assert!((v - prev_v).abs() <= 1.0 + EPS, "dv = {}", v - prev_v);
        assert!(cmd <= 1.0, "overshoot to {cmd}");
        prev_v = v;
    }

    // Once settled it stays settled.
    for _ in 0..10 {
        s.update(DT);
        assert!(!s.active);
        assert_eq!(s.commanded_position, 1.0);
    }
}

#[test]
fn negative_move_is_symmetric() {
    let mut up = axis(10.0, 100.0);
    up.enable = true;
    up.target_position = 2.0;
    let mut down = axis(10.0, 100.0);
    down.enable = true;
    down.target_position = -2.0;

    let a = run_to_rest(&mut up, 1000);
    let b = run_to_rest(&mut down, 1000);
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert!((x.0 + y.0).abs() < EPS);
    }
}

#[test]
fn enable_toggle_keeps_command_continuous() {
    let mut s = axis(10.0, 100.0);
    s.enable = true;
    s.target_position = 50.0;

    let mut prev = s.commanded_position;
    for cycle in 0..400 {
        // Toggle every 7 cycles, mid-move and mid-abort.
        if cycle % 7 == 0 {
            s.enable = !s.enable;
        }
        s.update(DT);
        let jump = (s.commanded_position - prev).abs();
        assert!(jump <= 2.0 * 10.0 * DT + EPS, "cycle {cycle}: jump {jump}");
        prev = s.commanded_position;
    }
}

#[test]
fn zero_limits_hold_position_finitely() {
    for limits in [
        AxisLimits::unbounded(0.0, 100.0),
        AxisLimits::unbounded(10.0, 0.0),
        AxisLimits::unbounded(0.0, 0.0),
    ] {
        let mut s = PlannerState::at_rest(3.0).with_limits(&limits);
        s.enable = true;
        s.target_position = 7.0;
        for _ in 0..5 {
            let flags = s.update(DT);
            assert!(flags.contains(PlannerFlags::HOLDING));
            assert_eq!(s.commanded_position, 3.0);
            assert_eq!(s.current_velocity, 0.0);
            assert!(s.commanded_position.is_finite());
        }
    }
}

#[test]
fn target_outside_bounds_stops_at_bound() {
    let limits = AxisLimits {
        max_velocity: 10.0,
        max_acceleration: 100.0,
        bounds: PositionBounds::Range {
            min: -1.0,
            max: 1.0,
        },
    };
    let mut s = PlannerState::at_rest(0.0).with_limits(&limits);
    s.enable = true;
    s.target_position = -25.0;

    let samples = run_to_rest(&mut s, 1000);
    assert!(samples.iter().all(|&(cmd, _, _)| (-1.0..=1.0).contains(&cmd)));
    assert_eq!(s.commanded_position, -1.0);
    assert!(!s.active);
}

#[test]
fn ramp_target_is_tracked_after_catch_up() {
    let mut s = axis(10.0, 100.0);
    s.enable = true;

    let mut target = 0.0;
    for cycle in 0..400 {
        target += 3.0 * DT;
        s.target_position = target;
        s.update(DT);
        if cycle > 100 {
            assert!((s.commanded_position - target).abs() < 1e-6, "cycle {cycle}");
            assert_eq!(s.phase, MotionPhase::Cruising);
        }
    }
    assert!((s.current_velocity - 3.0).abs() < 1e-6);
}

#[test]
fn retarget_mid_move_reverses_and_settles() {
    let mut s = axis(10.0, 100.0);
    s.enable = true;
    s.target_position = 5.0;
    for _ in 0..30 {
        s.update(DT);
    }
    assert!(s.current_velocity > 0.0);

    s.target_position = -1.0;
    let samples = run_to_rest(&mut s, 2000);
    assert!(samples.iter().any(|&(_, v, _)| v < 0.0));
    assert_eq!(s.commanded_position, -1.0);
}

#[test]
fn disallow_backoff_comes_to_rest_before_reversing() {
    let mut s = axis(10.0, 100.0);
    s.enable = true;
    s.disallow_backoff = true;
    s.target_position = 5.0;
    for _ in 0..30 {
        s.update(DT);
    }

    s.target_position = -1.0;
    let mut prev_v = s.current_velocity;
    let mut saw_rest = false;
    for _ in 0..2000 {
        s.update(DT);
        let v = s.current_velocity;
        assert!(prev_v * v >= 0.0, "sign flip {prev_v} -> {v}");
        saw_rest |= v == 0.0;
        prev_v = v;
        if !s.active {
            break;
        }
    }
    assert!(saw_rest);
    assert_eq!(s.commanded_position, -1.0);
}

#[test]
fn axis_bank_steps_all_axes_to_their_targets() {
    let mut runner = CycleRunner::new(0.001).unwrap();
    let targets = [("X", 0.2), ("Y", -0.3), ("Z", 0.05), ("A", 0.0)];
    for (name, _) in targets {
        runner
            .add_axis(AxisPlanner::new(name, &AxisLimits::unbounded(1.0, 10.0), 0.0).unwrap())
            .unwrap();
    }
    for (name, target) in targets {
        let index = runner.axis_index(name).unwrap();
        let input = CycleInput {
            enable: true,
            target_position: target,
            ..runner.axis(index).unwrap().input(0.001)
        };
        runner.apply(name, &input).unwrap();
    }

    let cycles = runner.run_until_settled(10_000).expect("bank settles");
    assert!(cycles > 100);
    for ((_, target), axis) in targets.iter().zip(runner.axes()) {
        assert_eq!(axis.state().commanded_position, *target);
        assert!(!axis.state().active);
    }
    assert_eq!(runner.stats().cycle_count, cycles);
}
