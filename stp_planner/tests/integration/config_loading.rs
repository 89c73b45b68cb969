//! Integration test: configuration file → axis bank → simulation.

use std::io::Write;
use std::path::Path;

use stp_common::axis::{MotionPhase, PositionBounds};
use stp_common::config::ConfigError;
use stp_planner::config::load_config;
use stp_planner::cycle::CycleRunner;
use stp_planner::sim::Simulation;
use tempfile::NamedTempFile;

fn sample_config_path() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../config/planner.toml"))
}

fn write_config(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn sample_config_loads_and_builds_bank() {
    let config = load_config(sample_config_path()).unwrap();
    let runner = CycleRunner::from_config(&config).unwrap();
    assert_eq!(runner.len(), 2);
    assert_eq!(runner.period(), 0.001);

    let x = runner.axis(runner.axis_index("X").unwrap()).unwrap();
    assert_eq!(
        x.state().bounds,
        PositionBounds::Range {
            min: -50.0,
            max: 50.0
        }
    );
    let z = runner.axis(runner.axis_index("Z").unwrap()).unwrap();
    assert!(z.state().disallow_backoff);
    assert_eq!(z.state().commanded_position, 5.0);
    assert!(!z.state().enable);
}

#[test]
fn sample_script_runs_to_completion() {
    let config = load_config(sample_config_path()).unwrap();
    let mut sim = Simulation::from_config(&config).unwrap();
    let report = sim.run::<Vec<u8>>(8000, None).unwrap();
    assert_eq!(report.rejected_events, 0);
    assert_eq!(report.stats.cycle_count, 8000);

    let runner = sim.runner();
    let x = runner.axis(runner.axis_index("X").unwrap()).unwrap().state();
    // Target 80 saturates at the upper bound.
    assert_eq!(x.commanded_position, 50.0);
    assert!(!x.active);

    let z = runner.axis(runner.axis_index("Z").unwrap()).unwrap().state();
    assert!(!z.enable);
    assert!(!z.active);
    assert_eq!(z.phase, MotionPhase::Standstill);
    // Aborted before reaching 4.0.
    assert!(z.commanded_position > 4.0 && z.commanded_position < 5.0);
}

#[test]
fn trace_file_has_json_lines() {
    let config = load_config(sample_config_path()).unwrap();
    let mut sim = Simulation::from_config(&config).unwrap();
    let mut trace = NamedTempFile::new().unwrap();
    sim.run(25, Some(trace.as_file_mut())).unwrap();

    let text = std::fs::read_to_string(trace.path()).unwrap();
    assert_eq!(text.lines().count(), 50);
    for line in text.lines() {
        let record: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(record["commanded"].is_f64());
        assert!(record["flags"].is_u64());
    }
}

#[test]
fn invalid_files_are_rejected() {
    let missing_shared = write_config(
        r#"
[[axes]]
name = "X"
max_velocity = 1.0
max_acceleration = 1.0
"#,
    );
    assert!(matches!(
        load_config(missing_shared.path()),
        Err(ConfigError::ParseError(_))
    ));

    let half_bounds = write_config(
        r#"
[shared]
service_name = "t"

[[axes]]
name = "X"
max_velocity = 1.0
max_acceleration = 1.0
min_position = 0.0
"#,
    );
    assert!(matches!(
        load_config(half_bounds.path()),
        Err(ConfigError::ValidationError(_))
    ));

    let bad_cycle = write_config(
        r#"
[shared]
service_name = "t"

[planner]
cycle_time_us = 1

[[axes]]
name = "X"
max_velocity = 1.0
max_acceleration = 1.0
"#,
    );
    assert!(matches!(
        load_config(bad_cycle.path()),
        Err(ConfigError::ValidationError(_))
    ));

    let start_outside = write_config(
        r#"
[shared]
service_name = "t"

[[axes]]
name = "X"
max_velocity = 1.0
max_acceleration = 1.0
min_position = 0.0
max_position = 1.0
initial_position = 2.0
"#,
    );
    assert!(load_config(start_outside.path()).is_err());
}

#[test]
fn scripted_bad_limit_is_rejected_at_run_time() {
    let file = write_config(
        r#"
[shared]
service_name = "t"

[[axes]]
name = "X"
max_velocity = 1.0
max_acceleration = 10.0

[[script]]
cycle = 0
axis = "X"
target = 1.0
enable = true

[[script]]
cycle = 10
axis = "X"
max_velocity = -3.0
"#,
    );
    let config = load_config(file.path()).unwrap();
    let mut sim = Simulation::from_config(&config).unwrap();
    let report = sim.run::<Vec<u8>>(500, None).unwrap();
    assert_eq!(report.rejected_events, 1);

    let axis = sim.runner().axis(0).unwrap();
    assert!(axis.is_rejected());
    assert!(!axis.state().enable);
    assert_eq!(axis.state().max_velocity, 1.0);
    assert!(!axis.state().active);
}
