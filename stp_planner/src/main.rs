//! # STP Planner Simulator
//!
//! Loads a planner TOML (axis bank plus event script), runs the control
//! law offline for a fixed number of cycles and optionally writes a
//! JSON-lines trace, one record per axis per cycle.
//!
//! Cycles run back-to-back; there is no wall-clock pacing.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use stp_common::consts::DEFAULT_CONFIG_PATH;
use stp_planner::config::{PlannerConfig, load_config};
use stp_planner::sim::Simulation;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Single-axis trajectory planner: offline simulator
#[derive(Parser, Debug)]
#[command(name = "stp_planner")]
#[command(version)]
#[command(about = "Runs the velocity/acceleration-limited planner against a scripted config")]
struct Args {
    /// Planner configuration TOML.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Number of cycles to run.
    #[arg(long, default_value_t = 1000)]
    cycles: u64,

    /// Write a JSON-lines trace to FILE ("-" for stdout).
    #[arg(long, value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // The config picks the log level, so it is read before tracing starts.
    let config = load_config(&args.config);
    setup_tracing(&args, config.as_ref().ok());

    info!("STP planner v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|c| run(&args, &c))
    {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("STP planner finished");
}

fn run(args: &Args, config: &PlannerConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Config OK: {} (service={}, cycle_time={}µs, axes={}, events={})",
        args.config.display(),
        config.shared.service_name,
        config.planner.cycle_time_us,
        config.axes.len(),
        config.script.len(),
    );

    if let Some(last) = config.script.iter().map(|e| e.cycle).max() {
        if last >= args.cycles {
            warn!(
                "script event at cycle {last} lies beyond --cycles {}; it will not run",
                args.cycles
            );
        }
    }

    let mut sim = Simulation::from_config(config)?;

    let report = match args.trace.as_deref() {
        None => sim.run::<io::Sink>(args.cycles, None)?,
        Some(path) if path.as_os_str() == "-" => {
            let mut out = io::stdout().lock();
            sim.run(args.cycles, Some(&mut out))?
        }
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            let report = sim.run(args.cycles, Some(&mut out))?;
            out.flush()?;
            info!("Trace written to {}", path.display());
            report
        }
    };

    let stats = &report.stats;
    info!(
        cycles = report.cycles_run,
        last_active_cycle = ?report.last_active_cycle,
        rejected_events = report.rejected_events,
        avg_cycle_ns = stats.avg_cycle_ns(),
        max_cycle_ns = stats.max_cycle_ns,
        in_limit_axis_cycles = stats.in_limit_axis_cycles,
        "simulation complete"
    );
    for axis in sim.runner().axes() {
        let s = axis.state();
        info!(
            axis = axis.name(),
            position = s.commanded_position,
            velocity = s.current_velocity,
            active = s.active,
            phase = ?s.phase,
            rejections = axis.rejections(),
            "final state"
        );
    }

    Ok(())
}

/// Setup tracing subscriber from CLI arguments and the config's log level.
fn setup_tracing(args: &Args, config: Option<&PlannerConfig>) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        config.map_or(Level::INFO, |c| c.shared.log_level.as_tracing_level())
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr so `--trace -` keeps stdout clean.
    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}
