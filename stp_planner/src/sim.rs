//! Offline simulation: replays a configuration's `[[script]]` against the
//! axis bank and emits one JSON line per axis per cycle.

use std::io::Write;

use serde::Serialize;
use stp_common::axis::{MotionPhase, PlannerFlags};
use thiserror::Error;
use tracing::debug;

use crate::config::{PlannerConfig, ScriptEvent};
use crate::cycle::{AxisPlanner, CycleRunner, CycleStats};
use crate::error::PlannerError;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("trace serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("trace write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// One axis at the end of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceRecord<'a> {
    pub cycle: u64,
    pub axis: &'a str,
    pub commanded: f64,
    pub position: f64,
    pub velocity: f64,
    pub target: f64,
    pub enable: bool,
    pub active: bool,
    pub in_limit: bool,
    pub phase: MotionPhase,
    pub flags: PlannerFlags,
}

impl<'a> TraceRecord<'a> {
    pub fn from_axis(cycle: u64, axis: &'a AxisPlanner) -> Self {
        let s = axis.state();
        Self {
            cycle,
            axis: axis.name(),
            commanded: s.commanded_position,
            position: s.current_position,
            velocity: s.current_velocity,
            target: s.target_position,
            enable: s.enable,
            active: s.active,
            in_limit: s.in_limit,
            phase: s.phase,
            flags: axis.flags(),
        }
    }
}

/// What a run did.
#[derive(Debug, Clone)]
pub struct SimReport {
    pub cycles_run: u64,
    /// Last cycle in which any axis was active.
    pub last_active_cycle: Option<u64>,
    /// Script events the boundary refused.
    pub rejected_events: u64,
    pub stats: CycleStats,
}

/// Axis bank plus the remaining script.
#[derive(Debug)]
pub struct Simulation {
    runner: CycleRunner,
    script: Vec<ScriptEvent>,
    next_event: usize,
}

impl Simulation {
    pub fn from_config(config: &PlannerConfig) -> Result<Self, PlannerError> {
        let runner = CycleRunner::from_config(config)?;
        let mut script = config.script.clone();
        // Stable: same-cycle events keep file order.
        script.sort_by_key(|e| e.cycle);
        Ok(Self {
            runner,
            script,
            next_event: 0,
        })
    }

    #[inline]
    pub fn runner(&self) -> &CycleRunner {
        &self.runner
    }

    /// Apply every script event due at the current cycle. Returns the
    /// number the boundary rejected.
    fn apply_due_events(&mut self) -> u64 {
        let cycle = self.runner.cycle();
        let period = self.runner.period();
        let mut rejected = 0;

        while let Some(event) = self.script.get(self.next_event) {
            if event.cycle > cycle {
                break;
            }
            self.next_event += 1;

            let Some(index) = self.runner.axis_index(&event.axis) else {
                continue;
            };
            let Some(axis) = self.runner.axis_mut(index) else {
                continue;
            };
            let mut input = axis.input(period);
            if let Some(target) = event.target {
                input.target_position = target;
            }
            if let Some(enable) = event.enable {
                input.enable = enable;
            }
            if let Some(v) = event.max_velocity {
                input.max_velocity = v;
            }
            if let Some(a) = event.max_acceleration {
                input.max_acceleration = a;
            }
            if let Some(disallow) = event.disallow_backoff {
                input.disallow_backoff = disallow;
            }

            debug!(cycle, axis = %event.axis, "script event");
            if axis.apply(&input).is_err() {
                rejected += 1;
            }
        }
        rejected
    }

    /// Run `cycles` cycles, writing a JSON-lines trace to `trace` if given.
    pub fn run<W: Write>(
        &mut self,
        cycles: u64,
        mut trace: Option<&mut W>,
    ) -> Result<SimReport, TraceError> {
        let mut last_active_cycle = None;
        let mut rejected_events = 0;

        for _ in 0..cycles {
            rejected_events += self.apply_due_events();
            let summary = self.runner.run_cycle();
            if !summary.all_settled() {
                last_active_cycle = Some(summary.cycle);
            }

            if let Some(w) = trace.as_deref_mut() {
                for axis in self.runner.axes() {
                    serde_json::to_writer(&mut *w, &TraceRecord::from_axis(summary.cycle, axis))?;
                    w.write_all(b"\n")?;
                }
            }
        }

        if let Some(w) = trace {
            w.flush()?;
        }

        Ok(SimReport {
            cycles_run: cycles,
            last_active_cycle,
            rejected_events,
            stats: self.runner.stats().clone(),
        })
    }
}
