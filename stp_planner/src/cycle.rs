//! Axis bank and cycle runner.
//!
//! A [`CycleRunner`] owns up to [`MAX_AXES`] axis planners in a fixed-size
//! bank and steps them together with one shared period. Nothing in
//! [`CycleRunner::run_cycle`] allocates.
//!
//! ## Cycle Body
//! 1. Callers merge their commands with [`AxisPlanner::apply`] (validated).
//! 2. `run_cycle` updates every axis in bank order.
//! 3. Per-cycle timing and axis counts go into [`CycleStats`].

use std::time::Instant;

use stp_common::axis::config::AxisConfig;
use stp_common::axis::error::check_period;
use stp_common::axis::{AxisLimits, InputError, MotionPhase, PlannerFlags};
use stp_common::config::Validate;
use stp_common::consts::MAX_AXES;
use tracing::{debug, trace, warn};

use crate::command::CycleInput;
use crate::config::PlannerConfig;
use crate::control::PlannerState;
use crate::error::PlannerError;

/// Maximum axis name length [bytes].
pub const AXIS_NAME_CAPACITY: usize = 16;

pub type AxisName = heapless::String<AXIS_NAME_CAPACITY>;

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle statistics.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: u64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: u64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: u64,
    /// Running sum for average computation.
    pub sum_cycle_ns: u64,
    /// Axis-cycles that ended saturated.
    pub in_limit_axis_cycles: u64,
    /// Most axes active in a single cycle.
    pub max_active_axes: usize,
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: u64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            in_limit_axis_cycles: 0,
            max_active_axes: 0,
        }
    }

    /// Record one cycle. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: u64, summary: &CycleSummary) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns = self.sum_cycle_ns.saturating_add(duration_ns);
        self.in_limit_axis_cycles += summary.in_limit_axes as u64;
        self.max_active_axes = self.max_active_axes.max(summary.active_axes);
    }

    /// Average cycle time [ns] (0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count
        }
    }
}

/// Outcome of one bank-wide cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleSummary {
    /// Index of the cycle just executed (0-based).
    pub cycle: u64,
    pub active_axes: usize,
    pub in_limit_axes: usize,
    pub aborting_axes: usize,
    pub rejected_axes: usize,
}

impl CycleSummary {
    /// No axis is moving.
    #[inline]
    pub fn all_settled(&self) -> bool {
        self.active_axes == 0
    }
}

// ─── Axis Planner ───────────────────────────────────────────────────

/// One named axis: planner state plus boundary bookkeeping.
#[derive(Debug, Clone)]
pub struct AxisPlanner {
    name: AxisName,
    state: PlannerState,
    /// Last applied input was rejected.
    rejected: bool,
    rejections: u64,
}

impl AxisPlanner {
    /// Disabled axis at rest at `position`.
    pub fn new(name: &str, limits: &AxisLimits, position: f64) -> Result<Self, PlannerError> {
        let mut axis_name = AxisName::new();
        axis_name
            .push_str(name)
            .map_err(|_| PlannerError::NameTooLong {
                name: name.to_string(),
                capacity: AXIS_NAME_CAPACITY,
            })?;
        limits.validate().map_err(|source| PlannerError::Input {
            axis: name.to_string(),
            source,
        })?;
        if !position.is_finite() {
            return Err(PlannerError::Input {
                axis: name.to_string(),
                source: InputError::NonFinite {
                    field: "initial_position",
                },
            });
        }
        Ok(Self {
            name: axis_name,
            state: PlannerState::at_rest(position).with_limits(limits),
            rejected: false,
            rejections: 0,
        })
    }

    pub fn from_config(config: &AxisConfig) -> Result<Self, PlannerError> {
        let mut axis = Self::new(&config.name, &config.limits()?, config.initial_position)?;
        axis.state.disallow_backoff = config.disallow_backoff;
        Ok(axis)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    /// Whether the last applied input was rejected.
    #[inline]
    pub fn is_rejected(&self) -> bool {
        self.rejected
    }

    /// Total rejected inputs.
    #[inline]
    pub fn rejections(&self) -> u64 {
        self.rejections
    }

    /// Status word for the last cycle, including [`PlannerFlags::REJECTED`].
    pub fn flags(&self) -> PlannerFlags {
        let mut flags = self.state.flags();
        flags.set(PlannerFlags::REJECTED, self.rejected);
        flags
    }

    /// Current parameters as an input record, for callers that change
    /// one field and re-apply.
    #[inline]
    pub fn input(&self, period: f64) -> CycleInput {
        CycleInput::from_state(&self.state, period)
    }

    /// Merge a validated command for the next cycle.
    ///
    /// A rejected command leaves the previous parameters in place and
    /// disables the axis.
    pub fn apply(&mut self, input: &CycleInput) -> Result<(), InputError> {
        match input.apply_to(&mut self.state) {
            Ok(()) => {
                self.rejected = false;
                Ok(())
            }
            Err(e) => {
                self.rejected = true;
                self.rejections += 1;
                warn!(axis = %self.name, error = %e, "cycle input rejected, aborting axis");
                Err(e)
            }
        }
    }

    /// Advance one cycle.
    pub fn step(&mut self, period: f64) -> PlannerFlags {
        let before = self.state.phase;
        self.state.update(period);
        let flags = self.flags();

        let s = &self.state;
        if s.phase != before {
            debug!(
                axis = %self.name,
                from = ?before,
                to = ?s.phase,
                position = s.current_position,
                velocity = s.current_velocity,
                "phase change"
            );
        }
        trace!(
            axis = %self.name,
            commanded = s.commanded_position,
            velocity = s.current_velocity,
            flags = flags.bits(),
            "axis step"
        );
        flags
    }
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Fixed-capacity axis bank stepped with a shared period.
#[derive(Debug)]
pub struct CycleRunner {
    axes: heapless::Vec<AxisPlanner, MAX_AXES>,
    period: f64,
    cycle: u64,
    stats: CycleStats,
}

impl CycleRunner {
    /// Empty bank with a validated period [s].
    pub fn new(period: f64) -> Result<Self, PlannerError> {
        check_period(period).map_err(PlannerError::Period)?;
        Ok(Self {
            axes: heapless::Vec::new(),
            period,
            cycle: 0,
            stats: CycleStats::new(),
        })
    }

    /// Bank built from a configuration file's `[planner]` and `[[axes]]`.
    pub fn from_config(config: &PlannerConfig) -> Result<Self, PlannerError> {
        config.validate()?;
        let mut runner = Self::new(config.planner.period_s())?;
        for axis in &config.axes {
            runner.add_axis(AxisPlanner::from_config(axis)?)?;
        }
        debug!(
            axes = runner.len(),
            period_s = runner.period,
            "axis bank initialized"
        );
        Ok(runner)
    }

    /// Append an axis; returns its bank index.
    pub fn add_axis(&mut self, axis: AxisPlanner) -> Result<usize, PlannerError> {
        if self.axis_index(axis.name()).is_some() {
            return Err(PlannerError::DuplicateAxis(axis.name().to_string()));
        }
        self.axes.push(axis).map_err(|_| PlannerError::BankFull {
            capacity: MAX_AXES,
        })?;
        Ok(self.axes.len() - 1)
    }

    pub fn axis_index(&self, name: &str) -> Option<usize> {
        self.axes.iter().position(|a| a.name() == name)
    }

    #[inline]
    pub fn axis(&self, index: usize) -> Option<&AxisPlanner> {
        self.axes.get(index)
    }

    #[inline]
    pub fn axis_mut(&mut self, index: usize) -> Option<&mut AxisPlanner> {
        self.axes.get_mut(index)
    }

    #[inline]
    pub fn axes(&self) -> &[AxisPlanner] {
        &self.axes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.axes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Cycle period [s].
    #[inline]
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Index of the next cycle to run.
    #[inline]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    #[inline]
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Apply a command to the named axis.
    pub fn apply(&mut self, name: &str, input: &CycleInput) -> Result<(), PlannerError> {
        let index = self
            .axis_index(name)
            .ok_or_else(|| PlannerError::UnknownAxis(name.to_string()))?;
        self.axes[index]
            .apply(input)
            .map_err(|source| PlannerError::Input {
                axis: name.to_string(),
                source,
            })
    }

    /// Step every axis once.
    pub fn run_cycle(&mut self) -> CycleSummary {
        let start = Instant::now();
        let mut summary = CycleSummary {
            cycle: self.cycle,
            ..CycleSummary::default()
        };

        for axis in self.axes.iter_mut() {
            let flags = axis.step(self.period);
            summary.active_axes += flags.contains(PlannerFlags::ACTIVE) as usize;
            summary.in_limit_axes += flags.contains(PlannerFlags::IN_LIMIT) as usize;
            summary.aborting_axes += (axis.state().phase == MotionPhase::Aborting) as usize;
            summary.rejected_axes += flags.contains(PlannerFlags::REJECTED) as usize;
        }

        let duration_ns = start.elapsed().as_nanos() as u64;
        self.stats.record(duration_ns, &summary);
        self.cycle += 1;
        summary
    }

    /// Run until every axis is inactive or `max_cycles` have elapsed.
    /// Returns the number of cycles run if the bank settled.
    pub fn run_until_settled(&mut self, max_cycles: u64) -> Option<u64> {
        for n in 1..=max_cycles {
            if self.run_cycle().all_settled() {
                return Some(n);
            }
        }
        None
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
