//! Motion phase classification.
//!
//! Derives a [`MotionPhase`] from one planner cycle. Diagnostic only: the
//! control law never reads it back.
//!
//! Standstill → Accelerating → Cruising → Decelerating → Standstill, with
//! Aborting while enable is low and Holding under a zero rate limit.

use stp_common::axis::MotionPhase;

/// Speed change below which the axis counts as cruising [units/s].
const SPEED_EPSILON: f64 = 1e-9;

/// What one cycle did, as seen by the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleMotion {
    pub enable: bool,
    pub holding: bool,
    pub active: bool,
    pub speed_before: f64,
    pub speed_after: f64,
}

/// Classify one cycle.
pub fn classify(m: &CycleMotion) -> MotionPhase {
    if !m.enable {
        return if m.speed_after > 0.0 {
            MotionPhase::Aborting
        } else {
            MotionPhase::Standstill
        };
    }
    if m.holding {
        return if m.active {
            MotionPhase::Holding
        } else {
            MotionPhase::Standstill
        };
    }
    if m.speed_after == 0.0 {
        return MotionPhase::Standstill;
    }
    let delta = m.speed_after - m.speed_before;
    if delta > SPEED_EPSILON {
        MotionPhase::Accelerating
    } else if delta < -SPEED_EPSILON {
        MotionPhase::Decelerating
    } else {
        MotionPhase::Cruising
    }
}
