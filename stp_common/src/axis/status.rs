//! Per-axis status reporting: compact flag word and motion phase.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Planner status word published once per cycle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PlannerFlags: u8 {
        /// Commanded motion in progress (velocity or position gap).
        const ACTIVE   = 0x01;
        /// Velocity or acceleration saturated this cycle.
        const IN_LIMIT = 0x02;
        /// Enable deasserted; abort-stop path ran.
        const ABORTING = 0x04;
        /// Axis carries a position range.
        const BOUNDED  = 0x08;
        /// A zero rate limit is holding the axis in place.
        const HOLDING  = 0x10;
        /// Last cycle input was rejected at the boundary.
        const REJECTED = 0x20;
    }
}

impl Default for PlannerFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for PlannerFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

/// Motion phase derived from the velocity change of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPhase {
    /// At rest on target.
    #[default]
    Standstill,
    /// Speed increasing.
    Accelerating,
    /// Speed constant and nonzero.
    Cruising,
    /// Speed decreasing under enable.
    Decelerating,
    /// Enable deasserted, ramping to rest.
    Aborting,
    /// Zero rate limit with a position gap remaining.
    Holding,
}

impl MotionPhase {
    /// Whether the axis is moving in this phase.
    #[inline]
    pub const fn is_moving(&self) -> bool {
        matches!(
            self,
            Self::Accelerating | Self::Cruising | Self::Decelerating | Self::Aborting
        )
    }
}
