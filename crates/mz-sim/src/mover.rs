//! The movement engine boundary.
//!
//! The tick loop never moves anything itself.  Each tick it asks the
//! [`Mover`] where every group intends to go, decides whether that travel
//! is allowed, and hands back a [`Decision`] the engine must honour.

use mz_core::{BlockPos, GroupId, Vec3, WorldId};
use mz_spatial::Segment;

/// What a group may do with its planned segment this tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Decision {
    /// Travel the whole planned segment.
    Proceed,
    /// Travel at most this far along the planned segment, then stop.
    StopAt(f64),
}

impl Decision {
    /// Distance the group may cover along a segment of `length`.
    #[inline]
    pub fn allowed(self, length: f64) -> f64 {
        match self {
            Decision::Proceed => length,
            Decision::StopAt(d) => d.clamp(0.0, length),
        }
    }
}

/// A movement engine driving agent groups.
///
/// Implementations must report one entry per group in the `GroupStore`,
/// indexed by `GroupId`.
pub trait Mover {
    /// Number of groups this engine drives.
    fn group_count(&self) -> usize;

    /// World the group currently travels in.
    fn world(&self, _group: GroupId) -> WorldId {
        WorldId(0)
    }

    /// Front of the group.
    fn current_position(&self, group: GroupId) -> Vec3;

    /// Intended travel for this tick, `None` when the group is not moving.
    fn planned_segment(&self, group: GroupId) -> Option<Segment>;

    /// Unit cells the group's body covers right now.
    fn occupied_cells(&self, group: GroupId) -> Vec<BlockPos>;

    /// Carry out this tick's decision.
    fn apply(&mut self, group: GroupId, decision: Decision);
}
