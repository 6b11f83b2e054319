//! Read-only group view.
//!
//! The lock layer never owns group state; it reads it through this trait so
//! tests can supply a hand-rolled table and the simulation can supply its
//! `GroupStore`.

use mz_core::{BlockPos, GroupId, GroupStatus};

pub trait GroupLookup {
    /// Lifecycle state.  Unknown IDs must report `Removed` so a dangling
    /// holder is always treated as an expiry condition.
    fn status(&self, group: GroupId) -> GroupStatus;

    fn name(&self, group: GroupId) -> Option<&str>;

    fn tags(&self, group: GroupId) -> &[String];

    /// Unit cells the group's body currently covers.
    fn occupied(&self, group: GroupId) -> &[BlockPos];

    /// Resolve a live group by name.  Removed groups are not found.
    fn find_by_name(&self, name: &str) -> Option<GroupId>;
}
