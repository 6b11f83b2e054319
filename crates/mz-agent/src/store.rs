//! Core group storage: `GroupStore` (SoA data plus a name index).
//!
//! Every `Vec` field has exactly `count` elements and `GroupId` is the index
//! into all of them.  Removed groups keep their slot (IDs are never reused)
//! but drop out of the name index and lose their occupied cells.

use rustc_hash::FxHashMap;

use mz_core::{BlockPos, GroupId, GroupStatus, Vec3};

use crate::{AgentError, AgentResult, GroupLookup};

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupStore {
    /// Number of groups ever created.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Display name, unique among live groups.
    pub names: Vec<String>,

    /// Free-form labels matched by admission predicates.
    pub tags: Vec<Vec<String>>,

    pub status: Vec<GroupStatus>,

    /// Head position of the group.
    pub position: Vec<Vec3>,

    /// Unit cells currently covered by the group's body, head first.
    /// Rewritten by the tick loop after movement; read by the expiry sweep.
    pub occupied: Vec<Vec<BlockPos>>,

    by_name: FxHashMap<String, GroupId>,
}

impl GroupStore {
    pub(crate) fn new() -> Self {
        Self {
            count: 0,
            names: Vec::new(),
            tags: Vec::new(),
            status: Vec::new(),
            position: Vec::new(),
            occupied: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn contains(&self, group: GroupId) -> bool {
        group.index() < self.count
    }

    /// Iterator over all `GroupId`s in ascending index order.
    pub fn group_ids(&self) -> impl Iterator<Item = GroupId> + '_ {
        (0..self.count as u32).map(GroupId)
    }

    /// Active groups in ascending index order: the per-tick processing order.
    pub fn active_ids(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.group_ids().filter(|g| self.status[g.index()].is_active())
    }

    /// Append a new group.  Fails if a live group already uses `name`.
    pub fn spawn(&mut self, name: impl Into<String>, tags: Vec<String>) -> AgentResult<GroupId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(AgentError::DuplicateName(name));
        }
        let id = GroupId(self.count as u32);
        self.by_name.insert(name.clone(), id);
        self.names.push(name);
        self.tags.push(tags);
        self.status.push(GroupStatus::Active);
        self.position.push(Vec3::ZERO);
        self.occupied.push(Vec::new());
        self.count += 1;
        Ok(id)
    }

    // ── Mutators ──────────────────────────────────────────────────────────

    pub fn set_position(&mut self, group: GroupId, pos: Vec3) -> AgentResult<()> {
        self.check(group)?;
        self.position[group.index()] = pos;
        Ok(())
    }

    pub fn set_occupied(&mut self, group: GroupId, cells: Vec<BlockPos>) -> AgentResult<()> {
        self.check(group)?;
        self.occupied[group.index()] = cells;
        Ok(())
    }

    /// Freeze the group: it keeps its claims and its expiry clocks stop.
    pub fn unload(&mut self, group: GroupId) -> AgentResult<()> {
        self.set_status(group, GroupStatus::Unloaded)
    }

    /// Thaw an unloaded group.  No-op on removed groups.
    pub fn load(&mut self, group: GroupId) -> AgentResult<()> {
        self.check(group)?;
        if self.status[group.index()] == GroupStatus::Unloaded {
            self.status[group.index()] = GroupStatus::Active;
        }
        Ok(())
    }

    /// Permanently remove the group from the simulation.
    pub fn remove(&mut self, group: GroupId) -> AgentResult<()> {
        self.set_status(group, GroupStatus::Removed)
    }

    pub fn set_status(&mut self, group: GroupId, status: GroupStatus) -> AgentResult<()> {
        self.check(group)?;
        let i = group.index();
        if self.status[i].is_removed() {
            return Ok(());
        }
        self.status[i] = status;
        if status.is_removed() {
            self.occupied[i].clear();
            self.by_name.remove(&self.names[i]);
        }
        Ok(())
    }

    #[inline]
    fn check(&self, group: GroupId) -> AgentResult<()> {
        if self.contains(group) {
            Ok(())
        } else {
            Err(AgentError::GroupNotFound(group))
        }
    }
}

impl GroupLookup for GroupStore {
    fn status(&self, group: GroupId) -> GroupStatus {
        self.status.get(group.index()).copied().unwrap_or(GroupStatus::Removed)
    }

    fn name(&self, group: GroupId) -> Option<&str> {
        self.names.get(group.index()).map(String::as_str)
    }

    fn tags(&self, group: GroupId) -> &[String] {
        self.tags.get(group.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    fn occupied(&self, group: GroupId) -> &[BlockPos] {
        self.occupied.get(group.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    fn find_by_name(&self, name: &str) -> Option<GroupId> {
        self.by_name.get(name).copied()
    }
}
