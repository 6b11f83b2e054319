//! Slot registry: named slots shared by name, anonymous slots 1:1 with
//! their region.
//!
//! Slots are created lazily on first bind and dropped when their last
//! region unbinds.  IDs are arena indices and may be reused.

use rustc_hash::FxHashMap;
use tracing::debug;

use mz_core::{BlockPos, GroupId, RegionId, SlotId, Tick};
use mz_spatial::Region;

use crate::signal::SignalSink;
use crate::slot::{EnterRequest, EnterResult, LockContext, Slot};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReleaseReason {
    /// Holder stayed outside every bound region past its delay.
    Expired,
    /// Holder's group left the simulation.
    Removed,
    /// The slot's admission predicate stopped admitting the holder.
    Rejected,
}

impl ReleaseReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ReleaseReason::Expired => "expired",
            ReleaseReason::Removed => "removed",
            ReleaseReason::Rejected => "rejected",
        }
    }
}

/// One holder released from one slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlotRelease {
    pub slot: SlotId,
    pub group: GroupId,
    pub reason: ReleaseReason,
    pub tick: Tick,
}

/// Two holders of one slot collided: `group` was denied `block` because
/// `other` claims it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlotConflict {
    pub slot: SlotId,
    pub group: GroupId,
    pub other: GroupId,
    pub block: BlockPos,
    pub tick: Tick,
}

/// Side effects of entry requests, in the order they happened.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlotEvents {
    pub released: Vec<SlotRelease>,
    pub conflicts: Vec<SlotConflict>,
}

impl SlotEvents {
    pub fn is_empty(&self) -> bool {
        self.released.is_empty() && self.conflicts.is_empty()
    }
}

#[derive(Default)]
pub struct SlotRegistry {
    slots: Vec<Option<Slot>>,
    free: Vec<SlotId>,
    by_name: FxHashMap<String, SlotId>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.index())?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut Slot> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    pub fn find_by_name(&self, name: &str) -> Option<SlotId> {
        self.by_name.get(name).copied()
    }

    /// Live slots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().flatten()
    }

    /// The group holding the whole of `slot`, if any.
    pub fn owner_of(&self, slot: SlotId) -> Option<GroupId> {
        self.get(slot)?.owner()
    }

    fn allocate(&mut self, name: &str) -> SlotId {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                self.slots.push(None);
                SlotId((self.slots.len() - 1) as u32)
            }
        };
        self.slots[id.index()] = Some(Slot::new(id, name));
        if !name.is_empty() {
            self.by_name.insert(name.to_string(), id);
        }
        debug!(slot = %id, name, "slot created");
        id
    }

    /// Bind `region` to the slot named by `region.name`, creating it if
    /// needed.  Anonymous regions always get a fresh private slot.
    pub fn bind(&mut self, id: RegionId, region: &Region, signals: &mut dyn SignalSink) -> SlotId {
        let slot_id = match self.by_name.get(&region.name) {
            Some(&existing) if !region.is_anonymous() => existing,
            _ => self.allocate(&region.name),
        };
        if let Some(slot) = self.get_mut(slot_id) {
            slot.bind(id, region.key, &region.predicate, signals);
        }
        slot_id
    }

    /// Unbind `region` from `slot`.  Drops the slot with its last region.
    /// Returns whether the slot was dropped.
    pub fn unbind(&mut self, slot: SlotId, region: RegionId, signals: &mut dyn SignalSink) -> bool {
        let Some(s) = self.get_mut(slot) else {
            return false;
        };
        if !s.unbind(region, signals) {
            return false;
        }
        if let Some(dropped) = self.slots[slot.index()].take() {
            if !dropped.is_anonymous() {
                self.by_name.remove(dropped.name());
            }
            debug!(%slot, name = dropped.name(), "slot dropped");
        }
        self.free.push(slot);
        true
    }

    /// Route a request to `slot`.  Unknown slots ignore everyone.
    pub fn try_enter(
        &mut self,
        slot: SlotId,
        req: EnterRequest,
        ctx: &LockContext<'_>,
        signals: &mut dyn SignalSink,
        events: &mut SlotEvents,
    ) -> EnterResult {
        match self.get_mut(slot) {
            Some(s) => s.try_enter(req, ctx, signals, events),
            None => EnterResult::Ignored,
        }
    }

    /// Expiry sweep over every held slot.  Call once per tick.
    pub fn sweep(&mut self, ctx: &LockContext<'_>, signals: &mut dyn SignalSink) -> Vec<SlotRelease> {
        let mut released = Vec::new();
        for slot in self.slots.iter_mut().flatten() {
            slot.sweep(ctx, signals, &mut released);
        }
        released
    }

    /// Release every claim `group` holds in every slot.
    pub fn release_group(
        &mut self,
        group: GroupId,
        reason: ReleaseReason,
        now: Tick,
        signals: &mut dyn SignalSink,
    ) -> Vec<SlotRelease> {
        let mut released = Vec::new();
        for slot in self.slots.iter_mut().flatten() {
            slot.release_group(group, reason, now, signals, &mut released);
        }
        released
    }
}
