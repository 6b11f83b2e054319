//! Holder bookkeeping and the expiry rule.
//!
//! # Rule
//!
//! A holder is released when
//!
//! * its group is `Removed` (or unknown): immediately, or
//! * it has been absent from every bound region for at least the applicable
//!   delay: `short` while another group is waiting on the slot, `long`
//!   otherwise.
//!
//! "Absent" means none of the group's occupied cells lies in a bound region
//! and it did not probe the slot this tick.  The absence counter only
//! advances while the group is `Active`; an `Unloaded` group is frozen.
//! A holder is evaluated at most once per tick.

use indexmap::IndexMap;

use mz_agent::GroupLookup;
use mz_core::{BlockPos, GroupId, GroupStatus, MutexConfig, RegionId, Tick};
use mz_spatial::RegionStore;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExpiryDelays {
    pub short: u64,
    pub long: u64,
}

impl ExpiryDelays {
    pub fn new(short: u64, long: u64) -> Self {
        Self { short, long }
    }

    #[inline]
    pub fn for_contention(&self, contended: bool) -> u64 {
        if contended { self.short } else { self.long }
    }
}

impl Default for ExpiryDelays {
    fn default() -> Self {
        Self::from(&MutexConfig::default())
    }
}

impl From<&MutexConfig> for ExpiryDelays {
    fn from(cfg: &MutexConfig) -> Self {
        Self::new(cfg.short_delay_ticks, cfg.long_delay_ticks)
    }
}

/// Outcome of evaluating one holder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Fate {
    Keep,
    Expired,
    Removed,
}

/// A group currently holding (part of) a slot.
#[derive(Clone, Debug)]
pub struct Holder {
    pub group: GroupId,
    /// Whether the whole slot is held.  `false` means only `cells` are.
    pub whole: bool,
    pub acquired: Tick,
    /// Last tick the group called `try_enter` on this slot.
    pub last_probe: Tick,
    /// Claimed unit cells with the tick each was last entered or occupied.
    /// Empty for whole holders.
    pub cells: IndexMap<BlockPos, Tick>,
    /// Holder this one last collided with, until it is granted again.
    pub(crate) conflict: Option<GroupId>,
    absent_ticks: u64,
    last_checked: Tick,
    last_fate: Option<Fate>,
}

impl Holder {
    pub(crate) fn new(group: GroupId, whole: bool, now: Tick) -> Self {
        Self {
            group,
            whole,
            acquired: now,
            last_probe: now,
            cells: IndexMap::new(),
            conflict: None,
            absent_ticks: 0,
            last_checked: now,
            last_fate: None,
        }
    }

    /// Consecutive active ticks spent outside every bound region.
    #[inline]
    pub fn absent_ticks(&self) -> u64 {
        self.absent_ticks
    }

    /// The other holder this one is in conflict with, if any.
    #[inline]
    pub fn conflict(&self) -> Option<GroupId> {
        self.conflict
    }

    #[inline]
    pub fn claims(&self, block: BlockPos) -> bool {
        self.whole || self.cells.contains_key(&block)
    }

    pub(crate) fn probe(&mut self, now: Tick) {
        self.last_probe = now;
        self.absent_ticks = 0;
    }

    /// Apply the expiry rule for tick `now`.
    pub(crate) fn evaluate(
        &mut self,
        now: Tick,
        members: &[RegionId],
        groups: &dyn GroupLookup,
        regions: &RegionStore,
        delay: u64,
    ) -> Fate {
        if let Some(fate) = self.last_fate.filter(|_| self.last_checked == now) {
            return fate;
        }
        let elapsed = now.since(self.last_checked);
        self.last_checked = now;

        let fate = match groups.status(self.group) {
            GroupStatus::Removed => Fate::Removed,
            GroupStatus::Unloaded => Fate::Keep,
            GroupStatus::Active => {
                let occupied = groups.occupied(self.group);
                let inside = occupied.iter().any(|b| {
                    members.iter().any(|id| regions.get(*id).is_some_and(|r| r.geometry.contains_block(*b)))
                });
                if inside || self.last_probe == now {
                    self.absent_ticks = 0;
                    self.refresh_cells(now, occupied, delay);
                    Fate::Keep
                } else {
                    self.absent_ticks += elapsed;
                    if self.absent_ticks >= delay { Fate::Expired } else { Fate::Keep }
                }
            }
        };
        self.last_fate = Some(fate);
        fate
    }

    /// Crossing claims: stamp cells still under the group and drop those it
    /// has not touched for `delay` ticks.
    fn refresh_cells(&mut self, now: Tick, occupied: &[BlockPos], delay: u64) {
        if self.whole || self.cells.is_empty() {
            return;
        }
        for b in occupied {
            if let Some(t) = self.cells.get_mut(b) {
                *t = now;
            }
        }
        self.cells.retain(|_, t| now.since(*t) < delay);
    }
}
