//! `ZoneWorld`: regions, their index and their slots for one world.
//!
//! Every region lifecycle change goes through this type so the three
//! structures never disagree: a region is indexed if and only if it is bound
//! to a slot and present in the store.
//!
//! # Tick contract
//!
//! ```text
//! for each active group, ascending GroupId:
//!     advance(cursor, segment, group)      → Option<ConflictHit>
//!     try_enter(hit.region, group, ..)     → Granted | Denied | Ignored
//!     get_or_create_path / extend_path     (path-building groups)
//! on_tick(now, ..)                         → SweepReport
//! ```

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use mz_agent::GroupLookup;
use mz_core::{BlockPos, CellCoord, GroupId, GroupStatus, MutexConfig, RegionId, Tick, Vec3, WorldId};
use mz_lock::{
    EnterRequest, EnterResult, ExpiryDelays, LockContext, ReleaseReason, SignalSink, SlotConflict, SlotEvents,
    SlotRegistry, SlotRelease,
};
use mz_spatial::{ConflictHit, ExtendOutcome, IndexCursor, Region, RegionKey, RegionStore, Segment, SpatialIndex};

use crate::spec::{PathOptions, RegionSpec};

/// A growing path is identified by the marker that spawned it plus the
/// group it is grown for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey {
    pub marker: RegionKey,
    pub group: GroupId,
}

#[derive(Clone, Debug)]
struct PathState {
    region: RegionId,
    last_used: Tick,
    idle_ticks: u64,
    last_checked: Tick,
}

/// Everything that changed during one `on_tick`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SweepReport {
    pub tick: Tick,
    /// Slot releases since the previous report, in the order they happened.
    pub released: Vec<SlotRelease>,
    /// Holders that ran into another holder's claim since the previous report.
    pub conflicts: Vec<SlotConflict>,
    pub expired_paths: Vec<PathKey>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.released.is_empty() && self.conflicts.is_empty() && self.expired_paths.is_empty()
    }
}

pub struct ZoneWorld {
    id: WorldId,
    config: MutexConfig,
    delays: ExpiryDelays,
    regions: RegionStore,
    index: SpatialIndex,
    slots: SlotRegistry,
    static_keys: FxHashMap<RegionKey, RegionId>,
    paths: BTreeMap<PathKey, PathState>,
    path_keys: FxHashMap<RegionId, PathKey>,
    added: Vec<RegionId>,
    pending: SlotEvents,
}

impl ZoneWorld {
    pub fn new(id: WorldId, config: MutexConfig) -> Self {
        Self {
            id,
            delays: ExpiryDelays::from(&config),
            config,
            regions: RegionStore::new(),
            index: SpatialIndex::new(),
            slots: SlotRegistry::new(),
            static_keys: FxHashMap::default(),
            paths: BTreeMap::new(),
            path_keys: FxHashMap::default(),
            added: Vec::new(),
            pending: SlotEvents::default(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn config(&self) -> &MutexConfig {
        &self.config
    }

    pub fn regions(&self) -> &RegionStore {
        &self.regions
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn slots(&self) -> &SlotRegistry {
        &self.slots
    }

    #[inline]
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Static region registered under `key`.
    pub fn region_by_key(&self, key: RegionKey) -> Option<RegionId> {
        self.static_keys.get(&key).copied()
    }

    pub fn path_region(&self, marker: RegionKey, group: GroupId) -> Option<RegionId> {
        self.paths.get(&PathKey { marker, group }).map(|p| p.region)
    }

    /// Live paths in `PathKey` order.
    pub fn paths(&self) -> impl Iterator<Item = (PathKey, &Region)> {
        self.paths
            .iter()
            .filter_map(|(k, p)| self.regions.get(p.region).map(|r| (*k, r)))
    }

    /// Regions added since the previous `on_tick`.  Groups already standing
    /// inside a fresh region never cross its boundary, so they must check
    /// these explicitly.
    pub fn new_regions(&self) -> &[RegionId] {
        &self.added
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Publish a static region.  Store insertion, slot binding and index
    /// registration happen together.  A region already registered under
    /// the same key is replaced.
    pub fn add_region(&mut self, spec: RegionSpec, signals: &mut dyn SignalSink) -> RegionId {
        if let Some(old) = self.static_keys.get(&spec.key).copied() {
            self.detach(old, signals);
        }
        let key = spec.key;
        let id = self.attach(spec.into_region(), signals);
        self.static_keys.insert(key, id);
        id
    }

    /// Tear down the static region under `key`.  Returns whether one existed.
    pub fn remove_region(&mut self, key: RegionKey, signals: &mut dyn SignalSink) -> bool {
        match self.static_keys.remove(&key) {
            Some(id) => self.detach(id, signals),
            None => false,
        }
    }

    fn attach(&mut self, region: Region, signals: &mut dyn SignalSink) -> RegionId {
        let id = self.regions.insert(region);
        if let Some(region) = self.regions.get_mut(id) {
            region.slot = self.slots.bind(id, region, signals);
            self.index.add(id, &region.geometry);
            debug!(world = %self.id, region = %id, key = %region.key, slot = %region.slot, "region added");
        }
        self.added.push(id);
        id
    }

    fn detach(&mut self, id: RegionId, signals: &mut dyn SignalSink) -> bool {
        let Some(region) = self.regions.remove(id) else {
            return false;
        };
        self.index.remove(id);
        self.slots.unbind(region.slot, id, signals);
        self.added.retain(|r| *r != id);
        if let Some(key) = self.path_keys.remove(&id) {
            self.paths.remove(&key);
        }
        debug!(world = %self.id, region = %id, key = %region.key, "region removed");
        true
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// A region containing `block`, if any.
    pub fn find_at(&self, block: BlockPos) -> Option<RegionId> {
        self.index.find_containing(block, &self.regions)
    }

    /// Regions whose envelope lies within `radius` blocks of `block`.
    pub fn regions_near(&self, block: BlockPos, radius: i32) -> Vec<RegionId> {
        self.index.find_nearby(block, radius, &self.regions)
    }

    /// Cheap pre-check using the configured `nearby_radius`.
    pub fn is_region_nearby(&self, block: BlockPos) -> bool {
        self.index.is_region_nearby(block, self.config.nearby_radius, &self.regions)
    }

    pub fn cursor_at(&self, pos: Vec3) -> IndexCursor {
        self.index.cursor_at(CellCoord::of_point(pos))
    }

    /// Nearest region `group` would enter along `segment`.
    pub fn advance(&self, cursor: &mut IndexCursor, segment: Segment, group: GroupId) -> Option<ConflictHit> {
        cursor.advance_to(&self.index, &self.regions, segment, group)
    }

    /// Nearest region along `segment` other than those in `skip`.
    pub fn advance_past(
        &self,
        cursor: &mut IndexCursor,
        segment: Segment,
        group: GroupId,
        skip: &[RegionId],
    ) -> Option<ConflictHit> {
        cursor.advance_past(&self.index, &self.regions, segment, group, skip)
    }

    // ── Locking ───────────────────────────────────────────────────────────

    /// Ask for `region`'s slot on behalf of `group`, which is about to
    /// enter `entry_block`.  A path's owner is never blocked by it: the
    /// request counts as use of the path and a denial becomes `Ignored`.
    pub fn try_enter(
        &mut self,
        region: RegionId,
        group: GroupId,
        entry_block: BlockPos,
        now: Tick,
        groups: &dyn GroupLookup,
        signals: &mut dyn SignalSink,
    ) -> EnterResult {
        let Some(r) = self.regions.get(region) else {
            return EnterResult::Ignored;
        };
        let (slot, policy) = (r.slot, r.policy);
        let own_path = r.path_owner() == Some(group);
        if own_path {
            self.mark_path_used(region, now);
        }

        let ctx = LockContext { now, groups, regions: &self.regions, delays: self.delays };
        let req = EnterRequest { group, policy, block: entry_block };
        let result = self.slots.try_enter(slot, req, &ctx, signals, &mut self.pending);
        if own_path && result == EnterResult::Denied {
            trace!(world = %self.id, %region, %group, "own path slot held elsewhere; not blocking owner");
            return EnterResult::Ignored;
        }
        result
    }

    // ── Growing paths ─────────────────────────────────────────────────────

    /// The path spawned by `marker` for `group`, created at `initial` if it
    /// does not exist yet.  Either way the path counts as used at `now`.
    pub fn get_or_create_path(
        &mut self,
        marker: RegionKey,
        group: GroupId,
        initial: BlockPos,
        options: &PathOptions,
        now: Tick,
        signals: &mut dyn SignalSink,
    ) -> RegionId {
        let key = PathKey { marker, group };
        if let Some(state) = self.paths.get_mut(&key) {
            state.last_used = now;
            state.idle_ticks = 0;
            return state.region;
        }
        let id = self.attach(options.clone().into_region(marker, group, initial), signals);
        self.paths.insert(key, PathState { region: id, last_used: now, idle_ticks: 0, last_checked: now });
        self.path_keys.insert(id, key);
        debug!(world = %self.id, region = %id, %marker, %group, "path created");
        id
    }

    /// Grow path `id` by one unit cell.  The index only learns about new
    /// cells when the path's cell envelope grows.  Unknown or non-path ids
    /// report `Saturated` so callers stop growing.
    pub fn extend_path(&mut self, id: RegionId, block: BlockPos, now: Tick) -> ExtendOutcome {
        let Some(region) = self.regions.get_mut(id) else {
            return ExtendOutcome::Saturated;
        };
        let Some(path) = region.geometry.as_path_mut() else {
            return ExtendOutcome::Saturated;
        };
        let outcome = path.extend(block);
        match outcome {
            ExtendOutcome::Added { cells_changed: true } => {
                self.index.grow(id, &region.geometry);
            }
            ExtendOutcome::Saturated => trace!(world = %self.id, region = %id, %block, "path saturated"),
            _ => {}
        }
        self.mark_path_used(id, now);
        outcome
    }

    /// Record that the path's owner is still travelling along it.
    pub fn mark_path_used(&mut self, id: RegionId, now: Tick) {
        if let Some(state) = self.path_keys.get(&id).and_then(|k| self.paths.get_mut(k)) {
            state.last_used = now;
            state.idle_ticks = 0;
        }
    }

    fn path_expired(state: &mut PathState, owner: GroupId, now: Tick, groups: &dyn GroupLookup, budget: u64) -> bool {
        let elapsed = now.since(state.last_checked);
        state.last_checked = now;
        match groups.status(owner) {
            GroupStatus::Removed => true,
            GroupStatus::Unloaded => false,
            GroupStatus::Active => {
                if state.last_used == now {
                    state.idle_ticks = 0;
                } else {
                    state.idle_ticks += elapsed;
                }
                state.idle_ticks > budget
            }
        }
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// End-of-tick maintenance: slot expiry sweep, path expiry, and reset
    /// of the new-regions list.
    pub fn on_tick(&mut self, now: Tick, groups: &dyn GroupLookup, signals: &mut dyn SignalSink) -> SweepReport {
        let ctx = LockContext { now, groups, regions: &self.regions, delays: self.delays };
        let swept = self.slots.sweep(&ctx, signals);
        let SlotEvents { mut released, conflicts } = std::mem::take(&mut self.pending);
        released.extend(swept);

        let budget = self.config.path_idle_ticks;
        let expired: Vec<PathKey> = self
            .paths
            .iter_mut()
            .filter_map(|(k, state)| Self::path_expired(state, k.group, now, groups, budget).then_some(*k))
            .collect();
        for key in &expired {
            if let Some(state) = self.paths.get(key) {
                let region = state.region;
                self.detach(region, signals);
                debug!(world = %self.id, marker = %key.marker, group = %key.group, tick = %now, "path expired");
            }
        }

        self.added.clear();
        SweepReport { tick: now, released, conflicts, expired_paths: expired }
    }

    /// Drop everything `group` holds in this world straight away.
    pub fn on_group_removed(&mut self, group: GroupId, now: Tick, signals: &mut dyn SignalSink) {
        let released = self.slots.release_group(group, ReleaseReason::Removed, now, signals);
        self.pending.released.extend(released);
        let owned: Vec<RegionId> =
            self.paths.iter().filter(|(k, _)| k.group == group).map(|(_, p)| p.region).collect();
        for id in owned {
            self.detach(id, signals);
        }
    }
}
