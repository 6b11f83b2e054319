//! The `Sim` struct and its tick loop.

use tracing::{debug, info, trace};

use mz_agent::{GroupLookup, GroupStore};
use mz_core::{GroupId, SimConfig, Tick, WorldId};
use mz_lock::{EnterResult, SignalSink};
use mz_spatial::{ConflictHit, IndexCursor, Segment};
use mz_world::ZoneCache;

use crate::{Decision, Mover, SimObserver, SimResult};

/// The main simulation runner.
///
/// `Sim<M, S>` owns the group store, the zone state of every world, the
/// movement engine `M` and the signal sink `S`, and drives the tick loop:
///
/// 1. **Decide** (ascending `GroupId`, active groups only): predict the
///    nearest region on the group's planned segment, ask its slot, and keep
///    looking past every region that admits the group.  The first denial
///    becomes `StopAt(stop_distance)`; no denial is `Proceed`.  A group
///    with no segment instead claims any freshly added region it stands in.
/// 2. **Sync**: copy every active group's occupied cells into the store.
/// 3. **Sweep**: `ZoneCache::on_tick` expires slots and idle paths.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<M: Mover, S: SignalSink> {
    pub config: SimConfig,

    /// Current tick: the next one `run` will process.
    pub now: Tick,

    pub groups: GroupStore,

    pub zones: ZoneCache,

    pub mover: M,

    pub signals: S,

    /// Each group's cursor, persisted across ticks, with the world it
    /// belongs to.
    cursors: Vec<Option<(WorldId, IndexCursor)>>,
}

impl<M: Mover, S: SignalSink> Sim<M, S> {
    pub(crate) fn new(config: SimConfig, groups: GroupStore, zones: ZoneCache, mover: M, signals: S) -> Self {
        let cursors = vec![None; groups.count];
        Self { config, now: Tick::ZERO, groups, zones, mover, signals, cursors }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            start = %self.now,
            end = %self.config.end_tick(),
            groups = self.groups.count,
            worlds = self.zones.len(),
            "simulation starting"
        );
        while self.now < self.config.end_tick() {
            self.step(observer)?;
        }
        let held = self.zones.worlds().flat_map(|w| w.slots().iter()).filter(|s| s.is_held()).count();
        info!(tick = %self.now, held_slots = held, "simulation finished");
        observer.on_sim_end(self.now);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Process one tick and advance the clock.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.now;
        observer.on_tick_start(now);
        let moved = self.process_tick(now, observer)?;
        observer.on_tick_end(now, moved);
        self.now = now + 1;
        Ok(())
    }

    /// Take `group` out of the simulation.  Its claims are released at once.
    pub fn remove_group(&mut self, group: GroupId) -> SimResult<()> {
        self.groups.remove(group)?;
        self.zones.on_group_removed(group, self.now, &mut self.signals);
        if let Some(c) = self.cursors.get_mut(group.index()) {
            *c = None;
        }
        Ok(())
    }

    /// Freeze `group`.  Its claims stay but stop ageing until `load_group`.
    pub fn unload_group(&mut self, group: GroupId) -> SimResult<()> {
        Ok(self.groups.unload(group)?)
    }

    pub fn load_group(&mut self, group: GroupId) -> SimResult<()> {
        Ok(self.groups.load(group)?)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<usize> {
        // ── Phase 1: decisions, in ascending GroupId ──────────────────────
        let active: Vec<GroupId> = self.groups.active_ids().collect();
        let mut moved = 0;
        for &group in &active {
            let decision = match self.mover.planned_segment(group) {
                Some(segment) => {
                    moved += 1;
                    self.decide(group, segment, now, observer)
                }
                None => {
                    self.claim_fresh_regions(group, now, observer);
                    Decision::Proceed
                }
            };
            if let Decision::StopAt(d) = decision {
                trace!(%group, tick = %now, stop_at = d, "group stopping");
            }
            self.mover.apply(group, decision);
        }

        // ── Phase 2: occupancy sync ───────────────────────────────────────
        for &group in &active {
            self.groups.set_position(group, self.mover.current_position(group))?;
            self.groups.set_occupied(group, self.mover.occupied_cells(group))?;
        }

        // ── Phase 3: expiry sweep ─────────────────────────────────────────
        for (world, report) in self.zones.on_tick(now, &self.groups, &mut self.signals) {
            for release in &report.released {
                observer.on_release(world, release);
            }
            for conflict in &report.conflicts {
                observer.on_conflict(world, conflict);
            }
            for path in &report.expired_paths {
                observer.on_path_expired(now, world, path);
            }
            debug!(
                %world,
                tick = %now,
                released = report.released.len(),
                conflicts = report.conflicts.len(),
                expired_paths = report.expired_paths.len(),
                "sweep"
            );
        }

        Ok(moved)
    }

    /// Walk the regions along `segment` nearest first, asking each slot in
    /// turn, until one denies or none are left.
    fn decide<O: SimObserver>(
        &mut self,
        group: GroupId,
        segment: Segment,
        now: Tick,
        observer: &mut O,
    ) -> Decision {
        let world_id = self.mover.world(group);
        let world = self.zones.world_mut(world_id);

        let mut cursor = match self.cursors[group.index()].take() {
            Some((w, c)) if w == world_id => c,
            _ => world.cursor_at(segment.start),
        };

        let mut admitted = Vec::new();
        let mut decision = Decision::Proceed;
        while let Some(hit) = world.advance_past(&mut cursor, segment, group, &admitted) {
            let result = world.try_enter(hit.region, group, hit.entry_block, now, &self.groups, &mut self.signals);
            observer.on_decision(now, world_id, group, &hit, result);
            if result == EnterResult::Denied {
                decision = Decision::StopAt(hit.stop_distance);
                break;
            }
            admitted.push(hit.region);
        }

        self.cursors[group.index()] = Some((world_id, cursor));
        decision
    }

    /// A stationary group never crosses the boundary of a region added
    /// around it, so check the fresh ones directly.
    fn claim_fresh_regions<O: SimObserver>(&mut self, group: GroupId, now: Tick, observer: &mut O) {
        let world_id = self.mover.world(group);
        let Some(world) = self.zones.world(world_id) else {
            return;
        };
        let occupied = self.groups.occupied(group);
        let hits: Vec<_> = world
            .new_regions()
            .iter()
            .filter_map(|&id| {
                let region = world.region(id)?;
                let block = occupied.iter().copied().find(|b| region.geometry.contains_block(*b))?;
                Some(ConflictHit {
                    region: id,
                    distance: 0.0,
                    stop_distance: 0.0,
                    entry_point: block.center(),
                    entry_block: block,
                })
            })
            .collect();

        let world = self.zones.world_mut(world_id);
        for hit in hits {
            let result = world.try_enter(hit.region, group, hit.entry_block, now, &self.groups, &mut self.signals);
            observer.on_decision(now, world_id, group, &hit, result);
        }
    }
}
