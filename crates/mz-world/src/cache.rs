//! All worlds' zone state, keyed by `WorldId`.
//!
//! Worlds are created on first mutable access and iterated in ascending id
//! order, so multi-world ticks are deterministic.

use std::collections::BTreeMap;

use mz_agent::GroupLookup;
use mz_core::{GroupId, MutexConfig, Tick, WorldId};
use mz_lock::SignalSink;

use crate::world::{SweepReport, ZoneWorld};

pub struct ZoneCache {
    config: MutexConfig,
    worlds: BTreeMap<WorldId, ZoneWorld>,
}

impl ZoneCache {
    pub fn new(config: MutexConfig) -> Self {
        Self { config, worlds: BTreeMap::new() }
    }

    pub fn config(&self) -> &MutexConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    pub fn world(&self, id: WorldId) -> Option<&ZoneWorld> {
        self.worlds.get(&id)
    }

    /// The world `id`, created empty if it has no zone state yet.
    pub fn world_mut(&mut self, id: WorldId) -> &mut ZoneWorld {
        let config = &self.config;
        self.worlds.entry(id).or_insert_with(|| ZoneWorld::new(id, config.clone()))
    }

    pub fn worlds(&self) -> impl Iterator<Item = &ZoneWorld> {
        self.worlds.values()
    }

    /// Forget a world entirely.  Its slots go with it; no signals fire.
    pub fn unload_world(&mut self, id: WorldId) -> Option<ZoneWorld> {
        self.worlds.remove(&id)
    }

    /// Run every world's end-of-tick maintenance.  Worlds with nothing to
    /// report are left out.
    pub fn on_tick(
        &mut self,
        now: Tick,
        groups: &dyn GroupLookup,
        signals: &mut dyn SignalSink,
    ) -> Vec<(WorldId, SweepReport)> {
        self.worlds
            .iter_mut()
            .map(|(id, w)| (*id, w.on_tick(now, groups, signals)))
            .filter(|(_, r)| !r.is_empty())
            .collect()
    }

    pub fn on_group_removed(&mut self, group: GroupId, now: Tick, signals: &mut dyn SignalSink) {
        for w in self.worlds.values_mut() {
            w.on_group_removed(group, now, signals);
        }
    }
}
