//! Fluent builder for constructing a [`Sim`].

use mz_agent::GroupStore;
use mz_core::{SimConfig, WorldId};
use mz_lock::SignalSink;
use mz_world::{RegionSpec, ZoneCache};

use crate::{Mover, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<M, S>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: total ticks plus the lock policy in `config.mutex`
/// - [`GroupStore`]: from [`mz_agent::GroupStoreBuilder`]
/// - `M: Mover`: the movement engine, one entry per group
/// - `S: SignalSink`: where region signals go
///
/// # Optional inputs
///
/// | Method               | Default                        |
/// |----------------------|--------------------------------|
/// | `.regions(world, v)` | No regions in any world        |
/// | `.zones(cache)`      | Empty `ZoneCache`              |
///
/// # Example
///
/// ```rust,ignore
/// let groups = GroupStoreBuilder::new().group("express1").build()?;
/// let mut sim = SimBuilder::new(config, groups, mover, NoopSignals)
///     .regions(WorldId(0), load_regions_csv("regions.csv", &config.mutex)?)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<M: Mover, S: SignalSink> {
    config:  SimConfig,
    groups:  GroupStore,
    mover:   M,
    signals: S,
    zones:   Option<ZoneCache>,
    regions: Vec<(WorldId, RegionSpec)>,
}

impl<M: Mover, S: SignalSink> SimBuilder<M, S> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, groups: GroupStore, mover: M, signals: S) -> Self {
        Self { config, groups, mover, signals, zones: None, regions: Vec::new() }
    }

    /// Add static regions to `world`.  May be called once per world or
    /// repeatedly; later specs replace earlier ones with the same key.
    pub fn regions(mut self, world: WorldId, specs: Vec<RegionSpec>) -> Self {
        self.regions.extend(specs.into_iter().map(|s| (world, s)));
        self
    }

    /// Start from existing zone state instead of an empty cache.
    ///
    /// The cache keeps its own `MutexConfig`.
    pub fn zones(mut self, zones: ZoneCache) -> Self {
        self.zones = Some(zones);
        self
    }

    /// Validate inputs, publish the regions and return a ready-to-run
    /// [`Sim`].
    pub fn build(mut self) -> SimResult<Sim<M, S>> {
        self.config.validate()?;

        let group_count = self.groups.count;
        if self.mover.group_count() != group_count {
            return Err(SimError::GroupCountMismatch {
                expected: group_count,
                got:      self.mover.group_count(),
                what:     "mover",
            });
        }

        let mut zones = self.zones.unwrap_or_else(|| ZoneCache::new(self.config.mutex.clone()));
        for (world, spec) in self.regions {
            zones.world_mut(world).add_region(spec, &mut self.signals);
        }

        // Seed the store so tick 0 sees where everyone starts.
        for group in self.groups.group_ids().collect::<Vec<_>>() {
            self.groups.set_position(group, self.mover.current_position(group))?;
            self.groups.set_occupied(group, self.mover.occupied_cells(group))?;
        }

        Ok(Sim::new(self.config, self.groups, zones, self.mover, self.signals))
    }
}
