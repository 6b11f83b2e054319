//! Simulation observer trait for progress reporting and data collection.

use mz_core::{GroupId, Tick, WorldId};
use mz_lock::{EnterResult, SlotConflict, SlotRelease};
use mz_spatial::ConflictHit;
use mz_world::PathKey;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: denial counter
///
/// ```rust
/// use mz_core::{GroupId, Tick, WorldId};
/// use mz_lock::EnterResult;
/// use mz_sim::SimObserver;
/// use mz_spatial::ConflictHit;
///
/// #[derive(Default)]
/// struct Denials(usize);
///
/// impl SimObserver for Denials {
///     fn on_decision(&mut self, _: Tick, _: WorldId, _: GroupId, _: &ConflictHit, result: EnterResult) {
///         if result == EnterResult::Denied {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called for every slot request the tick loop makes: the region that
    /// was hit and the slot's answer.
    fn on_decision(
        &mut self,
        _tick:   Tick,
        _world:  WorldId,
        _group:  GroupId,
        _hit:    &ConflictHit,
        _result: EnterResult,
    ) {}

    /// Called for every holder released during the tick.
    fn on_release(&mut self, _world: WorldId, _release: &SlotRelease) {}

    /// Called when a group already inside a slot is denied a cell another
    /// holder claims.  Reported once per collision, not on every retry.
    fn on_conflict(&mut self, _world: WorldId, _conflict: &SlotConflict) {}

    /// Called when a growing path expires.
    fn on_path_expired(&mut self, _tick: Tick, _world: WorldId, _path: &PathKey) {}

    /// Called at the end of each tick.
    ///
    /// `moved` is the number of groups that had a planned segment this tick.
    fn on_tick_end(&mut self, _tick: Tick, _moved: usize) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
