//! `EventLogObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use mz_core::{GroupId, SimConfig, Tick, WorldId};
use mz_lock::{EnterResult, SlotRelease};
use mz_sim::SimObserver;
use mz_spatial::ConflictHit;

use crate::row::{DecisionRow, ReleaseRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that logs every slot decision and release to any
/// [`OutputWriter`] backend (CSV, SQLite).
///
/// Rows are buffered and handed to the writer every
/// `config.output_interval_ticks` ticks, and once more at the end of the run.
/// A summary row is written for every tick.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct EventLogObserver<W: OutputWriter> {
    writer:     W,
    interval:   u64,
    decisions:  Vec<DecisionRow>,
    releases:   Vec<ReleaseRow>,
    summary:    TickSummaryRow,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> EventLogObserver<W> {
    /// Create an observer backed by `writer`, flushing on `config`'s output
    /// interval.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            interval:   config.output_interval_ticks.max(1),
            decisions:  Vec::new(),
            releases:   Vec::new(),
            summary:    empty_summary(Tick::ZERO),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush(&mut self) {
        if !self.decisions.is_empty() {
            let result = self.writer.write_decisions(&self.decisions);
            self.decisions.clear();
            self.store_err(result);
        }
        if !self.releases.is_empty() {
            let result = self.writer.write_releases(&self.releases);
            self.releases.clear();
            self.store_err(result);
        }
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

fn empty_summary(tick: Tick) -> TickSummaryRow {
    TickSummaryRow { tick: tick.0, moving: 0, granted: 0, denied: 0, released: 0 }
}

impl<W: OutputWriter> SimObserver for EventLogObserver<W> {
    fn on_tick_start(&mut self, tick: Tick) {
        self.summary = empty_summary(tick);
    }

    fn on_decision(&mut self, tick: Tick, world: WorldId, group: GroupId, hit: &ConflictHit, result: EnterResult) {
        match result {
            EnterResult::Granted => self.summary.granted += 1,
            EnterResult::Denied => self.summary.denied += 1,
            EnterResult::Ignored => {}
        }
        self.decisions.push(DecisionRow {
            tick:     tick.0,
            world:    u32::from(world.0),
            group:    group.0,
            region:   hit.region.0,
            distance: hit.distance,
            entry:    (hit.entry_block.x, hit.entry_block.y, hit.entry_block.z),
            result:   result.as_str(),
        });
    }

    fn on_release(&mut self, world: WorldId, release: &SlotRelease) {
        self.summary.released += 1;
        self.releases.push(ReleaseRow {
            tick:   release.tick.0,
            world:  u32::from(world.0),
            slot:   release.slot.0,
            group:  release.group.0,
            reason: release.reason.as_str(),
        });
    }

    fn on_tick_end(&mut self, tick: Tick, moved: usize) {
        self.summary.moving = moved as u64;
        let result = self.writer.write_tick_summary(&self.summary);
        self.store_err(result);
        if (tick.0 + 1) % self.interval == 0 {
            self.flush();
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        self.flush();
        let result = self.writer.finish();
        self.store_err(result);
    }
}
