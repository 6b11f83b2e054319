//! External signal boundary.
//!
//! Whenever a slot goes from unheld to held, every bound region's signal is
//! raised; when it goes back to unheld, they are lowered.  What a "signal"
//! drives (a lever, a lamp, a network message) is the sink's business.
//! Failures are best-effort: they are logged and never change lock state.

use tracing::warn;

use mz_spatial::RegionKey;

use crate::SignalError;

pub trait SignalSink {
    fn raise(&mut self, key: &RegionKey) -> Result<(), SignalError>;
    fn lower(&mut self, key: &RegionKey) -> Result<(), SignalError>;
}

/// Sink that does nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopSignals;

impl SignalSink for NoopSignals {
    fn raise(&mut self, _key: &RegionKey) -> Result<(), SignalError> {
        Ok(())
    }

    fn lower(&mut self, _key: &RegionKey) -> Result<(), SignalError> {
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SignalEvent {
    pub key: RegionKey,
    pub raised: bool,
}

/// Sink that records every call in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSignals {
    pub events: Vec<SignalEvent>,
}

impl RecordingSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the most recent event for `key` was a raise.
    pub fn is_raised(&self, key: &RegionKey) -> bool {
        self.events.iter().rev().find(|e| e.key == *key).is_some_and(|e| e.raised)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl SignalSink for RecordingSignals {
    fn raise(&mut self, key: &RegionKey) -> Result<(), SignalError> {
        self.events.push(SignalEvent { key: *key, raised: true });
        Ok(())
    }

    fn lower(&mut self, key: &RegionKey) -> Result<(), SignalError> {
        self.events.push(SignalEvent { key: *key, raised: false });
        Ok(())
    }
}

/// Raise or lower every key, logging (not propagating) failures.
pub(crate) fn emit<'a>(
    sink: &mut dyn SignalSink,
    keys: impl IntoIterator<Item = &'a RegionKey>,
    raised: bool,
) {
    for key in keys {
        let result = if raised { sink.raise(key) } else { sink.lower(key) };
        if let Err(e) = result {
            warn!(region = %key, raised, error = %e, "signal update failed");
        }
    }
}
