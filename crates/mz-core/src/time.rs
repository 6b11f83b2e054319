//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter and nothing else.  Every
//! delay in the lock layer (expiry, path idle budget, contention window) is a
//! whole number of ticks, so all timing arithmetic is exact.

use std::fmt;

use crate::{CoreError, CoreResult, MutexConfig};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, or 0 if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from JSON by the application crate and passed to the
/// simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Flush output every N ticks.  1 = every tick.
    pub output_interval_ticks: u64,

    /// Lock-layer policy constants.
    #[cfg_attr(feature = "serde", serde(default))]
    pub mutex: MutexConfig,
}

impl SimConfig {
    pub fn new(total_ticks: u64) -> Self {
        Self {
            total_ticks,
            output_interval_ticks: 1,
            mutex: MutexConfig::default(),
        }
    }

    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.output_interval_ticks == 0 {
            return Err(CoreError::Config("output_interval_ticks must be > 0".into()));
        }
        self.mutex.validate()
    }
}
