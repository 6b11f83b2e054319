//! `mz-sim` — tick loop orchestrator for the mutex-zone workspace.
//!
//! # Three-phase tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Decide  — for each active group in ascending GroupId order:
//!                 planned segment → nearest region → try_enter
//!                 Granted / Ignored → look past it for the next region
//!                 Denied            → StopAt(stop_distance)
//!               groups without a segment claim fresh regions they stand in.
//!   ② Sync    — copy position and occupied cells from the Mover into the
//!               GroupStore.
//!   ③ Sweep   — ZoneCache::on_tick: slot expiry, path expiry, reset of the
//!               new-regions list.  Releases are reported to the observer.
//! ```
//!
//! Movement itself belongs to a [`Mover`].  [`LinearMover`] is a small
//! reference engine that runs each group along a fixed polyline.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mz_agent::GroupStoreBuilder;
//! use mz_core::{SimConfig, Vec3, WorldId};
//! use mz_lock::NoopSignals;
//! use mz_sim::{LinearMover, NoopObserver, SimBuilder, Track};
//!
//! let groups = GroupStoreBuilder::new().group("express1").build()?;
//! let mut mover = LinearMover::new();
//! mover.add_group(Track::new(vec![Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0)])?, 1.0, 3.0);
//! let mut sim = SimBuilder::new(SimConfig::new(200), groups, mover, NoopSignals)
//!     .regions(WorldId(0), specs)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod linear;
pub mod mover;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use linear::{LinearMover, Track};
pub use mover::{Decision, Mover};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
