//! `mz-lock` — the mutual-exclusion layer.
//!
//! A [`Slot`] is the lock.  One or more regions bind to it (by sharing a
//! name, or 1:1 for anonymous regions), so physically separate areas behave
//! as one resource.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`admission`] | `AdmissionPredicate` (which groups a slot applies to)       |
//! | [`expiry`]    | `ExpiryDelays`, `Holder`, per-holder expiry evaluation      |
//! | [`slot`]      | `Slot`, `EnterRequest`, `EnterResult`, `LockContext`        |
//! | [`registry`]  | `SlotRegistry` (named + anonymous slots, sweep), events     |
//! | [`signal`]    | `SignalSink` trait, `NoopSignals`, `RecordingSignals`       |
//! | [`error`]     | `SignalError`                                               |
//!
//! # Tick contract
//!
//! ```text
//! for each group in ascending GroupId:
//!     try_enter(...)        → Granted | Denied | Ignored
//! registry.sweep(ctx, ..)   → releases holders absent past their delay
//! ```
//!
//! Nothing here blocks or fails.  Signal failures are logged and dropped.

pub mod admission;
pub mod error;
pub mod expiry;
pub mod registry;
pub mod signal;
pub mod slot;


pub use admission::AdmissionPredicate;
pub use error::SignalError;
pub use expiry::{ExpiryDelays, Holder};
pub use registry::{ReleaseReason, SlotConflict, SlotEvents, SlotRegistry, SlotRelease};
pub use signal::{NoopSignals, RecordingSignals, SignalEvent, SignalSink};
pub use slot::{EnterRequest, EnterResult, LockContext, Slot};
