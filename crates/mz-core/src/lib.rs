//! `mz-core` — foundational types for the mutex-zone workspace.
//!
//! This crate is a dependency of every other `mz-*` crate.  It has no `mz-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`ids`]      | `GroupId`, `RegionId`, `SlotId`, `WorldId`               |
//! | [`geo`]      | `Vec3`, `BlockPos`, `CellCoord`, `Facing`                |
//! | [`time`]     | `Tick`, `SimConfig`                                      |
//! | [`config`]   | `MutexConfig` (expiry delays, path budgets, size caps)   |
//! | [`status`]   | `GroupStatus` (active / unloaded / removed)              |
//! | [`error`]    | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by the path persistence in `mz-world`.            |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod status;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::MutexConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{BlockPos, CELL_SHIFT, CellCoord, Facing, Vec3};
pub use ids::{GroupId, RegionId, SlotId, WorldId};
pub use status::GroupStatus;
pub use time::{SimConfig, Tick};
