//! `mz-world` — zone state for whole worlds.
//!
//! Ties the spatial index, the region store and the slot registry together
//! behind one facade per world, so a region is always published or torn
//! down as a unit.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`spec`]    | `RegionSpec`, `RegionSpecBuilder`, `PathOptions`             |
//! | [`world`]   | `ZoneWorld`, `PathKey`, `SweepReport`                        |
//! | [`cache`]   | `ZoneCache` (`WorldId` → `ZoneWorld`)                        |
//! | [`loader`]  | CSV region loading                                           |
//! | [`persist`] | `PathRecord` and JSON save/load of growing paths             |
//! | [`error`]   | `WorldError`, `WorldResult<T>`                               |

pub mod cache;
pub mod error;
pub mod loader;
pub mod persist;
pub mod spec;
pub mod world;

#[cfg(test)]
mod tests;

pub use cache::ZoneCache;
pub use error::{WorldError, WorldResult};
pub use loader::{load_regions_csv, load_regions_reader};
pub use persist::{PATH_RECORD_VERSION, PathRecord, load_paths, load_paths_json, path_records, paths_to_json, save_paths};
pub use spec::{PathOptions, RegionSpec, RegionSpecBuilder};
pub use world::{PathKey, SweepReport, ZoneWorld};
