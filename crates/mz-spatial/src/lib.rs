//! `mz-spatial` — claimable volumes and the index that finds them.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`geometry`] | `Aabb` (containment + ray hit-test), `CellRange`           |
//! | [`path`]     | `PathCells` (ordered growing unit-cell set), `ExtendOutcome` |
//! | [`region`]   | `Region`, `RegionKey`, `RegionGeometry`, `ExclusionPolicy` |
//! | [`store`]    | `RegionStore` (arena with id reuse)                        |
//! | [`index`]    | `SpatialIndex` (cell → regions, per world)                 |
//! | [`cursor`]   | `IndexCursor`, `Segment`, `ConflictHit` (conflict predictor) |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                         |
//!
//! Nothing in this crate fails at query time: lookups return `Option` or
//! empty collections.  Errors only come from parsing policy names.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod cursor;
pub mod error;
pub mod geometry;
pub mod index;
pub mod path;
pub mod region;
pub mod store;

#[cfg(test)]
mod tests;

pub use cursor::{ConflictHit, IndexCursor, Segment};
pub use error::{SpatialError, SpatialResult};
pub use geometry::{Aabb, CellRange, HIT_TOLERANCE};
pub use index::SpatialIndex;
pub use path::{ExtendOutcome, PathCells};
pub use region::{Cuboid, ExclusionPolicy, Region, RegionGeometry, RegionKey};
pub use store::RegionStore;
