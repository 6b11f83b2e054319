//! Regions: claimable volumes bound to an exclusion slot.

use std::fmt;
use std::str::FromStr;

use mz_core::{BlockPos, Facing, GroupId, SlotId, Vec3};

use crate::geometry::{Aabb, CellRange};
use crate::path::PathCells;
use crate::SpatialError;

// ── ExclusionPolicy ──────────────────────────────────────────────────────────

/// Granularity at which a region excludes other groups.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExclusionPolicy {
    /// Entering anywhere claims the whole slot.
    #[default]
    Whole,
    /// Only the unit cells a group actually travels over are claimed, so
    /// groups on non-intersecting routes can share the slot.
    PathCrossing,
}

impl ExclusionPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ExclusionPolicy::Whole => "whole",
            ExclusionPolicy::PathCrossing => "path_crossing",
        }
    }
}

impl FromStr for ExclusionPolicy {
    type Err = SpatialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "whole" | "normal" => Ok(ExclusionPolicy::Whole),
            "path_crossing" | "pathcrossing" | "smart" => Ok(ExclusionPolicy::PathCrossing),
            other => Err(SpatialError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for ExclusionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RegionKey ────────────────────────────────────────────────────────────────

/// Identity of a region: its configuration marker plus the side it faces.
///
/// The derived ordering (marker, then facing) is the order in which a
/// slot's admission statements are combined.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionKey {
    pub marker: BlockPos,
    pub facing: Facing,
}

impl RegionKey {
    pub const fn new(marker: BlockPos, facing: Facing) -> Self {
        Self { marker, facing }
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.marker, self.facing)
    }
}

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Static box between two inclusive block corners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cuboid {
    pub min: BlockPos,
    pub max: BlockPos,
    bounds: Aabb,
}

impl Cuboid {
    pub fn new(a: BlockPos, b: BlockPos) -> Self {
        Self { min: a.min(b), max: a.max(b), bounds: Aabb::from_blocks(a, b) }
    }

    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    #[inline]
    pub fn contains_block(&self, b: BlockPos) -> bool {
        b.x >= self.min.x
            && b.y >= self.min.y
            && b.z >= self.min.z
            && b.x <= self.max.x
            && b.y <= self.max.y
            && b.z <= self.max.z
    }
}

#[derive(Clone, Debug)]
pub enum RegionGeometry {
    Cuboid(Cuboid),
    Path(PathCells),
}

impl RegionGeometry {
    pub fn cuboid(a: BlockPos, b: BlockPos) -> Self {
        RegionGeometry::Cuboid(Cuboid::new(a, b))
    }

    pub fn contains(&self, p: Vec3) -> bool {
        match self {
            RegionGeometry::Cuboid(c) => c.bounds.contains(p),
            RegionGeometry::Path(path) => path.contains(p),
        }
    }

    pub fn contains_block(&self, b: BlockPos) -> bool {
        match self {
            RegionGeometry::Cuboid(c) => c.contains_block(b),
            RegionGeometry::Path(path) => path.contains_block(b),
        }
    }

    /// See [`Aabb::hit_test`].  `dir` must be a unit vector.
    pub fn hit_test(&self, origin: Vec3, dir: Vec3) -> Option<f64> {
        match self {
            RegionGeometry::Cuboid(c) => c.bounds.hit_test(origin, dir),
            RegionGeometry::Path(path) => path.hit_test(origin, dir),
        }
    }

    /// Index cells this geometry must be registered under.
    pub fn covered_cells(&self) -> CellRange {
        match self {
            RegionGeometry::Cuboid(c) => CellRange::of_blocks(c.min, c.max),
            RegionGeometry::Path(path) => path.covered_cells(),
        }
    }

    /// Inclusive block envelope.
    pub fn envelope(&self) -> (BlockPos, BlockPos) {
        match self {
            RegionGeometry::Cuboid(c) => (c.min, c.max),
            RegionGeometry::Path(path) => path.envelope(),
        }
    }

    pub fn is_nearby(&self, block: BlockPos, radius: i32) -> bool {
        let (min, max) = self.envelope();
        block.x >= min.x - radius
            && block.y >= min.y - radius
            && block.z >= min.z - radius
            && block.x <= max.x + radius
            && block.y <= max.y + radius
            && block.z <= max.z + radius
    }

    pub fn as_path(&self) -> Option<&PathCells> {
        match self {
            RegionGeometry::Path(path) => Some(path),
            RegionGeometry::Cuboid(_) => None,
        }
    }

    pub fn as_path_mut(&mut self) -> Option<&mut PathCells> {
        match self {
            RegionGeometry::Path(path) => Some(path),
            RegionGeometry::Cuboid(_) => None,
        }
    }
}

// ── Region ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Region {
    pub key: RegionKey,
    pub geometry: RegionGeometry,
    pub policy: ExclusionPolicy,
    /// Shared slot name.  Empty means anonymous: the region gets a private slot.
    pub name: String,
    /// Admission statement text.  Empty admits every group.
    pub predicate: String,
    /// Distance a denied group keeps between itself and the region.
    pub spacing: f64,
    /// Slot this region is bound to.  `SlotId::INVALID` until registered.
    pub slot: SlotId,
}

impl Region {
    #[inline]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    /// Owner of a growing path region, `None` for static regions.
    #[inline]
    pub fn path_owner(&self) -> Option<GroupId> {
        self.geometry.as_path().map(PathCells::owner)
    }

    /// Stopping spacing for `group`.  A path's own owner gets none.
    pub fn spacing_for(&self, group: GroupId) -> f64 {
        if self.path_owner() == Some(group) { 0.0 } else { self.spacing }
    }
}
