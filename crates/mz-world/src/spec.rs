//! Declarative region descriptions and the options for growing paths.
//!
//! ```rust
//! use mz_core::{BlockPos, MutexConfig};
//! use mz_spatial::ExclusionPolicy;
//! use mz_world::RegionSpecBuilder;
//!
//! let spec = RegionSpecBuilder::new(BlockPos::new(0, 70, 0))
//!     .corners(BlockPos::new(-2, 64, -2), BlockPos::new(2, 66, 2))
//!     .policy(ExclusionPolicy::PathCrossing)
//!     .name("junction")
//!     .build(&MutexConfig::default());
//!
//! assert_eq!(spec.max, BlockPos::new(2, 66, 2));
//! ```

use mz_core::{BlockPos, Facing, GroupId, MutexConfig, SlotId};
use mz_spatial::{ExclusionPolicy, PathCells, Region, RegionGeometry, RegionKey};

// ── Static regions ────────────────────────────────────────────────────────────

/// A fully validated cuboid region, ready for `ZoneWorld::add_region`.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionSpec {
    pub key: RegionKey,
    pub min: BlockPos,
    pub max: BlockPos,
    pub policy: ExclusionPolicy,
    pub name: String,
    pub predicate: String,
    pub spacing: f64,
}

impl RegionSpec {
    /// Single-cell anonymous region at the marker.  Stands in for a
    /// declaration that could not be understood.
    pub fn degenerate(key: RegionKey) -> Self {
        Self {
            key,
            min: key.marker,
            max: key.marker,
            policy: ExclusionPolicy::Whole,
            name: String::new(),
            predicate: String::new(),
            spacing: 0.0,
        }
    }

    pub(crate) fn into_region(self) -> Region {
        Region {
            key: self.key,
            geometry: RegionGeometry::cuboid(self.min, self.max),
            policy: self.policy,
            name: self.name,
            predicate: self.predicate,
            spacing: self.spacing,
            slot: SlotId::INVALID,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RegionSpecBuilder {
    marker: BlockPos,
    facing: Facing,
    corners: Option<(BlockPos, BlockPos)>,
    policy: ExclusionPolicy,
    name: String,
    predicate: String,
    spacing: f64,
}

impl RegionSpecBuilder {
    pub fn new(marker: BlockPos) -> Self {
        Self {
            marker,
            facing: Facing::Front,
            corners: None,
            policy: ExclusionPolicy::Whole,
            name: String::new(),
            predicate: String::new(),
            spacing: 0.0,
        }
    }

    pub fn facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    /// Two opposite inclusive corners, in any order.  Without corners the
    /// region is the marker block alone.
    pub fn corners(mut self, a: BlockPos, b: BlockPos) -> Self {
        self.corners = Some((a, b));
        self
    }

    pub fn policy(mut self, policy: ExclusionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Admission statements; several may be separated by newlines or `;`.
    pub fn predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicate = predicate.into();
        self
    }

    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Normalise corners, cap every edge at `max_zone_size` blocks
    /// (measured from the minimum corner) and clamp spacing into
    /// `0..=max_zone_size`.
    pub fn build(self, config: &MutexConfig) -> RegionSpec {
        let (a, b) = self.corners.unwrap_or((self.marker, self.marker));
        let min = a.min(b);
        let mut max = a.max(b);
        let edge = config.max_zone_size.max(1) - 1;
        max.x = max.x.min(min.x.saturating_add(edge));
        max.y = max.y.min(min.y.saturating_add(edge));
        max.z = max.z.min(min.z.saturating_add(edge));

        RegionSpec {
            key: RegionKey::new(self.marker, self.facing),
            min,
            max,
            policy: self.policy,
            name: self.name.trim().to_string(),
            predicate: self.predicate,
            spacing: clamp_distance(self.spacing, config),
        }
    }
}

// ── Growing paths ─────────────────────────────────────────────────────────────

/// Settings for a growing path region.  Distances are clamped into
/// `0..=max_zone_size`.
#[derive(Clone, Debug, PartialEq)]
pub struct PathOptions {
    pub spacing: f64,
    pub max_distance: f64,
    pub policy: ExclusionPolicy,
    pub name: String,
    pub predicate: String,
}

impl PathOptions {
    /// Defaults from `config`: `path_spacing` and `path_max_distance`.
    pub fn new(config: &MutexConfig) -> Self {
        Self {
            spacing: clamp_distance(config.path_spacing, config),
            max_distance: clamp_distance(config.path_max_distance, config),
            policy: ExclusionPolicy::Whole,
            name: String::new(),
            predicate: String::new(),
        }
    }

    pub fn spacing(mut self, spacing: f64, config: &MutexConfig) -> Self {
        self.spacing = clamp_distance(spacing, config);
        self
    }

    pub fn max_distance(mut self, max_distance: f64, config: &MutexConfig) -> Self {
        self.max_distance = clamp_distance(max_distance, config);
        self
    }

    pub fn policy(mut self, policy: ExclusionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicate = predicate.into();
        self
    }

    pub(crate) fn into_region(self, key: RegionKey, owner: GroupId, initial: BlockPos) -> Region {
        Region {
            key,
            geometry: RegionGeometry::Path(PathCells::new(owner, initial, self.max_distance)),
            policy: self.policy,
            name: self.name,
            predicate: self.predicate,
            spacing: self.spacing,
            slot: SlotId::INVALID,
        }
    }
}

impl Default for PathOptions {
    fn default() -> Self {
        Self::new(&MutexConfig::default())
    }
}

fn clamp_distance(value: f64, config: &MutexConfig) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, f64::from(config.max_zone_size.max(0)))
}
