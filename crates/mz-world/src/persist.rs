//! Persistence for growing paths.
//!
//! Static regions are rebuilt from their configuration, so only paths are
//! saved.  The file is a JSON array of versioned records:
//!
//! ```json
//! [{"version":1,"marker":{"marker":{"x":0,"y":64,"z":0},"facing":"front"},
//!   "owner":"express1","policy":"whole","name":"","predicate":"",
//!   "spacing":1.0,"max_distance":64.0,
//!   "cells":[{"x":0,"y":64,"z":0},{"x":1,"y":64,"z":0}]}]
//! ```
//!
//! Loading is lenient per record: an unknown version is dropped with a
//! warning, a record whose owner no longer exists is dropped quietly.  Only
//! a file that is not a JSON array at all is an error.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use mz_agent::GroupLookup;
use mz_core::{BlockPos, MutexConfig, Tick};
use mz_lock::SignalSink;
use mz_spatial::{ExclusionPolicy, RegionKey};

use crate::spec::PathOptions;
use crate::world::ZoneWorld;
use crate::WorldResult;

pub const PATH_RECORD_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    pub version: u32,
    pub marker: RegionKey,
    /// Owning group, by name.
    pub owner: String,
    pub policy: ExclusionPolicy,
    pub name: String,
    pub predicate: String,
    pub spacing: f64,
    pub max_distance: f64,
    /// Cells in growth order.  Never empty.
    pub cells: Vec<BlockPos>,
}

#[derive(Deserialize)]
struct VersionProbe {
    #[serde(default)]
    version: Option<u32>,
}

/// Snapshot every live path in `world`.  Paths whose owner has no name are
/// skipped: they could not be matched up again on load.
pub fn path_records(world: &ZoneWorld, groups: &dyn GroupLookup) -> Vec<PathRecord> {
    world
        .paths()
        .filter_map(|(key, region)| {
            let path = region.geometry.as_path()?;
            let owner = groups.name(key.group)?;
            Some(PathRecord {
                version: PATH_RECORD_VERSION,
                marker: key.marker,
                owner: owner.to_string(),
                policy: region.policy,
                name: region.name.clone(),
                predicate: region.predicate.clone(),
                spacing: region.spacing,
                max_distance: path.max_distance(),
                cells: path.cells().collect(),
            })
        })
        .collect()
}

pub fn paths_to_json(world: &ZoneWorld, groups: &dyn GroupLookup) -> WorldResult<String> {
    Ok(serde_json::to_string_pretty(&path_records(world, groups))?)
}

pub fn save_paths(world: &ZoneWorld, groups: &dyn GroupLookup, path: &Path) -> WorldResult<()> {
    std::fs::write(path, paths_to_json(world, groups)?)?;
    Ok(())
}

/// Recreate paths from `json` in `world`.  Returns how many were restored.
pub fn load_paths_json(
    world: &mut ZoneWorld,
    json: &str,
    groups: &dyn GroupLookup,
    now: Tick,
    signals: &mut dyn SignalSink,
) -> WorldResult<usize> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut restored = 0;
    for value in raw {
        let version = VersionProbe::deserialize(&value).ok().and_then(|p| p.version);
        if version != Some(PATH_RECORD_VERSION) {
            warn!(?version, "dropping path record with unsupported version");
            continue;
        }
        let record: PathRecord = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "dropping unreadable path record");
                continue;
            }
        };
        if restore(world, record, groups, now, signals) {
            restored += 1;
        }
    }
    Ok(restored)
}

pub fn load_paths(
    world: &mut ZoneWorld,
    path: &Path,
    groups: &dyn GroupLookup,
    now: Tick,
    signals: &mut dyn SignalSink,
) -> WorldResult<usize> {
    let json = std::fs::read_to_string(path)?;
    load_paths_json(world, &json, groups, now, signals)
}

fn restore(
    world: &mut ZoneWorld,
    record: PathRecord,
    groups: &dyn GroupLookup,
    now: Tick,
    signals: &mut dyn SignalSink,
) -> bool {
    let owner = groups.find_by_name(&record.owner).filter(|g| !groups.status(*g).is_removed());
    let Some(owner) = owner else {
        debug!(owner = %record.owner, marker = %record.marker, "dropping path record for missing owner");
        return false;
    };
    let Some((&first, rest)) = record.cells.split_first() else {
        warn!(marker = %record.marker, "dropping path record without cells");
        return false;
    };

    let config: &MutexConfig = world.config();
    let options = PathOptions::new(config)
        .spacing(record.spacing, config)
        .max_distance(record.max_distance, config)
        .policy(record.policy)
        .name(record.name)
        .predicate(record.predicate);
    let id = world.get_or_create_path(record.marker, owner, first, &options, now, signals);
    for &cell in rest {
        world.extend_path(id, cell, now);
    }
    true
}
