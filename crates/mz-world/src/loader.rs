//! CSV region loader.
//!
//! # CSV format
//!
//! One row per region marker.
//!
//! ```csv
//! marker_x,marker_y,marker_z,facing,policy,name,predicate,x1,y1,z1,x2,y2,z2,spacing
//! 0,70,0,front,whole,,,-2,64,-2,2,66,2,
//! 40,70,0,back,path_crossing,junction,t@express,38,64,-3,44,66,3,0.5
//! 90,70,0,,,junction,,88,64,-3,94,66,3,
//! ```
//!
//! | Column         | Meaning                                                 |
//! |----------------|---------------------------------------------------------|
//! | `marker_*`     | Marker block; with `facing` it is the region's identity |
//! | `facing`       | `front` / `back`; empty means `front`                   |
//! | `policy`       | `whole` / `path_crossing`; empty means `whole`          |
//! | `name`         | Shared slot name; empty means a private slot            |
//! | `predicate`    | Admission statements separated by `;`                   |
//! | `x1..z2`       | Opposite corners; all empty means the marker block      |
//! | `spacing`      | Stopping distance in front of the region; empty is 0    |
//!
//! A row with a malformed facing, policy, corner or spacing still produces
//! a region: a single-cell anonymous one at the marker, plus a warning.  A
//! row whose marker cannot be read has no identity and is skipped.  Rows may
//! stop early; missing trailing columns read as empty.  A row the CSV reader
//! cannot decode at all is skipped with a warning.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use mz_core::{BlockPos, Facing, MutexConfig};
use mz_spatial::{ExclusionPolicy, RegionKey};

use crate::spec::{RegionSpec, RegionSpecBuilder};
use crate::{WorldError, WorldResult};

// ── CSV record ────────────────────────────────────────────────────────────────

/// Every column is read as text so one bad value degrades its row instead
/// of failing the whole file.
#[derive(Deserialize)]
struct RegionRecord {
    marker_x:  String,
    marker_y:  String,
    marker_z:  String,
    #[serde(default)]
    facing:    String,
    #[serde(default)]
    policy:    String,
    #[serde(default)]
    name:      String,
    #[serde(default)]
    predicate: String,
    #[serde(default)]
    x1:        String,
    #[serde(default)]
    y1:        String,
    #[serde(default)]
    z1:        String,
    #[serde(default)]
    x2:        String,
    #[serde(default)]
    y2:        String,
    #[serde(default)]
    z2:        String,
    #[serde(default)]
    spacing:   String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load region declarations from a CSV file.
pub fn load_regions_csv(path: &Path, config: &MutexConfig) -> WorldResult<Vec<RegionSpec>> {
    let file = std::fs::File::open(path).map_err(WorldError::Io)?;
    load_regions_reader(file, config)
}

/// Like [`load_regions_csv`] but accepts any `Read` source.
pub fn load_regions_reader<R: Read>(reader: R, config: &MutexConfig) -> WorldResult<Vec<RegionSpec>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).flexible(true).from_reader(reader);
    let mut specs = Vec::new();

    for (i, result) in csv_reader.deserialize::<RegionRecord>().enumerate() {
        let line = i + 2;
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!(line, error = %e, "region row skipped: unreadable record");
                continue;
            }
        };
        let Some(marker) = parse_marker(&row) else {
            warn!(line, "region row skipped: unreadable marker");
            continue;
        };
        match build_spec(marker, &row, config) {
            Ok(spec) => specs.push(spec),
            Err(reason) => {
                warn!(line, %marker, reason = %reason, "malformed region; using a single-cell region at the marker");
                let facing = row.facing.parse().unwrap_or_default();
                specs.push(RegionSpec::degenerate(RegionKey::new(marker, facing)));
            }
        }
    }

    Ok(specs)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_marker(row: &RegionRecord) -> Option<BlockPos> {
    Some(BlockPos::new(
        row.marker_x.parse().ok()?,
        row.marker_y.parse().ok()?,
        row.marker_z.parse().ok()?,
    ))
}

fn build_spec(marker: BlockPos, row: &RegionRecord, config: &MutexConfig) -> Result<RegionSpec, String> {
    let facing: Facing = row.facing.parse().map_err(|_| format!("invalid facing {:?}", row.facing))?;
    let policy: ExclusionPolicy = if row.policy.is_empty() {
        ExclusionPolicy::Whole
    } else {
        row.policy.parse().map_err(|_| format!("invalid policy {:?}", row.policy))?
    };
    let spacing = if row.spacing.is_empty() {
        0.0
    } else {
        row.spacing
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite())
            .ok_or_else(|| format!("invalid spacing {:?}", row.spacing))?
    };

    let mut builder = RegionSpecBuilder::new(marker)
        .facing(facing)
        .policy(policy)
        .name(row.name.as_str())
        .predicate(row.predicate.as_str())
        .spacing(spacing);

    let coords = [&row.x1, &row.y1, &row.z1, &row.x2, &row.y2, &row.z2];
    if !coords.iter().all(|c| c.is_empty()) {
        let mut v = [0i32; 6];
        for (slot, text) in v.iter_mut().zip(coords) {
            *slot = text.parse().map_err(|_| format!("invalid corner value {text:?}"))?;
        }
        builder = builder.corners(BlockPos::new(v[0], v[1], v[2]), BlockPos::new(v[3], v[4], v[5]));
    }

    Ok(builder.build(config))
}
