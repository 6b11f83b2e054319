//! Unit tests for mz-world.

#[cfg(test)]
mod helpers {
    use mz_agent::{GroupStore, GroupStoreBuilder};
    use mz_core::{BlockPos, Facing, MutexConfig, WorldId};
    use mz_spatial::RegionKey;

    use crate::{RegionSpec, RegionSpecBuilder, ZoneWorld};

    pub fn world() -> ZoneWorld {
        ZoneWorld::new(WorldId(0), MutexConfig::default())
    }

    pub fn groups() -> GroupStore {
        GroupStoreBuilder::new().group("express1").group("freight2").build().unwrap()
    }

    pub fn key(x: i32) -> RegionKey {
        RegionKey::new(BlockPos::new(x, 70, 0), Facing::Front)
    }

    /// Box spanning blocks x 10..=14, y 64..=66, z -1..=1.
    pub fn crossing_box() -> RegionSpec {
        RegionSpecBuilder::new(BlockPos::new(12, 70, 0))
            .corners(BlockPos::new(10, 64, -1), BlockPos::new(14, 66, 1))
            .build(&MutexConfig::default())
    }
}

// ── Region lifecycle ─────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use mz_core::{BlockPos, MutexConfig, Tick};
    use mz_lock::{EnterResult, RecordingSignals};

    use super::helpers::{crossing_box, groups, key, world};
    use crate::RegionSpecBuilder;

    #[test]
    fn add_publishes_everywhere() {
        let mut w = world();
        let mut signals = RecordingSignals::new();
        let id = w.add_region(crossing_box(), &mut signals);

        let region = w.region(id).unwrap();
        assert!(region.slot.is_valid());
        assert!(w.index().is_registered(id));
        assert_eq!(w.slots().get(region.slot).unwrap().regions(), &[id]);
        assert_eq!(w.find_at(BlockPos::new(12, 65, 0)), Some(id));
        assert_eq!(w.new_regions(), &[id]);
    }

    #[test]
    fn remove_tears_down_everywhere() {
        let mut w = world();
        let mut signals = RecordingSignals::new();
        let spec = crossing_box();
        let k = spec.key;
        let id = w.add_region(spec, &mut signals);
        let slot = w.region(id).unwrap().slot;

        assert!(w.remove_region(k, &mut signals));
        assert!(w.region(id).is_none());
        assert!(!w.index().is_registered(id));
        assert!(w.slots().get(slot).is_none());
        assert!(w.new_regions().is_empty());
        assert!(!w.remove_region(k, &mut signals));
    }

    #[test]
    fn readding_key_replaces_region() {
        let mut w = world();
        let mut signals = RecordingSignals::new();
        w.add_region(crossing_box(), &mut signals);
        let wider = RegionSpecBuilder::new(BlockPos::new(12, 70, 0))
            .corners(BlockPos::new(0, 64, -1), BlockPos::new(14, 66, 1))
            .build(&MutexConfig::default());
        let id = w.add_region(wider, &mut signals);

        assert_eq!(w.regions().len(), 1);
        assert_eq!(w.region_by_key(crossing_box().key), Some(id));
        assert_eq!(w.find_at(BlockPos::new(2, 65, 0)), Some(id));
    }

    #[test]
    fn removing_held_region_lowers_its_signal() {
        let mut w = world();
        let g = groups();
        let mut signals = RecordingSignals::new();
        let id = w.add_region(crossing_box(), &mut signals);
        let r = w.try_enter(id, mz_core::GroupId(0), BlockPos::new(10, 64, 0), Tick(0), &g, &mut signals);
        assert_eq!(r, EnterResult::Granted);
        assert!(signals.is_raised(&crossing_box().key));

        w.remove_region(crossing_box().key, &mut signals);
        assert!(!signals.is_raised(&crossing_box().key));
    }

    #[test]
    fn new_regions_reset_each_tick() {
        let mut w = world();
        let g = groups();
        let mut signals = RecordingSignals::new();
        w.add_region(crossing_box(), &mut signals);
        w.on_tick(Tick(0), &g, &mut signals);
        assert!(w.new_regions().is_empty());
    }

    #[test]
    fn nearby_checks_use_block_radius() {
        let mut w = world();
        let mut signals = RecordingSignals::new();
        let id = w.add_region(crossing_box(), &mut signals);
        assert!(w.is_region_nearby(BlockPos::new(8, 65, 0)));
        assert!(!w.is_region_nearby(BlockPos::new(7, 65, 0)));
        assert_eq!(w.regions_near(BlockPos::new(5, 65, 0), 5), vec![id]);
        assert!(w.regions_near(BlockPos::new(-40, 65, 0), 5).is_empty());
    }

    #[test]
    fn spec_builder_clamps() {
        let cfg = MutexConfig { max_zone_size: 10, ..MutexConfig::default() };
        let spec = RegionSpecBuilder::new(key(0).marker)
            .corners(BlockPos::new(0, 0, 0), BlockPos::new(100, 3, -50))
            .spacing(-4.0)
            .name("  gate ")
            .build(&cfg);
        assert_eq!(spec.min, BlockPos::new(0, 0, -50));
        assert_eq!(spec.max, BlockPos::new(9, 3, -41));
        assert_eq!(spec.spacing, 0.0);
        assert_eq!(spec.name, "gate");
    }
}

// ── Conflict prediction scenarios ────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use mz_core::{BlockPos, GroupId, Tick, Vec3};
    use mz_lock::{EnterResult, RecordingSignals};
    use mz_spatial::Segment;

    use super::helpers::{crossing_box, groups, key, world};
    use crate::PathOptions;

    #[test]
    fn opposite_approach_first_processed_wins() {
        let mut w = world();
        let g = groups();
        let mut signals = RecordingSignals::new();
        let id = w.add_region(crossing_box(), &mut signals);

        let east = Segment::new(Vec3::new(8.0, 64.5, 0.5), Vec3::new(12.0, 64.5, 0.5));
        let west = Segment::new(Vec3::new(17.0, 64.5, 0.5), Vec3::new(13.0, 64.5, 0.5));
        let mut c0 = w.cursor_at(east.start);
        let mut c1 = w.cursor_at(west.start);

        let h0 = w.advance(&mut c0, east, GroupId(0)).unwrap();
        assert_eq!(h0.region, id);
        assert!((h0.distance - 2.0).abs() < 1e-9);
        assert_eq!(h0.entry_block, BlockPos::new(10, 64, 0));
        let r0 = w.try_enter(h0.region, GroupId(0), h0.entry_block, Tick(0), &g, &mut signals);
        assert_eq!(r0, EnterResult::Granted);

        let h1 = w.advance(&mut c1, west, GroupId(1)).unwrap();
        assert_eq!(h1.entry_block, BlockPos::new(14, 64, 0));
        let r1 = w.try_enter(h1.region, GroupId(1), h1.entry_block, Tick(0), &g, &mut signals);
        assert_eq!(r1, EnterResult::Denied);
        // Stop at the near face, x = 15.
        assert!((h1.stop_distance - 2.0).abs() < 1e-9);
        assert!((west.point_at(h1.stop_distance).x - 15.0).abs() < 1e-9);
    }

    #[test]
    fn owner_is_never_blocked_by_its_path() {
        let mut w = world();
        let g = groups();
        let mut signals = RecordingSignals::new();
        let (owner, other) = (GroupId(0), GroupId(1));

        let cells: Vec<BlockPos> = (0..5).map(|x| BlockPos::new(x, 64, 0)).collect();
        let path = w.get_or_create_path(key(0), owner, cells[0], &PathOptions::default(), Tick(0), &mut signals);
        for &c in &cells[1..] {
            w.extend_path(path, c, Tick(0));
        }
        assert_eq!(w.region(path).unwrap().geometry.as_path().unwrap().len(), 5);

        for (t, &c) in cells.iter().enumerate() {
            let r = w.try_enter(path, owner, c, Tick(t as u64), &g, &mut signals);
            assert_ne!(r, EnterResult::Denied);
        }
        for &c in &cells {
            assert_eq!(w.try_enter(path, other, c, Tick(4), &g, &mut signals), EnterResult::Denied);
        }

        // Both see the path; only the other group has to keep its distance.
        let seg = Segment::new(Vec3::new(-3.0, 64.5, 0.5), Vec3::new(1.0, 64.5, 0.5));
        let mut cursor = w.cursor_at(seg.start);
        let own = w.advance(&mut cursor, seg, owner).unwrap();
        assert_eq!(own.region, path);
        assert!((own.stop_distance - 3.0).abs() < 1e-9);
        let hit = w.advance(&mut cursor, seg, other).unwrap();
        assert_eq!(hit.region, path);
        // Default path spacing is one block.
        assert!((hit.stop_distance - 2.0).abs() < 1e-9);
    }

    #[test]
    fn path_growth_reindexes_on_cell_change_only() {
        let mut w = world();
        let mut signals = RecordingSignals::new();
        let path = w.get_or_create_path(key(0), GroupId(0), BlockPos::new(14, 64, 0), &PathOptions::default(), Tick(0), &mut signals);
        let gen0 = w.index().generation();
        w.extend_path(path, BlockPos::new(15, 64, 0), Tick(0));
        assert_eq!(w.index().generation(), gen0);
        w.extend_path(path, BlockPos::new(16, 64, 0), Tick(0));
        assert!(w.index().generation() > gen0);
        assert_eq!(w.index().cells_of(path).len(), 2);
        assert_eq!(w.find_at(BlockPos::new(16, 64, 0)), Some(path));
    }

    #[test]
    fn path_refuses_past_budget() {
        let mut w = world();
        let mut signals = RecordingSignals::new();
        let opts = PathOptions::default().max_distance(3.0, w.config());
        let path = w.get_or_create_path(key(0), GroupId(0), BlockPos::new(0, 64, 0), &opts, Tick(0), &mut signals);
        w.extend_path(path, BlockPos::new(1, 64, 0), Tick(0));
        w.extend_path(path, BlockPos::new(2, 64, 0), Tick(0));
        assert_eq!(w.extend_path(path, BlockPos::new(3, 64, 0), Tick(0)), mz_spatial::ExtendOutcome::Saturated);
        assert_eq!(w.extend_path(mz_core::RegionId(99), BlockPos::new(3, 64, 0), Tick(0)), mz_spatial::ExtendOutcome::Saturated);
    }

    #[test]
    fn same_marker_and_group_reuses_path() {
        let mut w = world();
        let mut signals = RecordingSignals::new();
        let opts = PathOptions::default();
        let a = w.get_or_create_path(key(0), GroupId(0), BlockPos::new(0, 64, 0), &opts, Tick(0), &mut signals);
        let b = w.get_or_create_path(key(0), GroupId(0), BlockPos::new(5, 64, 0), &opts, Tick(1), &mut signals);
        let c = w.get_or_create_path(key(0), GroupId(1), BlockPos::new(5, 64, 0), &opts, Tick(1), &mut signals);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(w.path_region(key(0), GroupId(1)), Some(c));
    }

    #[test]
    fn holder_conflicts_are_reported_once() {
        let mut w = world();
        let g = groups();
        let mut signals = RecordingSignals::new();
        let spec = crate::RegionSpecBuilder::new(BlockPos::new(12, 70, 0))
            .corners(BlockPos::new(10, 64, -1), BlockPos::new(14, 66, 1))
            .policy(mz_spatial::ExclusionPolicy::PathCrossing)
            .build(&mz_core::MutexConfig::default());
        let id = w.add_region(spec, &mut signals);
        let (east, west) = (BlockPos::new(11, 64, 0), BlockPos::new(13, 64, 0));

        assert_eq!(w.try_enter(id, GroupId(0), east, Tick(0), &g, &mut signals), EnterResult::Granted);
        assert_eq!(w.try_enter(id, GroupId(1), west, Tick(0), &g, &mut signals), EnterResult::Granted);
        assert_eq!(w.try_enter(id, GroupId(1), east, Tick(0), &g, &mut signals), EnterResult::Denied);

        let report = w.on_tick(Tick(0), &g, &mut signals);
        assert!(!report.is_empty());
        assert_eq!(report.conflicts.len(), 1);
        let c = report.conflicts[0];
        assert_eq!((c.group, c.other, c.block), (GroupId(1), GroupId(0), east));
        assert_eq!(c.slot, w.region(id).unwrap().slot);

        assert_eq!(w.try_enter(id, GroupId(1), east, Tick(1), &g, &mut signals), EnterResult::Denied);
        assert!(w.on_tick(Tick(1), &g, &mut signals).conflicts.is_empty());
    }
}

// ── Path expiry ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod path_expiry {
    use mz_core::{BlockPos, GroupId, Tick};
    use mz_lock::RecordingSignals;

    use super::helpers::{groups, key, world};
    use crate::PathOptions;

    #[test]
    fn idle_path_expires_after_budget() {
        let mut w = world();
        let g = groups();
        let mut signals = RecordingSignals::new();
        let path = w.get_or_create_path(key(0), GroupId(0), BlockPos::new(0, 64, 0), &PathOptions::default(), Tick(0), &mut signals);
        for t in 0..=2 {
            assert!(w.on_tick(Tick(t), &g, &mut signals).expired_paths.is_empty());
        }
        let report = w.on_tick(Tick(3), &g, &mut signals);
        assert_eq!(report.expired_paths.len(), 1);
        assert!(w.region(path).is_none());
        assert!(!w.index().is_registered(path));
    }

    #[test]
    fn use_keeps_path_alive() {
        let mut w = world();
        let g = groups();
        let mut signals = RecordingSignals::new();
        let path = w.get_or_create_path(key(0), GroupId(0), BlockPos::new(0, 64, 0), &PathOptions::default(), Tick(0), &mut signals);
        for t in 0..50 {
            w.mark_path_used(path, Tick(t));
            assert!(w.on_tick(Tick(t), &g, &mut signals).is_empty());
        }
    }

    #[test]
    fn unloaded_owner_pauses_expiry() {
        let mut w = world();
        let mut g = groups();
        let mut signals = RecordingSignals::new();
        w.get_or_create_path(key(0), GroupId(0), BlockPos::new(0, 64, 0), &PathOptions::default(), Tick(0), &mut signals);
        w.on_tick(Tick(0), &g, &mut signals);
        w.on_tick(Tick(1), &g, &mut signals);
        g.unload(GroupId(0)).unwrap();
        for t in 2..100 {
            assert!(w.on_tick(Tick(t), &g, &mut signals).expired_paths.is_empty());
        }
        g.load(GroupId(0)).unwrap();
        assert!(w.on_tick(Tick(100), &g, &mut signals).expired_paths.is_empty());
        assert_eq!(w.on_tick(Tick(101), &g, &mut signals).expired_paths.len(), 1);
    }

    #[test]
    fn removed_owner_expires_at_once() {
        let mut w = world();
        let mut g = groups();
        let mut signals = RecordingSignals::new();
        w.get_or_create_path(key(0), GroupId(0), BlockPos::new(0, 64, 0), &PathOptions::default(), Tick(0), &mut signals);
        g.remove(GroupId(0)).unwrap();
        assert_eq!(w.on_tick(Tick(0), &g, &mut signals).expired_paths.len(), 1);
    }

    #[test]
    fn group_removal_releases_and_drops_paths() {
        let mut w = world();
        let g = groups();
        let mut signals = RecordingSignals::new();
        let id = w.add_region(super::helpers::crossing_box(), &mut signals);
        w.try_enter(id, GroupId(0), BlockPos::new(10, 64, 0), Tick(0), &g, &mut signals);
        let path = w.get_or_create_path(key(0), GroupId(0), BlockPos::new(0, 64, 0), &PathOptions::default(), Tick(0), &mut signals);

        w.on_group_removed(GroupId(0), Tick(1), &mut signals);
        assert!(w.region(path).is_none());
        let report = w.on_tick(Tick(1), &g, &mut signals);
        assert_eq!(report.released.len(), 1);
        assert_eq!(report.released[0].reason, mz_lock::ReleaseReason::Removed);
    }

}

// ── Loader ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use mz_core::{BlockPos, Facing, MutexConfig};
    use mz_spatial::ExclusionPolicy;

    use crate::load_regions_reader;

    const CSV: &str = "\
marker_x,marker_y,marker_z,facing,policy,name,predicate,x1,y1,z1,x2,y2,z2,spacing
0,70,0,front,whole,,,-2,64,-2,2,66,2,
40,70,0,back,path_crossing,junction,t@express;|n@local*,38,64,-3,44,66,3,0.5
90,70,0,,,,,,,,,,,
5,70,5,front,sideways,,,0,0,0,1,1,1,
6,70,6,front,whole,,,0,0,zero,1,1,1,
7,70,7,front,whole,,,0,0,0,1,1,1,far
x,70,0,front,whole,,,0,0,0,1,1,1,
";

    #[test]
    fn parses_rows() {
        let specs = load_regions_reader(Cursor::new(CSV), &MutexConfig::default()).unwrap();
        assert_eq!(specs.len(), 6);

        assert_eq!(specs[0].min, BlockPos::new(-2, 64, -2));
        assert_eq!(specs[0].policy, ExclusionPolicy::Whole);

        assert_eq!(specs[1].key.facing, Facing::Back);
        assert_eq!(specs[1].policy, ExclusionPolicy::PathCrossing);
        assert_eq!(specs[1].name, "junction");
        assert_eq!(specs[1].predicate, "t@express;|n@local*");
        assert_eq!(specs[1].spacing, 0.5);

        // No corners: the marker block itself.
        assert_eq!(specs[2].min, BlockPos::new(90, 70, 0));
        assert_eq!(specs[2].max, specs[2].min);
    }

    #[test]
    fn malformed_rows_degrade_to_marker_cell() {
        let specs = load_regions_reader(Cursor::new(CSV), &MutexConfig::default()).unwrap();
        for spec in &specs[3..] {
            assert_eq!(spec.min, spec.key.marker);
            assert_eq!(spec.max, spec.key.marker);
            assert!(spec.name.is_empty());
        }
    }

    #[test]
    fn short_and_broken_rows_do_not_fail_the_file() {
        let csv = "\
marker_x,marker_y,marker_z,facing,policy,name,predicate,x1,y1,z1,x2,y2,z2,spacing
0,70,0,front,whole,,,-2,64,-2,2,66,2,
1,70,1,front
2,70
40,70,0,back,path_crossing,junction,,38,64,-3,44,66,3,0.5,extra
";
        let specs = load_regions_reader(Cursor::new(csv), &MutexConfig::default()).unwrap();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].min, BlockPos::new(-2, 64, -2));
        // Missing trailing columns: a marker-cell region.
        assert_eq!(specs[1].key.marker, BlockPos::new(1, 70, 1));
        assert_eq!(specs[1].min, specs[1].key.marker);
        assert_eq!(specs[1].policy, ExclusionPolicy::Whole);
        assert_eq!(specs[2].name, "junction");
        assert_eq!(specs[2].max, BlockPos::new(44, 66, 3));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.csv");
        std::fs::write(&path, CSV).unwrap();
        let specs = crate::load_regions_csv(&path, &MutexConfig::default()).unwrap();
        assert_eq!(specs.len(), 6);
        assert!(crate::load_regions_csv(&dir.path().join("missing.csv"), &MutexConfig::default()).is_err());
    }
}

// ── Persistence ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod persist {
    use mz_core::{BlockPos, GroupId, Tick};
    use mz_lock::RecordingSignals;

    use super::helpers::{groups, key, world};
    use crate::{PathOptions, load_paths, load_paths_json, paths_to_json, save_paths};

    fn three_cell_world() -> crate::ZoneWorld {
        let mut w = world();
        let mut signals = RecordingSignals::new();
        let opts = PathOptions::default().name("spur").predicate("t@local");
        let id = w.get_or_create_path(key(0), GroupId(0), BlockPos::new(3, 64, 0), &opts, Tick(0), &mut signals);
        w.extend_path(id, BlockPos::new(2, 64, 0), Tick(0));
        w.extend_path(id, BlockPos::new(2, 64, 17), Tick(0));
        w
    }

    #[test]
    fn reload_reproduces_cells_and_envelope() {
        let g = groups();
        let src = three_cell_world();
        let json = paths_to_json(&src, &g).unwrap();

        let mut dst = world();
        let mut signals = RecordingSignals::new();
        assert_eq!(load_paths_json(&mut dst, &json, &g, Tick(9), &mut signals).unwrap(), 1);

        let a = src.region(src.path_region(key(0), GroupId(0)).unwrap()).unwrap();
        let b = dst.region(dst.path_region(key(0), GroupId(0)).unwrap()).unwrap();
        let (pa, pb) = (a.geometry.as_path().unwrap(), b.geometry.as_path().unwrap());
        assert_eq!(pa.cells().collect::<Vec<_>>(), pb.cells().collect::<Vec<_>>());
        assert_eq!(pa.envelope(), pb.envelope());
        assert_eq!(b.name, "spur");
        assert_eq!(b.predicate, "t@local");
        assert_eq!(b.spacing, a.spacing);
    }

    #[test]
    fn unknown_version_and_missing_owner_are_dropped() {
        let g = groups();
        let json = paths_to_json(&three_cell_world(), &g).unwrap();
        let mut records: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        let mut future = records[0].clone();
        future["version"] = serde_json::json!(2);
        let mut orphan = records[0].clone();
        orphan["owner"] = serde_json::json!("ghost");
        records.push(future);
        records.push(orphan);
        records.push(serde_json::json!({"cells": []}));
        let json = serde_json::to_string(&records).unwrap();

        let mut dst = world();
        let mut signals = RecordingSignals::new();
        assert_eq!(load_paths_json(&mut dst, &json, &g, Tick(0), &mut signals).unwrap(), 1);
        assert!(load_paths_json(&mut dst, "{}", &g, Tick(0), &mut signals).is_err());
    }

    #[test]
    fn removed_owner_is_dropped() {
        let mut g = groups();
        let json = paths_to_json(&three_cell_world(), &g).unwrap();
        g.remove(GroupId(0)).unwrap();
        let mut dst = world();
        let mut signals = RecordingSignals::new();
        assert_eq!(load_paths_json(&mut dst, &json, &g, Tick(0), &mut signals).unwrap(), 0);
        assert_eq!(dst.paths().count(), 0);
    }

    #[test]
    fn file_round_trip() {
        let g = groups();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("paths.json");
        save_paths(&three_cell_world(), &g, &file).unwrap();

        let mut dst = world();
        let mut signals = RecordingSignals::new();
        assert_eq!(load_paths(&mut dst, &file, &g, Tick(0), &mut signals).unwrap(), 1);
    }
}

// ── Cache ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cache {
    use mz_core::{BlockPos, GroupId, MutexConfig, Tick, WorldId};
    use mz_lock::RecordingSignals;

    use super::helpers::{crossing_box, groups, key};
    use crate::{PathOptions, ZoneCache};

    #[test]
    fn worlds_are_independent() {
        let mut cache = ZoneCache::new(MutexConfig::default());
        let mut signals = RecordingSignals::new();
        assert!(cache.world(WorldId(1)).is_none());
        cache.world_mut(WorldId(1)).add_region(crossing_box(), &mut signals);
        cache.world_mut(WorldId(0));
        assert_eq!(cache.len(), 2);
        assert!(cache.world(WorldId(0)).unwrap().find_at(BlockPos::new(12, 65, 0)).is_none());
        assert!(cache.world(WorldId(1)).unwrap().find_at(BlockPos::new(12, 65, 0)).is_some());
    }

    #[test]
    fn tick_reports_only_busy_worlds() {
        let mut cache = ZoneCache::new(MutexConfig::default());
        let g = groups();
        let mut signals = RecordingSignals::new();
        cache.world_mut(WorldId(0));
        cache.world_mut(WorldId(3)).get_or_create_path(
            key(0),
            GroupId(0),
            BlockPos::new(0, 64, 0),
            &PathOptions::default(),
            Tick(0),
            &mut signals,
        );
        for t in 0..3 {
            assert!(cache.on_tick(Tick(t), &g, &mut signals).is_empty());
        }
        let reports = cache.on_tick(Tick(3), &g, &mut signals);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, WorldId(3));
        assert!(cache.unload_world(WorldId(3)).is_some());
    }
}
