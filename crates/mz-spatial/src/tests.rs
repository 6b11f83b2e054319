//! Unit tests for mz-spatial.
//!
//! All tests build regions by hand; no configuration loading involved.

#[cfg(test)]
mod helpers {
    use mz_core::{BlockPos, Facing, GroupId, RegionId, SlotId};

    use crate::{
        ExclusionPolicy, PathCells, Region, RegionGeometry, RegionKey, RegionStore, SpatialIndex,
    };

    pub fn cuboid_region(a: BlockPos, b: BlockPos, spacing: f64) -> Region {
        Region {
            key: RegionKey::new(a, Facing::Front),
            geometry: RegionGeometry::cuboid(a, b),
            policy: ExclusionPolicy::Whole,
            name: String::new(),
            predicate: String::new(),
            spacing,
            slot: SlotId::INVALID,
        }
    }

    pub fn path_region(owner: GroupId, cells: &[BlockPos]) -> Region {
        let mut path = PathCells::new(owner, cells[0], 64.0);
        for &c in &cells[1..] {
            path.extend(c);
        }
        Region {
            key: RegionKey::new(cells[0], Facing::Back),
            geometry: RegionGeometry::Path(path),
            policy: ExclusionPolicy::Whole,
            name: String::new(),
            predicate: String::new(),
            spacing: 1.0,
            slot: SlotId::INVALID,
        }
    }

    /// Insert into the store and register in the index, the way a world does.
    pub fn place(store: &mut RegionStore, index: &mut SpatialIndex, region: Region) -> RegionId {
        let id = store.insert(region);
        let geometry = store.get(id).unwrap().geometry.clone();
        index.add(id, &geometry);
        id
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod geometry {
    use mz_core::{BlockPos, CellCoord, Vec3};

    use crate::{Aabb, CellRange};

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0))
    }

    #[test]
    fn inside_origin_hits_at_zero() {
        let hit = unit_box().hit_test(Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(hit, Some(0.0));
    }

    #[test]
    fn hit_distance_is_near_face() {
        let hit = unit_box().hit_test(Vec3::new(-3.0, 1.0, 1.0), Vec3::new(1.0, 0.0, 0.0));
        assert!((hit.unwrap() - 3.0).abs() < 1e-12);
        let back = unit_box().hit_test(Vec3::new(5.0, 1.0, 1.0), Vec3::new(-1.0, 0.0, 0.0));
        assert!((back.unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn diagonal_ray() {
        let d = Vec3::new(1.0, 0.0, 1.0).normalized().unwrap();
        let hit = unit_box().hit_test(Vec3::new(-1.0, 1.0, -1.0), d).unwrap();
        assert!((hit - 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn miss_and_pointing_away() {
        // Passes above the box.
        assert_eq!(unit_box().hit_test(Vec3::new(-3.0, 5.0, 1.0), Vec3::new(1.0, 0.0, 0.0)), None);
        // Points away.
        assert_eq!(unit_box().hit_test(Vec3::new(-3.0, 1.0, 1.0), Vec3::new(-1.0, 0.0, 0.0)), None);
    }

    #[test]
    fn grazing_edge_counts_within_tolerance() {
        let hit = unit_box().hit_test(Vec3::new(-1.0, 2.0 + 1e-12, 1.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(hit.is_some());
    }

    #[test]
    fn from_blocks_is_inclusive() {
        let b = Aabb::from_blocks(BlockPos::new(3, 0, 3), BlockPos::new(1, 0, 1));
        assert_eq!(b.min, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(b.max, Vec3::new(4.0, 1.0, 4.0));
    }

    #[test]
    fn cell_range_iteration() {
        let r = CellRange::of_blocks(BlockPos::new(-1, 0, 0), BlockPos::new(16, 0, 0));
        let cells: Vec<_> = r.iter().collect();
        assert_eq!(cells, vec![CellCoord::new(-1, 0), CellCoord::new(0, 0), CellCoord::new(1, 0)]);
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn cuboid_contains_block_matches_bounds() {
        let g = crate::RegionGeometry::cuboid(BlockPos::new(0, 0, 0), BlockPos::new(2, 2, 2));
        assert!(g.contains_block(BlockPos::new(2, 2, 2)));
        assert!(!g.contains_block(BlockPos::new(3, 2, 2)));
        assert!(g.contains(Vec3::new(3.0, 1.0, 1.0)));
        assert!(!g.contains(Vec3::new(3.01, 1.0, 1.0)));
    }
}

// ── Path cells ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod path {
    use mz_core::{BlockPos, GroupId, Vec3};

    use crate::{ExtendOutcome, PathCells};

    #[test]
    fn extend_is_idempotent() {
        let mut p = PathCells::new(GroupId(0), BlockPos::new(0, 0, 0), 64.0);
        assert_eq!(p.extend(BlockPos::new(1, 0, 0)), ExtendOutcome::Added { cells_changed: false });
        assert_eq!(p.extend(BlockPos::new(1, 0, 0)), ExtendOutcome::AlreadyPresent);
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn crossing_cell_boundary_reports_change() {
        let mut p = PathCells::new(GroupId(0), BlockPos::new(15, 0, 0), 64.0);
        assert_eq!(p.extend(BlockPos::new(16, 0, 0)), ExtendOutcome::Added { cells_changed: true });
        assert_eq!(p.extend(BlockPos::new(17, 0, 0)), ExtendOutcome::Added { cells_changed: false });
        // Going back into an already covered cell is not a change either.
        assert_eq!(p.extend(BlockPos::new(14, 0, 0)), ExtendOutcome::Added { cells_changed: false });
    }

    #[test]
    fn budget_saturates() {
        let mut p = PathCells::new(GroupId(0), BlockPos::new(0, 0, 0), 3.0);
        assert!(matches!(p.extend(BlockPos::new(1, 0, 0)), ExtendOutcome::Added { .. }));
        assert!(matches!(p.extend(BlockPos::new(2, 0, 0)), ExtendOutcome::Added { .. }));
        assert_eq!(p.extend(BlockPos::new(3, 0, 0)), ExtendOutcome::Saturated);
        // Known cells are still reported as present, not saturated.
        assert_eq!(p.extend(BlockPos::new(1, 0, 0)), ExtendOutcome::AlreadyPresent);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn order_and_envelope() {
        let mut p = PathCells::new(GroupId(0), BlockPos::new(5, 1, 5), 64.0);
        p.extend(BlockPos::new(4, 1, 5));
        p.extend(BlockPos::new(4, 2, 6));
        let cells: Vec<_> = p.cells().collect();
        assert_eq!(cells, vec![BlockPos::new(5, 1, 5), BlockPos::new(4, 1, 5), BlockPos::new(4, 2, 6)]);
        assert_eq!(p.envelope(), (BlockPos::new(4, 1, 5), BlockPos::new(5, 2, 6)));
    }

    #[test]
    fn hit_test_takes_nearest_cell() {
        let mut p = PathCells::new(GroupId(0), BlockPos::new(10, 0, 0), 64.0);
        p.extend(BlockPos::new(5, 0, 0));
        let hit = p.hit_test(Vec3::new(0.0, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert!((hit - 5.0).abs() < 1e-12);
    }

    #[test]
    fn contains_closed_on_shared_face() {
        let p = PathCells::new(GroupId(0), BlockPos::new(0, 0, 0), 64.0);
        assert!(p.contains(Vec3::new(0.5, 0.5, 0.5)));
        // Upper face of the cell belongs to the next block over.
        assert!(p.contains(Vec3::new(1.0, 0.5, 0.5)));
        assert!(!p.contains(Vec3::new(1.5, 0.5, 0.5)));
    }
}

// ── Index ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use mz_core::{BlockPos, CellCoord, GroupId, RegionId};

    use super::helpers::{cuboid_region, path_region, place};
    use crate::{RegionStore, SpatialIndex};

    #[test]
    fn empty_cell_is_empty() {
        let index = SpatialIndex::new();
        assert!(index.regions_near(CellCoord::new(4, 4), 2).is_empty());
        assert!(index.regions_in_cell(CellCoord::new(0, 0)).is_empty());
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut index = SpatialIndex::new();
        let g = index.generation();
        assert!(!index.remove(RegionId(7)));
        assert_eq!(index.generation(), g);
    }

    #[test]
    fn spanning_region_listed_under_every_cell() {
        let (mut store, mut index) = (RegionStore::new(), SpatialIndex::new());
        let id = place(
            &mut store,
            &mut index,
            cuboid_region(BlockPos::new(-4, 0, 10), BlockPos::new(20, 3, 40), 0.0),
        );
        for x in -1..=1 {
            for z in 0..=2 {
                assert_eq!(index.regions_in_cell(CellCoord::new(x, z)), &[id]);
            }
        }
        assert_eq!(index.cells_of(id).len(), 9);
        assert!(index.remove(id));
        assert_eq!(index.cell_count(), 0);
    }

    #[test]
    fn regions_near_dedups_and_sorts() {
        let (mut store, mut index) = (RegionStore::new(), SpatialIndex::new());
        let a = place(&mut store, &mut index, cuboid_region(BlockPos::new(0, 0, 0), BlockPos::new(40, 0, 0), 0.0));
        let b = place(&mut store, &mut index, cuboid_region(BlockPos::new(1, 0, 1), BlockPos::new(2, 0, 2), 0.0));
        assert_eq!(index.regions_near(CellCoord::new(1, 0), 1), vec![a, b]);
        assert_eq!(index.regions_near(CellCoord::new(2, 0), 0), vec![a]);
    }

    #[test]
    fn grow_registers_only_new_cells() {
        let (mut store, mut index) = (RegionStore::new(), SpatialIndex::new());
        let id = place(&mut store, &mut index, path_region(GroupId(0), &[BlockPos::new(14, 0, 0)]));
        assert_eq!(index.cells_of(id), &[CellCoord::new(0, 0)]);

        let region = store.get_mut(id).unwrap();
        region.geometry.as_path_mut().unwrap().extend(BlockPos::new(15, 0, 0));
        assert_eq!(index.grow(id, &store.get(id).unwrap().geometry), 0);

        store.get_mut(id).unwrap().geometry.as_path_mut().unwrap().extend(BlockPos::new(16, 0, 0));
        assert_eq!(index.grow(id, &store.get(id).unwrap().geometry), 1);
        assert_eq!(index.regions_in_cell(CellCoord::new(1, 0)), &[id]);
        assert_eq!(index.cells_of(id).len(), 2);

        index.remove(id);
        assert!(index.regions_in_cell(CellCoord::new(0, 0)).is_empty());
        assert!(index.regions_in_cell(CellCoord::new(1, 0)).is_empty());
    }

    #[test]
    fn nearby_and_containing() {
        let (mut store, mut index) = (RegionStore::new(), SpatialIndex::new());
        let id = place(&mut store, &mut index, cuboid_region(BlockPos::new(5, 0, 5), BlockPos::new(6, 1, 6), 0.0));
        assert!(index.is_region_nearby(BlockPos::new(3, 0, 5), 2, &store));
        assert!(!index.is_region_nearby(BlockPos::new(2, 0, 5), 2, &store));
        assert_eq!(index.find_nearby(BlockPos::new(7, 0, 7), 1, &store), vec![id]);
        assert_eq!(index.find_containing(BlockPos::new(6, 1, 5), &store), Some(id));
        assert_eq!(index.find_containing(BlockPos::new(7, 1, 5), &store), None);
    }

    #[test]
    fn region_store_reuses_ids() {
        let mut store = RegionStore::new();
        let a = store.insert(cuboid_region(BlockPos::new(0, 0, 0), BlockPos::new(0, 0, 0), 0.0));
        let b = store.insert(cuboid_region(BlockPos::new(1, 0, 0), BlockPos::new(1, 0, 0), 0.0));
        assert!(store.remove(a).is_some());
        assert!(store.remove(a).is_none());
        let c = store.insert(cuboid_region(BlockPos::new(2, 0, 0), BlockPos::new(2, 0, 0), 0.0));
        assert_eq!(c, a);
        assert_eq!(store.len(), 2);
        assert_eq!(store.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![a, b]);
    }
}

// ── Cursor / conflict predictor ───────────────────────────────────────────────

#[cfg(test)]
mod cursor {
    use mz_core::{BlockPos, CellCoord, GroupId, Vec3};

    use super::helpers::{cuboid_region, path_region, place};
    use crate::{RegionStore, Segment, SpatialIndex};

    #[test]
    fn finds_box_ahead_within_segment() {
        let (mut store, mut index) = (RegionStore::new(), SpatialIndex::new());
        let id = place(&mut store, &mut index, cuboid_region(BlockPos::new(8, 0, 0), BlockPos::new(10, 2, 2), 1.5));

        let mut cur = index.cursor_at(CellCoord::new(0, 0));
        let seg = Segment::new(Vec3::new(2.0, 0.5, 0.5), Vec3::new(12.0, 0.5, 0.5));
        let hit = cur.advance_to(&index, &store, seg, GroupId(0)).unwrap();
        assert_eq!(hit.region, id);
        assert!((hit.distance - 6.0).abs() < 1e-12);
        assert!((hit.stop_distance - 4.5).abs() < 1e-12);
        assert_eq!(hit.entry_block, BlockPos::new(8, 0, 0));
    }

    #[test]
    fn hit_beyond_segment_is_ignored() {
        let (mut store, mut index) = (RegionStore::new(), SpatialIndex::new());
        place(&mut store, &mut index, cuboid_region(BlockPos::new(8, 0, 0), BlockPos::new(10, 2, 2), 0.0));
        let mut cur = index.cursor_at(CellCoord::new(0, 0));
        let seg = Segment::new(Vec3::new(2.0, 0.5, 0.5), Vec3::new(7.0, 0.5, 0.5));
        assert!(cur.advance_to(&index, &store, seg, GroupId(0)).is_none());
    }

    #[test]
    fn nearest_of_several_wins() {
        let (mut store, mut index) = (RegionStore::new(), SpatialIndex::new());
        let _far = place(&mut store, &mut index, cuboid_region(BlockPos::new(10, 0, 0), BlockPos::new(11, 1, 1), 0.0));
        let near = place(&mut store, &mut index, cuboid_region(BlockPos::new(5, 0, 0), BlockPos::new(6, 1, 1), 0.0));
        let mut cur = index.cursor_at(CellCoord::new(0, 0));
        let seg = Segment::new(Vec3::new(0.0, 0.5, 0.5), Vec3::new(15.0, 0.5, 0.5));
        assert_eq!(cur.advance_to(&index, &store, seg, GroupId(0)).unwrap().region, near);
    }

    #[test]
    fn zero_length_segment_is_containment() {
        let (mut store, mut index) = (RegionStore::new(), SpatialIndex::new());
        let id = place(&mut store, &mut index, cuboid_region(BlockPos::new(0, 0, 0), BlockPos::new(3, 3, 3), 0.0));
        let mut cur = index.cursor_at(CellCoord::new(0, 0));
        let p = Vec3::new(1.5, 1.5, 1.5);
        let hit = cur.advance_to(&index, &store, Segment::new(p, p), GroupId(0)).unwrap();
        assert_eq!((hit.region, hit.distance), (id, 0.0));

        let outside = Vec3::new(5.5, 1.5, 1.5);
        assert!(cur.advance_to(&index, &store, Segment::new(outside, outside), GroupId(0)).is_none());
    }

    #[test]
    fn multi_cell_segment_sees_region_in_far_cell() {
        let (mut store, mut index) = (RegionStore::new(), SpatialIndex::new());
        let id = place(&mut store, &mut index, cuboid_region(BlockPos::new(20, 0, 20), BlockPos::new(21, 1, 21), 0.0));
        let mut cur = index.cursor_at(CellCoord::new(0, 0));
        let seg = Segment::new(Vec3::new(10.0, 0.5, 10.0), Vec3::new(25.0, 0.5, 25.0));
        let hit = cur.advance_to(&index, &store, seg, GroupId(0)).unwrap();
        assert_eq!(hit.region, id);
        assert_eq!(cur.cell(), CellCoord::new(1, 1));
    }

    #[test]
    fn own_path_is_hit_without_spacing() {
        let (mut store, mut index) = (RegionStore::new(), SpatialIndex::new());
        let cells: Vec<_> = (3..8).map(|x| BlockPos::new(x, 0, 0)).collect();
        let path = place(&mut store, &mut index, path_region(GroupId(1), &cells));
        let beyond = place(&mut store, &mut index, cuboid_region(BlockPos::new(10, 0, 0), BlockPos::new(11, 1, 1), 0.0));

        let seg = Segment::new(Vec3::new(0.0, 0.5, 0.5), Vec3::new(14.0, 0.5, 0.5));
        let mut cur = index.cursor_at(CellCoord::new(0, 0));
        let own = cur.advance_to(&index, &store, seg, GroupId(1)).unwrap();
        assert_eq!(own.region, path);
        assert!((own.stop_distance - 3.0).abs() < 1e-12);
        let next = cur.advance_past(&index, &store, seg, GroupId(1), &[path]).unwrap();
        assert_eq!(next.region, beyond);

        let hit = cur.advance_to(&index, &store, seg, GroupId(2)).unwrap();
        assert_eq!(hit.region, path);
        assert!((hit.distance - 3.0).abs() < 1e-12);
        assert!((hit.stop_distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn stale_cache_is_refreshed() {
        let (mut store, mut index) = (RegionStore::new(), SpatialIndex::new());
        let mut cur = index.cursor_at(CellCoord::new(0, 0));
        let seg = Segment::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(9.5, 0.5, 0.5));
        assert!(cur.advance_to(&index, &store, seg, GroupId(0)).is_none());
        assert!(!cur.is_near(&index));

        let id = place(&mut store, &mut index, cuboid_region(BlockPos::new(4, 0, 0), BlockPos::new(4, 1, 1), 0.0));
        assert_eq!(cur.advance_to(&index, &store, seg, GroupId(0)).unwrap().region, id);
        assert!(cur.is_near(&index));

        index.remove(id);
        store.remove(id);
        assert!(cur.advance_to(&index, &store, seg, GroupId(0)).is_none());
    }

    #[test]
    fn is_near_checks_neighbours() {
        let (mut store, mut index) = (RegionStore::new(), SpatialIndex::new());
        place(&mut store, &mut index, cuboid_region(BlockPos::new(17, 0, 17), BlockPos::new(17, 0, 17), 0.0));
        assert!(index.cursor_at(CellCoord::new(0, 0)).is_near(&index));
        assert!(!index.cursor_at(CellCoord::new(-1, -1)).is_near(&index));
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use mz_core::{BlockPos, GroupId, Vec3};
    use proptest::prelude::*;

    use super::helpers::{cuboid_region, place};
    use crate::{Aabb, PathCells, RegionStore, SpatialIndex};

    fn arb_box() -> impl Strategy<Value = Aabb> {
        (-50.0..50.0f64, -50.0..50.0f64, -50.0..50.0f64, 0.5..20.0f64, 0.5..20.0f64, 0.5..20.0f64)
            .prop_map(|(x, y, z, w, h, d)| Aabb::new(Vec3::new(x, y, z), Vec3::new(x + w, y + h, z + d)))
    }

    fn arb_dir() -> impl Strategy<Value = Vec3> {
        (-1.0..1.0f64, -1.0..1.0f64, -1.0..1.0f64)
            .prop_filter_map("non-zero direction", |(x, y, z)| Vec3::new(x, y, z).normalized())
    }

    fn arb_block() -> impl Strategy<Value = BlockPos> {
        (-100i32..100, -5i32..5, -100i32..100).prop_map(|(x, y, z)| BlockPos::new(x, y, z))
    }

    proptest! {
        #[test]
        fn inside_origin_hits_zero(b in arb_box(), fx in 0.01..0.99f64, fy in 0.01..0.99f64, fz in 0.01..0.99f64, dir in arb_dir()) {
            let o = Vec3::new(
                b.min.x + (b.max.x - b.min.x) * fx,
                b.min.y + (b.max.y - b.min.y) * fy,
                b.min.z + (b.max.z - b.min.z) * fz,
            );
            prop_assert_eq!(b.hit_test(o, dir), Some(0.0));
        }

        #[test]
        fn ray_moving_away_never_hits(b in arb_box(), gap in 0.1..30.0f64, dir in arb_dir()) {
            // Origin left of the box, ray not moving right on x.
            let dir = Vec3::new(-dir.x.abs(), dir.y, dir.z);
            let o = Vec3::new(b.min.x - gap, (b.min.y + b.max.y) * 0.5, (b.min.z + b.max.z) * 0.5);
            prop_assert_eq!(b.hit_test(o, dir), None);
        }

        #[test]
        fn hit_point_lies_on_box(b in arb_box(), ox in -100.0..100.0f64, oy in -100.0..100.0f64, oz in -100.0..100.0f64, dir in arb_dir()) {
            let o = Vec3::new(ox, oy, oz);
            if let Some(t) = b.hit_test(o, dir) {
                prop_assert!(t >= 0.0);
                let p = o + dir * t;
                let grown = Aabb::new(b.min - Vec3::new(1e-6, 1e-6, 1e-6), b.max + Vec3::new(1e-6, 1e-6, 1e-6));
                prop_assert!(grown.contains(p));
            }
        }

        #[test]
        fn indexed_everywhere_then_nowhere(a in arb_block(), b in arb_block()) {
            let (mut store, mut index) = (RegionStore::new(), SpatialIndex::new());
            let id = place(&mut store, &mut index, cuboid_region(a, b, 0.0));
            let covered = store.get(id).unwrap().geometry.covered_cells();
            for cell in covered.iter() {
                prop_assert!(index.regions_near(cell, 0).contains(&id));
            }
            index.remove(id);
            for cell in covered.iter() {
                prop_assert!(index.regions_near(cell, 1).is_empty());
            }
        }

        #[test]
        fn double_extend_adds_one(start in arb_block(), next in arb_block()) {
            prop_assume!(start != next);
            let mut p = PathCells::new(GroupId(0), start, 64.0);
            let before = p.len();
            p.extend(next);
            p.extend(next);
            prop_assert_eq!(p.len(), before + 1);
        }
    }
}
