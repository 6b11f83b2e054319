//! Path-following cursor and conflict predictor.
//!
//! A group moving along track queries the index once per tick with a short
//! travel segment that almost always starts and ends in the cell it queried
//! last tick.  `IndexCursor` remembers that cell and its region list so the
//! common case costs no hash lookup.  The cache is revalidated against the
//! index generation, so a stale cursor is slower, never wrong.
//!
//! # Multi-cell segments
//!
//! When a segment crosses cells, every cell in the rectangle spanned by the
//! start and end cells is visited.  That is a superset of the cells on the
//! straight line, which is harmless: regions are deduplicated and each
//! candidate is hit-tested once against the full segment.

use mz_core::{BlockPos, CellCoord, GroupId, RegionId, Vec3};

use crate::geometry::CellRange;
use crate::index::SpatialIndex;
use crate::store::RegionStore;

/// One tick of intended travel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
}

impl Segment {
    pub const fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Unit direction, `None` when the segment has (near) zero length.
    #[inline]
    pub fn direction(&self) -> Option<Vec3> {
        (self.end - self.start).normalized()
    }

    /// Point `distance` along the segment from its start.
    pub fn point_at(&self, distance: f64) -> Vec3 {
        match self.direction() {
            Some(dir) => self.start + dir * distance,
            None => self.start,
        }
    }
}

/// Nearest region crossed by a segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConflictHit {
    pub region: RegionId,
    /// Distance from the segment start to the region boundary.
    pub distance: f64,
    /// Where the group must stop if denied: `distance` minus the region's
    /// spacing for this group, never negative.
    pub stop_distance: f64,
    pub entry_point: Vec3,
    /// Unit cell just inside the region at the entry point.
    pub entry_block: BlockPos,
}

#[derive(Clone, Debug)]
pub struct IndexCursor {
    cell: CellCoord,
    cached: Vec<RegionId>,
    generation: u64,
}

impl IndexCursor {
    pub fn new(index: &SpatialIndex, cell: CellCoord) -> Self {
        Self {
            cell,
            cached: index.regions_in_cell(cell).to_vec(),
            generation: index.generation(),
        }
    }

    /// Cell the cursor is currently parked on.
    #[inline]
    pub fn cell(&self) -> CellCoord {
        self.cell
    }

    fn regions_at(&mut self, index: &SpatialIndex, cell: CellCoord) -> &[RegionId] {
        if cell != self.cell || self.generation != index.generation() {
            self.cell = cell;
            self.generation = index.generation();
            self.cached.clear();
            self.cached.extend_from_slice(index.regions_in_cell(cell));
        }
        &self.cached
    }

    /// Find the nearest region `group` would enter while travelling along
    /// `segment`.
    ///
    /// Only hits strictly closer than the segment length count.  A
    /// zero-length segment degrades to a containment check at its start.
    /// A group's own growing path is reported like any other region, with
    /// zero spacing, so the owner keeps holding it while travelling along it.
    pub fn advance_to(
        &mut self,
        index: &SpatialIndex,
        store: &RegionStore,
        segment: Segment,
        group: GroupId,
    ) -> Option<ConflictHit> {
        self.advance_past(index, store, segment, group, &[])
    }

    /// Like [`advance_to`](Self::advance_to), ignoring the regions in
    /// `skip`.  Lets a caller that was admitted to the nearest region look
    /// for the next one along the same segment.
    pub fn advance_past(
        &mut self,
        index: &SpatialIndex,
        store: &RegionStore,
        segment: Segment,
        group: GroupId,
        skip: &[RegionId],
    ) -> Option<ConflictHit> {
        let c1 = CellCoord::of_point(segment.start);
        let c2 = CellCoord::of_point(segment.end);

        let mut candidates: Vec<RegionId> = Vec::new();
        if c1 == c2 {
            candidates.extend_from_slice(self.regions_at(index, c1));
        } else {
            for cell in CellRange::new(c1, c2).iter() {
                for &id in self.regions_at(index, cell) {
                    if !candidates.contains(&id) {
                        candidates.push(id);
                    }
                }
            }
            // Park on the end cell: next tick's segment starts there.
            self.regions_at(index, c2);
        }
        if candidates.is_empty() {
            return None;
        }

        candidates.retain(|id| !skip.contains(id));

        let Some(dir) = segment.direction() else {
            let block = BlockPos::containing(segment.start);
            return candidates
                .into_iter()
                .find(|id| store.get(*id).is_some_and(|r| r.geometry.contains_block(block)))
                .map(|region| ConflictHit {
                    region,
                    distance: 0.0,
                    stop_distance: 0.0,
                    entry_point: segment.start,
                    entry_block: block,
                });
        };

        let mut best: Option<(RegionId, f64)> = None;
        let mut best_distance = segment.length();
        for id in candidates {
            let Some(region) = store.get(id) else { continue };
            if let Some(t) = region.geometry.hit_test(segment.start, dir) {
                if t < best_distance {
                    best_distance = t;
                    best = Some((id, t));
                }
            }
        }

        let (region_id, distance) = best?;
        let region = store.get(region_id)?;
        let entry_point = segment.start + dir * distance;
        // Nudge inward so a hit on a lower face resolves to the cell beyond it.
        let entry_block = BlockPos::containing(entry_point + dir * 1e-6);
        Some(ConflictHit {
            region: region_id,
            distance,
            stop_distance: (distance - region.spacing_for(group)).max(0.0),
            entry_point,
            entry_block,
        })
    }

    /// Whether any region is registered in the parked cell or one of its
    /// eight neighbours.
    pub fn is_near(&mut self, index: &SpatialIndex) -> bool {
        let cell = self.cell;
        if !self.regions_at(index, cell).is_empty() {
            return true;
        }
        (-1..=1)
            .flat_map(|dz| (-1..=1).map(move |dx| (dx, dz)))
            .filter(|&(dx, dz)| dx != 0 || dz != 0)
            .any(|(dx, dz)| !index.regions_in_cell(CellCoord::new(cell.x + dx, cell.z + dz)).is_empty())
    }
}
