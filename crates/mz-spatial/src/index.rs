//! Per-world spatial index: index cell → regions overlapping it.
//!
//! # Invariants
//!
//! * A region is listed under every cell in its geometry's `covered_cells`.
//! * `registered[id]` is exactly the set of cells the region is listed under,
//!   so `remove` drops precisely those, no more and no fewer.
//! * Growing path regions only ever gain cells (`grow`).
//!
//! Every mutation bumps `generation`; cursors compare it against the value
//! they cached to know their cell lists are stale.

use rustc_hash::FxHashMap;
use tracing::trace;

use mz_core::{BlockPos, CellCoord, RegionId};

use crate::cursor::IndexCursor;
use crate::geometry::CellRange;
use crate::region::RegionGeometry;
use crate::store::RegionStore;

#[derive(Default)]
pub struct SpatialIndex {
    by_cell: FxHashMap<CellCoord, Vec<RegionId>>,
    registered: FxHashMap<RegionId, Vec<CellCoord>>,
    generation: u64,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of regions currently registered.
    pub fn region_count(&self) -> usize {
        self.registered.len()
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.by_cell.len()
    }

    #[inline]
    pub fn is_registered(&self, id: RegionId) -> bool {
        self.registered.contains_key(&id)
    }

    /// Cells `id` is registered under, in registration order.
    pub fn cells_of(&self, id: RegionId) -> &[CellCoord] {
        self.registered.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Register `id` under every cell its geometry covers.  Calling this for
    /// an already registered region behaves like [`grow`](Self::grow).
    pub fn add(&mut self, id: RegionId, geometry: &RegionGeometry) {
        if self.is_registered(id) {
            self.grow(id, geometry);
            return;
        }
        let range = geometry.covered_cells();
        let mut cells = Vec::with_capacity(range.len());
        for cell in range.iter() {
            self.by_cell.entry(cell).or_default().push(id);
            cells.push(cell);
        }
        trace!(region = %id, cells = cells.len(), "index add");
        self.registered.insert(id, cells);
        self.generation += 1;
    }

    /// Register `id` under cells its geometry now covers but that it is not
    /// yet listed under.  Returns how many cells were added.
    pub fn grow(&mut self, id: RegionId, geometry: &RegionGeometry) -> usize {
        let Some(known) = self.registered.get_mut(&id) else {
            self.add(id, geometry);
            return self.cells_of(id).len();
        };
        let mut added = 0;
        for cell in geometry.covered_cells().iter() {
            if known.contains(&cell) {
                continue;
            }
            let list = self.by_cell.entry(cell).or_default();
            if !list.contains(&id) {
                list.push(id);
            }
            known.push(cell);
            added += 1;
        }
        if added > 0 {
            trace!(region = %id, added, "index grow");
            self.generation += 1;
        }
        added
    }

    /// Drop `id` from exactly the cells it was registered under.  Absent ids
    /// are a no-op; returns whether anything was removed.
    pub fn remove(&mut self, id: RegionId) -> bool {
        let Some(cells) = self.registered.remove(&id) else {
            return false;
        };
        for cell in &cells {
            if let Some(list) = self.by_cell.get_mut(cell) {
                list.retain(|r| *r != id);
                if list.is_empty() {
                    self.by_cell.remove(cell);
                }
            }
        }
        trace!(region = %id, cells = cells.len(), "index remove");
        self.generation += 1;
        true
    }

    pub fn clear(&mut self) {
        self.by_cell.clear();
        self.registered.clear();
        self.generation += 1;
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Regions listed under one cell.  Empty slice for an empty cell.
    #[inline]
    pub fn regions_in_cell(&self, cell: CellCoord) -> &[RegionId] {
        self.by_cell.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Regions listed under any cell within `radius` cells of `cell`,
    /// deduplicated and in ascending id order.
    pub fn regions_near(&self, cell: CellCoord, radius: i32) -> Vec<RegionId> {
        let r = radius.max(0);
        let range = CellRange::new(
            CellCoord::new(cell.x - r, cell.z - r),
            CellCoord::new(cell.x + r, cell.z + r),
        );
        let mut out: Vec<RegionId> =
            range.iter().flat_map(|c| self.regions_in_cell(c).iter().copied()).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Regions whose block envelope lies within `radius` blocks of `block`,
    /// deduplicated and in ascending id order.
    pub fn find_nearby(&self, block: BlockPos, radius: i32, store: &RegionStore) -> Vec<RegionId> {
        let mut out: Vec<RegionId> = CellRange::around_block(block, radius)
            .iter()
            .flat_map(|c| self.regions_in_cell(c).iter().copied())
            .filter(|id| store.get(*id).is_some_and(|r| r.geometry.is_nearby(block, radius)))
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Cheap pre-check: is any region within `radius` blocks of `block`?
    pub fn is_region_nearby(&self, block: BlockPos, radius: i32, store: &RegionStore) -> bool {
        CellRange::around_block(block, radius).iter().any(|c| {
            self.regions_in_cell(c)
                .iter()
                .any(|id| store.get(*id).is_some_and(|r| r.geometry.is_nearby(block, radius)))
        })
    }

    /// First region (in cell-list order) containing `block`.
    pub fn find_containing(&self, block: BlockPos, store: &RegionStore) -> Option<RegionId> {
        self.regions_in_cell(block.cell())
            .iter()
            .copied()
            .find(|id| store.get(*id).is_some_and(|r| r.geometry.contains_block(block)))
    }

    /// A cursor parked on `cell`, primed with that cell's regions.
    pub fn cursor_at(&self, cell: CellCoord) -> IndexCursor {
        IndexCursor::new(self, cell)
    }
}
