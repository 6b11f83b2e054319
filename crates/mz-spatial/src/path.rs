//! Growing path geometry: an ordered, duplicate-free trail of unit cells
//! grown for one agent group.
//!
//! Besides the cells themselves, `PathCells` tracks two envelopes that are
//! updated incrementally on every extension:
//!
//! * the block envelope (`min`/`max`), used by `is_nearby`;
//! * the index-cell envelope, used to decide whether the spatial index must
//!   learn about new cells.  Most extensions stay inside the current cell
//!   envelope and need no index work at all.

use indexmap::IndexSet;

use mz_core::{BlockPos, CellCoord, GroupId, Vec3};

use crate::geometry::{Aabb, CellRange};

/// Result of [`PathCells::extend`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExtendOutcome {
    /// The cell was appended.  `cells_changed` is true when the index-cell
    /// envelope grew and the index must register the new cells.
    Added { cells_changed: bool },
    /// The cell was already part of the path; nothing changed.
    AlreadyPresent,
    /// The length budget is used up.  The caller must stop growing.
    Saturated,
}

#[derive(Clone, Debug)]
pub struct PathCells {
    cells: IndexSet<BlockPos>,
    owner: GroupId,
    max_distance: f64,
    min: BlockPos,
    max: BlockPos,
    min_cell: CellCoord,
    max_cell: CellCoord,
}

impl PathCells {
    /// A new path holding only `initial`.
    pub fn new(owner: GroupId, initial: BlockPos, max_distance: f64) -> Self {
        let mut cells = IndexSet::with_capacity(32);
        cells.insert(initial);
        Self {
            cells,
            owner,
            max_distance,
            min: initial,
            max: initial,
            min_cell: initial.cell(),
            max_cell: initial.cell(),
        }
    }

    /// The group this path is grown for.  It is never blocked by it.
    #[inline]
    pub fn owner(&self) -> GroupId {
        self.owner
    }

    #[inline]
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether one more cell would exceed the length budget.
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.cells.len() as f64 >= self.max_distance
    }

    /// Cells in insertion order.
    pub fn cells(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.cells.iter().copied()
    }

    /// Inclusive block envelope `(min, max)`.
    #[inline]
    pub fn envelope(&self) -> (BlockPos, BlockPos) {
        (self.min, self.max)
    }

    pub fn covered_cells(&self) -> CellRange {
        CellRange::new(self.min_cell, self.max_cell)
    }

    /// Append `block`.  Idempotent for cells already on the path; refused
    /// once the budget is exhausted.
    pub fn extend(&mut self, block: BlockPos) -> ExtendOutcome {
        if self.cells.contains(&block) {
            return ExtendOutcome::AlreadyPresent;
        }
        if self.is_saturated() {
            return ExtendOutcome::Saturated;
        }
        self.cells.insert(block);
        self.min = self.min.min(block);
        self.max = self.max.max(block);

        let c = block.cell();
        let before = (self.min_cell, self.max_cell);
        self.min_cell = CellCoord::new(self.min_cell.x.min(c.x), self.min_cell.z.min(c.z));
        self.max_cell = CellCoord::new(self.max_cell.x.max(c.x), self.max_cell.z.max(c.z));
        ExtendOutcome::Added { cells_changed: before != (self.min_cell, self.max_cell) }
    }

    #[inline]
    pub fn contains_block(&self, block: BlockPos) -> bool {
        self.cells.contains(&block)
    }

    /// Point containment, closed on every cell face.
    pub fn contains(&self, p: Vec3) -> bool {
        let b = BlockPos::containing(p);
        if self.contains_block(b) {
            return true;
        }
        // A point on a lower face also touches the neighbouring cell.
        let on_x = p.x == b.x as f64;
        let on_y = p.y == b.y as f64;
        let on_z = p.z == b.z as f64;
        if !(on_x || on_y || on_z) {
            return false;
        }
        let mut found = false;
        for dx in if on_x { -1..=0 } else { 0..=0 } {
            for dy in if on_y { -1..=0 } else { 0..=0 } {
                for dz in if on_z { -1..=0 } else { 0..=0 } {
                    found |= self.contains_block(b.offset(dx, dy, dz));
                }
            }
        }
        found
    }

    /// Block-envelope proximity test, `radius` in blocks.
    pub fn is_nearby(&self, block: BlockPos, radius: i32) -> bool {
        block.x >= self.min.x - radius
            && block.y >= self.min.y - radius
            && block.z >= self.min.z - radius
            && block.x <= self.max.x + radius
            && block.y <= self.max.y + radius
            && block.z <= self.max.z + radius
    }

    /// Nearest entry over every constituent cell.  Linear in path length;
    /// the index is expected to have filtered candidates first.
    pub fn hit_test(&self, origin: Vec3, dir: Vec3) -> Option<f64> {
        let mut best: Option<f64> = None;
        for &cell in &self.cells {
            if let Some(t) = Aabb::unit(cell).hit_test(origin, dir) {
                if t == 0.0 {
                    return Some(0.0);
                }
                if best.is_none_or(|b| t < b) {
                    best = Some(t);
                }
            }
        }
        best
    }
}
