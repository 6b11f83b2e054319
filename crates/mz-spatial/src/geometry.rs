//! Axis-aligned boxes and cell ranges.
//!
//! # Hit-testing
//!
//! `Aabb::hit_test` answers "how far along this ray does it first enter the
//! box?".  It tests the ray against all six face planes, keeps entry points
//! that land on the face (within [`HIT_TOLERANCE`]) and returns the smallest
//! non-negative parameter.  The direction must be a unit vector so the
//! parameter is a distance.
//!
//! ```text
//!   origin ●──────────────▶ dir
//!                 ┌───────┐
//!                 │  box  │      t = distance to the near face
//!                 └───────┘
//! ```

use mz_core::{BlockPos, CellCoord, Vec3};

/// Slack allowed when checking an entry point against a face's bounds.
pub const HIT_TOLERANCE: f64 = 1e-9;

// ── Aabb ─────────────────────────────────────────────────────────────────────

/// Closed axis-aligned box `[min, max]`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box spanning two opposite corners in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    /// The unit box occupied by one block.
    #[inline]
    pub fn unit(block: BlockPos) -> Self {
        let min = block.min_corner();
        Self { min, max: min + Vec3::new(1.0, 1.0, 1.0) }
    }

    /// Box covering every block between two inclusive block corners.
    pub fn from_blocks(a: BlockPos, b: BlockPos) -> Self {
        let lo = a.min(b);
        let hi = a.max(b);
        Self {
            min: lo.min_corner(),
            max: hi.min_corner() + Vec3::new(1.0, 1.0, 1.0),
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.y >= self.min.y
            && p.z >= self.min.z
            && p.x <= self.max.x
            && p.y <= self.max.y
            && p.z <= self.max.z
    }

    /// Distance along `dir` (a unit vector) from `origin` to the first point
    /// of the box, `Some(0.0)` if `origin` is already inside, `None` if the
    /// ray never reaches it.
    pub fn hit_test(&self, origin: Vec3, dir: Vec3) -> Option<f64> {
        if self.contains(origin) {
            return Some(0.0);
        }

        let o = [origin.x, origin.y, origin.z];
        let d = [dir.x, dir.y, dir.z];
        let lo = [self.min.x, self.min.y, self.min.z];
        let hi = [self.max.x, self.max.y, self.max.z];

        let mut best: Option<f64> = None;
        for axis in 0..3 {
            if d[axis] == 0.0 {
                continue;
            }
            for plane in [lo[axis], hi[axis]] {
                let t = (plane - o[axis]) / d[axis];
                if t < 0.0 || best.is_some_and(|b| t >= b) {
                    continue;
                }
                let on_face = (0..3).filter(|&a| a != axis).all(|a| {
                    let v = o[a] + d[a] * t;
                    v >= lo[a] - HIT_TOLERANCE && v <= hi[a] + HIT_TOLERANCE
                });
                if on_face {
                    best = Some(t);
                }
            }
        }
        best
    }
}

// ── CellRange ────────────────────────────────────────────────────────────────

/// Inclusive rectangle of index cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub min: CellCoord,
    pub max: CellCoord,
}

impl CellRange {
    pub fn new(a: CellCoord, b: CellCoord) -> Self {
        Self {
            min: CellCoord::new(a.x.min(b.x), a.z.min(b.z)),
            max: CellCoord::new(a.x.max(b.x), a.z.max(b.z)),
        }
    }

    /// Cells touched by the horizontal footprint of two block corners.
    pub fn of_blocks(a: BlockPos, b: BlockPos) -> Self {
        Self::new(a.cell(), b.cell())
    }

    /// Cells within `radius` blocks of `block`, horizontally.
    pub fn around_block(block: BlockPos, radius: i32) -> Self {
        Self::of_blocks(block.offset(-radius, 0, -radius), block.offset(radius, 0, radius))
    }

    #[inline]
    pub fn contains(&self, c: CellCoord) -> bool {
        c.x >= self.min.x && c.x <= self.max.x && c.z >= self.min.z && c.z <= self.max.z
    }

    pub fn len(&self) -> usize {
        ((self.max.x - self.min.x + 1) as usize) * ((self.max.z - self.min.z + 1) as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major iteration, z outer, x inner.
    pub fn iter(self) -> impl Iterator<Item = CellCoord> {
        (self.min.z..=self.max.z)
            .flat_map(move |z| (self.min.x..=self.max.x).map(move |x| CellCoord::new(x, z)))
    }
}
