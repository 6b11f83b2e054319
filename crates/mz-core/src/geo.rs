//! Continuous positions, unit blocks and index cells.
//!
//! Three coordinate spaces are in play:
//!
//! | Type        | Space                        | Used for                        |
//! |-------------|------------------------------|---------------------------------|
//! | `Vec3`      | continuous, `f64`            | agent positions, travel rays    |
//! | `BlockPos`  | integer unit cells           | path cells, occupancy, markers  |
//! | `CellCoord` | 16×16 horizontal partitions  | spatial index buckets only      |
//!
//! A `CellCoord` is never an identity: it is only ever used as a bucket key.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// log2 of the horizontal index cell edge length (16 blocks).
pub const CELL_SHIFT: i32 = 4;

// ── Vec3 ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    /// Segments shorter than this are treated as "not moving".
    pub const EPSILON_LENGTH: f64 = 1e-10;

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn distance(self, other: Vec3) -> f64 {
        (other - self).length()
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    pub fn normalized(self) -> Option<Vec3> {
        let len = self.length();
        if len <= Self::EPSILON_LENGTH {
            None
        } else {
            Some(self * (1.0 / len))
        }
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

// ── BlockPos ─────────────────────────────────────────────────────────────────

/// Integer unit cell.  The block at `(x, y, z)` spans `[x, x+1)` on each axis.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The block a continuous point falls in.
    #[inline]
    pub fn containing(p: Vec3) -> Self {
        Self::new(p.x.floor() as i32, p.y.floor() as i32, p.z.floor() as i32)
    }

    /// The index cell this block belongs to.
    #[inline]
    pub fn cell(self) -> CellCoord {
        CellCoord::of_block(self)
    }

    /// Lowest corner of the block as a continuous point.
    #[inline]
    pub fn min_corner(self) -> Vec3 {
        Vec3::new(self.x as f64, self.y as f64, self.z as f64)
    }

    #[inline]
    pub fn center(self) -> Vec3 {
        self.min_corner() + Vec3::new(0.5, 0.5, 0.5)
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: BlockPos) -> BlockPos {
        BlockPos::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: BlockPos) -> BlockPos {
        BlockPos::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

// ── CellCoord ────────────────────────────────────────────────────────────────

/// Horizontal index partition: `(block.x >> 4, block.z >> 4)`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    pub x: i32,
    pub z: i32,
}

impl CellCoord {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    #[inline]
    pub fn of_block(b: BlockPos) -> Self {
        Self::new(b.x >> CELL_SHIFT, b.z >> CELL_SHIFT)
    }

    #[inline]
    pub fn of_point(p: Vec3) -> Self {
        Self::of_block(BlockPos::containing(p))
    }

    /// Chebyshev distance in cells, ignoring height.
    #[inline]
    pub fn chebyshev(self, other: CellCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}>", self.x, self.z)
    }
}

// ── Facing ───────────────────────────────────────────────────────────────────

/// Which side of a configuration marker a region was declared on.  Two
/// regions can share one marker position as long as they face differently.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Facing {
    #[default]
    Front,
    Back,
}

impl Facing {
    pub fn as_str(self) -> &'static str {
        match self {
            Facing::Front => "front",
            Facing::Back => "back",
        }
    }
}

impl std::str::FromStr for Facing {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" | "f" | "" => Ok(Facing::Front),
            "back" | "b" => Ok(Facing::Back),
            other => Err(crate::CoreError::Parse(format!("unknown facing '{other}'"))),
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
