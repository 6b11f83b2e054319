//! Typed identifiers for groups, regions, slots and worlds.
//!
//! IDs are `Copy + Ord + Hash`.  Ordering matters here: the tick loop visits
//! groups in ascending `GroupId`, and that order decides which of two
//! simultaneous contenders wins a free slot.  Region and slot IDs are arena
//! indices and may be reused after removal, so they are only meaningful
//! within the world that issued them.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID": the inner type's `MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of an agent group (a train, a convoy) in SoA storage.
    pub struct GroupId(u32);
}

typed_id! {
    /// Arena index of a region inside one world's `RegionStore`.
    pub struct RegionId(u32);
}

typed_id! {
    /// Index of an exclusion slot inside one world's `SlotRegistry`.
    pub struct SlotId(u32);
}

typed_id! {
    /// Identifies one independent world (own index, own slots).
    /// `u16` keeps per-world keys compact; worlds are few.
    pub struct WorldId(u16);
}
