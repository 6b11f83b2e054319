/// Lifecycle state of an agent group as seen by the lock layer.
///
/// `Unloaded` groups are frozen in time: they keep every slot and path they
/// hold and their expiry counters stop advancing.  `Removed` groups lose
/// everything on the next sweep.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupStatus {
    #[default]
    Active,
    Unloaded,
    Removed,
}

impl GroupStatus {
    #[inline]
    pub fn is_active(self) -> bool {
        self == GroupStatus::Active
    }

    #[inline]
    pub fn is_removed(self) -> bool {
        self == GroupStatus::Removed
    }
}
