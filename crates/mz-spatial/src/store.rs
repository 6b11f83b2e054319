//! Region arena.
//!
//! `RegionId`s are indices into a `Vec<Option<Region>>`.  Freed indices are
//! recycled, so an ID only identifies a region while it is alive.

use mz_core::RegionId;

use crate::region::Region;

#[derive(Default)]
pub struct RegionStore {
    entries: Vec<Option<Region>>,
    free: Vec<RegionId>,
    live: usize,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, region: Region) -> RegionId {
        self.live += 1;
        if let Some(id) = self.free.pop() {
            self.entries[id.index()] = Some(region);
            return id;
        }
        let id = RegionId(self.entries.len() as u32);
        self.entries.push(Some(region));
        id
    }

    pub fn remove(&mut self, id: RegionId) -> Option<Region> {
        let removed = self.entries.get_mut(id.index())?.take()?;
        self.free.push(id);
        self.live -= 1;
        Some(removed)
    }

    #[inline]
    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.entries.get(id.index())?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.entries.get_mut(id.index())?.as_mut()
    }

    #[inline]
    pub fn contains(&self, id: RegionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live regions in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &Region)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().map(|r| (RegionId(i as u32), r)))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.free.clear();
        self.live = 0;
    }
}
