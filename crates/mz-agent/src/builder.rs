//! Fluent builder for constructing a `GroupStore` in one step.
//!
//! # Usage
//!
//! ```rust
//! use mz_agent::{GroupLookup, GroupStoreBuilder};
//!
//! let store = GroupStoreBuilder::new()
//!     .group("express")
//!     .group_with_tags("freight", ["cargo", "slow"])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(store.count, 2);
//! assert_eq!(store.tags(store.find_by_name("freight").unwrap()).len(), 2);
//! ```

use crate::{AgentResult, GroupStore};

/// Fluent builder for [`GroupStore`].
///
/// Groups receive `GroupId`s in declaration order, which is also the order
/// the tick loop processes them in.
#[derive(Default)]
pub struct GroupStoreBuilder {
    groups: Vec<(String, Vec<String>)>,
}

impl GroupStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(self, name: impl Into<String>) -> Self {
        self.group_with_tags(name, std::iter::empty::<String>())
    }

    pub fn group_with_tags<I, S>(mut self, name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.push((name.into(), tags.into_iter().map(Into::into).collect()));
        self
    }

    /// Construct the store.  Fails on a duplicate group name.
    pub fn build(self) -> AgentResult<GroupStore> {
        let mut store = GroupStore::new();
        for (name, tags) in self.groups {
            store.spawn(name, tags)?;
        }
        Ok(store)
    }
}
