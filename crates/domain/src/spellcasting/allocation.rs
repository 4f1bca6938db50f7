//! Slot counts produced by a table lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Spell slot level mapped to the number of slots available at that level.
///
/// Always rebuilt from scratch by a calculation; callers only read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotAllocation(BTreeMap<u8, u32>);

impl SlotAllocation {
    /// Create an empty allocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots at the given spell level, 0 if none.
    pub fn get(&self, level: u8) -> u32 {
        self.0.get(&level).copied().unwrap_or(0)
    }

    /// Whether the allocation has an entry for the level, even a zero one.
    pub fn contains(&self, level: u8) -> bool {
        self.0.contains_key(&level)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The lowest-level entry. Single-bucket tables produce at most one.
    pub fn first(&self) -> Option<(u8, u32)> {
        self.0.iter().next().map(|(level, slots)| (*level, *slots))
    }

    /// Iterate `(slot level, count)` pairs in ascending level order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.0.iter().map(|(level, slots)| (*level, *slots))
    }

    pub(crate) fn insert(&mut self, level: u8, slots: u32) {
        self.0.insert(level, slots);
    }

    pub(crate) fn add(&mut self, level: u8, slots: u32) {
        let entry = self.0.entry(level).or_insert(0);
        *entry = entry.saturating_add(slots);
    }
}

impl FromIterator<(u8, u32)> for SlotAllocation {
    fn from_iter<T: IntoIterator<Item = (u8, u32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
