//! The authoritative URL set of one run.

use std::collections::btree_map::{self, BTreeMap};

use sitemapper_core::{GroupKey, UrlEntry};

/// What an [`UrlSet::upsert`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
    Unchanged,
}

/// Working records keyed by location. At most one record per `loc`;
/// iteration is in location order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlSet {
    entries: BTreeMap<String, UrlEntry>,
}

impl UrlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record at `entry.url.loc`. The incoming record
    /// always wins.
    pub fn upsert(&mut self, entry: UrlEntry) -> Upsert {
        match self.entries.entry(entry.url.loc.clone()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                Upsert::Inserted
            }
            btree_map::Entry::Occupied(mut slot) => {
                if slot.get() == &entry {
                    Upsert::Unchanged
                } else {
                    slot.insert(entry);
                    Upsert::Updated
                }
            }
        }
    }

    pub fn remove(&mut self, loc: &str) -> Option<UrlEntry> {
        self.entries.remove(loc)
    }

    pub fn get(&self, loc: &str) -> Option<&UrlEntry> {
        self.entries.get(loc)
    }

    pub fn contains(&self, loc: &str) -> bool {
        self.entries.contains_key(loc)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UrlEntry> {
        self.entries.values()
    }

    /// Locations currently assigned to `group`.
    pub fn locations_in(&self, group: &GroupKey) -> Vec<String> {
        self.entries
            .values()
            .filter(|e| &e.group == group)
            .map(|e| e.url.loc.clone())
            .collect()
    }

    /// Records partitioned by group, groups and records in sorted order.
    pub fn partition(&self) -> BTreeMap<&GroupKey, Vec<&UrlEntry>> {
        let mut groups: BTreeMap<&GroupKey, Vec<&UrlEntry>> = BTreeMap::new();
        for entry in self.entries.values() {
            groups.entry(&entry.group).or_default().push(entry);
        }
        groups
    }
}
