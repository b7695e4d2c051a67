//! Relationship store
//!
//! Process-lifetime registry of the slaves each master has seen. Slaves
//! register themselves during their base-data pass, so the store is rebuilt
//! lazily and may be empty at any time. It is a cache, never a source of
//! truth: readers always re-resolve and re-validate what they find here.

use std::collections::HashMap;

use share_model::{ActorId, ActorIdentity};

#[derive(Debug, Clone, Default)]
pub struct RelationshipStore {
    entries: HashMap<ActorId, Vec<ActorIdentity>>,
}

impl RelationshipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slave under a master
    ///
    /// Returns `false` when the slave was already registered there.
    pub fn register(&mut self, master: &ActorId, slave: ActorIdentity) -> bool {
        let slaves = self.entries.entry(master.clone()).or_default();
        if slaves.contains(&slave) {
            return false;
        }
        slaves.push(slave);
        true
    }

    /// Remove a slave from a master's entry, if present
    pub fn unregister(&mut self, master: &ActorId, slave: &ActorIdentity) -> bool {
        let Some(slaves) = self.entries.get_mut(master) else {
            return false;
        };
        let before = slaves.len();
        slaves.retain(|s| s != slave);
        before != slaves.len()
    }

    /// Registered slaves of a master, in registration order
    pub fn slaves(&self, master: &ActorId) -> &[ActorIdentity] {
        self.entries.get(master).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, master: &ActorId, slave: &ActorIdentity) -> bool {
        self.slaves(master).contains(slave)
    }

    pub fn masters(&self) -> impl Iterator<Item = &ActorId> {
        self.entries.keys()
    }

    /// Drop a master's whole entry
    pub fn remove_master(&mut self, master: &ActorId) -> Option<Vec<ActorIdentity>> {
        self.entries.remove(master)
    }

    /// Remove a slave from every entry except the one of `keep`
    ///
    /// Returns the number of entries the slave was removed from.
    pub fn retain_under(&mut self, slave: &ActorIdentity, keep: Option<&ActorId>) -> usize {
        let mut removed = 0;
        for (master, slaves) in &mut self.entries {
            if Some(master) == keep {
                continue;
            }
            let before = slaves.len();
            slaves.retain(|s| s != slave);
            removed += before - slaves.len();
        }
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }
}
