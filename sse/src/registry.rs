use crate::connection::{ConnectionSet, ConnectionSettings, Subscription};
use dashmap::DashMap;
use log::*;
use std::sync::Arc;

/// Group name to connection set, sharded so unrelated groups never contend.
pub struct GroupRegistry {
    groups: DashMap<String, Arc<ConnectionSet>>,
    settings: ConnectionSettings,
}

impl GroupRegistry {
    pub fn new(settings: ConnectionSettings) -> Self {
        Self {
            groups: DashMap::new(),
            settings,
        }
    }

    /// Lookup without creating - O(1)
    pub fn get(&self, group: &str) -> Option<Arc<ConnectionSet>> {
        self.groups.get(group).map(|entry| Arc::clone(entry.value()))
    }

    /// Return the group's set, creating it on first use.
    pub fn get_or_create(&self, group: &str) -> Arc<ConnectionSet> {
        // Hot path only takes a shard read lock
        if let Some(set) = self.get(group) {
            return set;
        }

        let set = self
            .groups
            .entry(group.to_string())
            .or_insert_with(|| {
                debug!("Creating SSE group '{group}'");
                Arc::new(ConnectionSet::new(group, self.settings))
            });
        Arc::clone(set.value())
    }

    /// Subscribe a new connection to `group`.
    pub fn subscribe(&self, group: &str) -> Subscription {
        loop {
            // A set removed between lookup and subscribe refuses the connection;
            // the next lookup then finds or creates its replacement.
            if let Some(subscription) = self.get_or_create(group).subscribe() {
                return subscription;
            }
        }
    }

    /// Close and forget a group. Returns the number of connections closed; 0 if unknown.
    pub fn remove(&self, group: &str) -> usize {
        match self.groups.remove(group) {
            Some((_, set)) => set.close(),
            None => 0,
        }
    }

    /// Close every group. Returns the number of connections closed.
    pub fn remove_all(&self) -> usize {
        self.group_names()
            .iter()
            .map(|group| self.remove(group))
            .sum()
    }

    pub fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new(ConnectionSettings::default())
    }
}
