//! Index implementation
//!
//! Insertion-ordered map from key to slot, with a running tombstone count.

use indexmap::IndexMap;

use super::Slot;
use crate::log::Record;

/// In-memory index of current key state
#[derive(Debug, Clone)]
pub struct Index<T> {
    entries: IndexMap<String, Slot<T>>,
    tombstones: usize,
}

impl<T> Index<T> {
    /// Create a new empty Index
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            tombstones: 0,
        }
    }

    /// Get the live value for a key (None for unknown or tombstoned keys)
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(Slot::as_value)
    }

    /// Get the raw slot for a key
    pub fn slot(&self, key: &str) -> Option<&Slot<T>> {
        self.entries.get(key)
    }

    /// Store a live value
    pub fn put(&mut self, key: String, value: T) {
        self.insert(key, Slot::Value(value));
    }

    /// Mark a key deleted. Unknown keys gain a tombstone entry too.
    pub fn delete(&mut self, key: String) {
        self.insert(key, Slot::Tombstone);
    }

    /// Insert a slot, keeping the key's first-insertion position
    pub fn insert(&mut self, key: String, slot: Slot<T>) {
        let new_tombstone = slot.is_tombstone();
        let old_tombstone = self
            .entries
            .insert(key, slot)
            .map(|old| old.is_tombstone());

        match (old_tombstone, new_tombstone) {
            (Some(false) | None, true) => self.tombstones += 1,
            (Some(true), false) => self.tombstones -= 1,
            _ => {}
        }
    }

    /// Replay one log record (last value wins)
    pub fn apply(&mut self, record: Record<T>) {
        self.insert(record.key, record.value.into());
    }

    /// All keys in first-insertion order, tombstones included
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// All entries in first-insertion order, tombstones included
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot<T>)> + '_ {
        self.entries.iter().map(|(k, s)| (k.as_str(), s))
    }

    /// Live entries only, in first-insertion order
    pub fn live(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.entries
            .iter()
            .filter_map(|(k, s)| s.as_value().map(|v| (k.as_str(), v)))
    }

    /// Number of keys, tombstones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tombstone_count(&self) -> usize {
        self.tombstones
    }

    pub fn live_count(&self) -> usize {
        self.entries.len() - self.tombstones
    }
}

impl<T> Default for Index<T> {
    fn default() -> Self {
        Self::new()
    }
}
