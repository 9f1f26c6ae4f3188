//! Index Module
//!
//! In-memory mirror of the log file: the authoritative read path.
//!
//! ## Responsibilities
//! - O(1) point lookups by key
//! - Preserve first-insertion key order across updates
//! - Keep tombstoned keys until compaction and a reload drop them
//!
//! ## Data Structure Choice
//! `IndexMap<String, Slot<T>>`:
//! - Overwriting a key keeps its first position
//! - Iteration order is first-insertion order, which `list()` exposes

mod table;

pub use table::Index;

/// Entry stored in the Index
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    /// A live value
    Value(T),

    /// A tombstone (deleted key)
    Tombstone,
}

impl<T> Slot<T> {
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    /// The live value, if any
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Slot::Value(v) => Some(v),
            Slot::Tombstone => None,
        }
    }
}

impl<T> From<Option<T>> for Slot<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Slot::Value(v),
            None => Slot::Tombstone,
        }
    }
}
