//! Log Loader
//!
//! Rebuilds the in-memory Index by replaying the log file from the start.

use std::path::Path;

use serde::de::{DeserializeOwned, IgnoredAny};

use super::LogReader;
use crate::error::Result;
use crate::index::Index;

/// Replays a log file into a fresh Index
pub struct Loader;

/// Result of a load or verify pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Records decoded and applied, in file order
    pub records_replayed: u64,

    /// Blank lines skipped
    pub blank_lines: u64,

    /// Distinct keys in the resulting Index, tombstones included
    pub keys: u64,

    /// Keys whose last record is a tombstone
    pub tombstones: u64,

    /// Approximate bytes consumed, as counted by `LogIterator::bytes_read`
    pub bytes_read: u64,
}

impl Loader {
    /// Load a log file into a new Index
    ///
    /// Fail-fast: the first unreadable or undecodable line aborts the load
    /// and the partially built Index is dropped, so callers never see a
    /// half-replayed state.
    pub fn load<T: DeserializeOwned>(path: &Path) -> Result<(Index<T>, LoadStats)> {
        let mut index = Index::new();
        let mut records = LogReader::open(path)?.records::<T>();
        let mut replayed = 0u64;

        for record in records.by_ref() {
            index.apply(record?);
            replayed += 1;
        }

        let stats = LoadStats {
            records_replayed: replayed,
            blank_lines: records.blank_lines(),
            keys: index.len() as u64,
            tombstones: index.tombstone_count() as u64,
            bytes_read: records.bytes_read(),
        };

        Ok((index, stats))
    }

    /// Verify that every line of a log file decodes, without keeping values
    pub fn verify(path: &Path) -> Result<LoadStats> {
        let (_, stats) = Self::load::<IgnoredAny>(path)?;
        Ok(stats)
    }
}
