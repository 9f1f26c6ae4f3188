//! Compaction
//!
//! Rewrites the log file from the current Index: one record per live key,
//! in first-insertion order. Tombstones and superseded records are dropped.

use serde::Serialize;

use crate::error::Result;
use crate::index::Index;
use crate::log::{encode_line, LogWriter};

/// Result of a compaction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompactionStats {
    /// Records in the file before compaction
    pub records_before: u64,

    /// Records in the file after compaction (one per live key)
    pub records_written: u64,

    /// Tombstoned keys left out of the new file
    pub tombstones_dropped: u64,

    pub bytes_before: u64,
    pub bytes_after: u64,
}

/// Serializes an Index snapshot back into the log file
pub struct Compactor;

impl Compactor {
    /// Replace the log file with the live contents of `index`
    ///
    /// Does not modify the Index. Every value is encoded before the file is
    /// touched, so a serialization error leaves the old file in place.
    pub fn compact<T: Serialize>(index: &Index<T>, writer: &mut LogWriter) -> Result<CompactionStats> {
        let records_before = writer.record_count();
        let bytes_before = writer.len();

        let lines = index
            .live()
            .map(|(key, value)| encode_line(key, Some(value)))
            .collect::<Result<Vec<_>>>()?;

        let records_written = lines.len() as u64;
        let bytes_after = writer.replace_all(&lines)?;

        Ok(CompactionStats {
            records_before,
            records_written,
            tombstones_dropped: index.tombstone_count() as u64,
            bytes_before,
            bytes_after,
        })
    }
}
