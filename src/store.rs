//! Store Module
//!
//! The public façade that coordinates the log file, the Index, and compaction.
//!
//! ## Responsibilities
//! - Create the log file and replay it into the Index
//! - Apply every write to the Index, then append it to the log file
//! - Answer every query from the Index alone
//! - Rewrite the log file from the Index on demand

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::compaction::{CompactionStats, Compactor};
use crate::config::Config;
use crate::error::{FigmentError, Result};
use crate::index::Index;
use crate::log::{encode_line, LoadStats, Loader, LogWriter};

/// A single-file, append-only key-value store of `T` values
///
/// ## Concurrency Model: Single Writer / Multiple Readers
///
/// - **Writes** (set/delete/compact/load): serialized by the `log` mutex.
///   Lock order is always `log` then `index`.
/// - **Reads** (get/list/find/find_all/map): take the `index` read lock only.
///
/// One instance owns its file for the lifetime of the process. Nothing
/// guards against a second process or a second instance on the same path.
///
/// ## Divergence on write failure
///
/// `set` and `delete` update the Index before appending. If the append
/// fails, the Index is ahead of the file until a later write succeeds or
/// `load()` throws the in-memory state away.
pub struct Store<T> {
    /// Store configuration
    config: Config,

    /// Exclusive writer for the log file
    log: Mutex<LogWriter>,

    /// In-memory mirror of the log file
    index: RwLock<Index<T>>,

    /// Set by the first successful `load()`. `compact()` fails until then.
    loaded: AtomicBool,
}

/// Point-in-time counters for a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Keys in the Index, tombstones included (`list().len()`)
    pub keys: usize,

    /// Keys with a live value
    pub live_keys: usize,

    /// Keys whose current state is a tombstone
    pub tombstones: usize,

    /// Records currently in the log file
    pub log_records: u64,
}

impl<T> Store<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Ensure the log file exists and return a store with an empty Index
    ///
    /// Call `load()` before serving reads or writes.
    pub fn initialize(config: Config) -> Result<Self> {
        let writer = LogWriter::initialize(&config)?;

        Ok(Self {
            config,
            log: Mutex::new(writer),
            index: RwLock::new(Index::new()),
            loaded: AtomicBool::new(false),
        })
    }

    /// Initialize with default config at `path`
    pub fn initialize_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::initialize(Config::builder().path(path).build())
    }

    /// Initialize and load in one step
    pub fn open(config: Config) -> Result<Self> {
        let store = Self::initialize(config)?;
        store.load()?;
        Ok(store)
    }

    /// Open with default config at `path`
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(Config::builder().path(path).build())
    }

    /// Replay the log file into a fresh Index and swap it in
    ///
    /// All or nothing: on error the current Index is left as it was.
    /// Calling this again discards any in-memory state that diverged from
    /// the file.
    pub fn load(&self) -> Result<LoadStats> {
        let mut log = self.log.lock();
        let (index, stats) = Loader::load(log.path())?;

        log.set_record_count(stats.records_replayed);
        *self.index.write() = index;
        self.loaded.store(true, Ordering::Release);

        tracing::info!(
            path = %log.path().display(),
            records = stats.records_replayed,
            keys = stats.keys,
            tombstones = stats.tombstones,
            "log file loaded"
        );
        Ok(stats)
    }

    // =========================================================================
    // Mutator
    // =========================================================================

    /// Insert or replace the value for `key`
    pub fn set(&self, key: impl Into<String>, value: T) -> Result<()> {
        let key = key.into();
        let line = encode_line(&key, Some(&value))?;
        self.write(key, Some(value), line)
    }

    /// Delete `key` by writing a tombstone
    ///
    /// The key stays in `list()` until the next compaction and reload.
    pub fn delete(&self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        let line = encode_line::<T>(&key, None)?;
        self.write(key, None, line)
    }

    fn write(&self, key: String, value: Option<T>, line: String) -> Result<()> {
        let mut log = self.log.lock();

        // Index first, then the durability-confirming append
        self.index.write().insert(key.clone(), value.into());

        match log.append(&line) {
            Ok(bytes) => {
                tracing::debug!(key = %key, bytes, "record appended");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "append failed; index is ahead of the log file");
                Err(e)
            }
        }
    }

    // =========================================================================
    // Compactor
    // =========================================================================

    /// Rewrite the log file with one record per live key
    ///
    /// The Index is not modified: tombstoned keys stay in `list()` until the
    /// next `load()`. Fails with `NotLoaded` until a `load()` has succeeded,
    /// since an unloaded Index does not reflect the file.
    pub fn compact(&self) -> Result<CompactionStats> {
        let mut log = self.log.lock();
        if !self.loaded.load(Ordering::Acquire) {
            return Err(FigmentError::NotLoaded);
        }
        let index = self.index.read();

        let stats = Compactor::compact(&index, &mut log)?;

        tracing::info!(
            records_before = stats.records_before,
            records_after = stats.records_written,
            bytes_before = stats.bytes_before,
            bytes_after = stats.bytes_after,
            tombstones_dropped = stats.tombstones_dropped,
            "log file compacted"
        );
        Ok(stats)
    }
}

impl<T> Store<T> {
    // =========================================================================
    // Query Surface
    // =========================================================================

    /// Get the current value for `key` (None for unknown or deleted keys)
    pub fn get(&self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        self.index.read().get(key).cloned()
    }

    /// True if `key` has a live value
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.read().get(key).is_some()
    }

    /// Every key in first-insertion order, tombstoned keys included
    pub fn list(&self) -> Vec<String> {
        self.index.read().keys().map(str::to_owned).collect()
    }

    /// First live value matching `predicate`, in first-insertion order
    pub fn find<P>(&self, mut predicate: P) -> Option<T>
    where
        T: Clone,
        P: FnMut(&T) -> bool,
    {
        self.index
            .read()
            .live()
            .find(|(_, value)| predicate(value))
            .map(|(_, value)| value.clone())
    }

    /// Every live value matching `predicate`, in first-insertion order
    pub fn find_all<P>(&self, mut predicate: P) -> Vec<T>
    where
        T: Clone,
        P: FnMut(&T) -> bool,
    {
        self.index
            .read()
            .live()
            .filter(|(_, value)| predicate(value))
            .map(|(_, value)| value.clone())
            .collect()
    }

    /// Apply `transform` to every Index entry in first-insertion order
    ///
    /// Tombstones are passed as `None`, so the result has one element per
    /// key in `list()`.
    pub fn map<U, F>(&self, mut transform: F) -> Vec<U>
    where
        F: FnMut(Option<&T>) -> U,
    {
        self.index
            .read()
            .iter()
            .map(|(_, slot)| transform(slot.as_value()))
            .collect()
    }

    /// Number of keys in the Index, tombstones included
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        let log = self.log.lock();
        let index = self.index.read();
        StoreStats {
            keys: index.len(),
            live_keys: index.live_count(),
            tombstones: index.tombstone_count(),
            log_records: log.record_count(),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Force the log file to stable storage
    pub fn sync(&self) -> Result<()> {
        self.log.lock().sync()
    }

    /// Sync and release the store
    pub fn close(self) -> Result<()> {
        self.log.into_inner().sync()
    }

    /// True once a `load()` has succeeded
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
